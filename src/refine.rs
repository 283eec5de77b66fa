//! Refinement engine: narrows a triple of sets to its consistent core.
//!
//! For input sets S, P and O, a member survives in its position iff it takes
//! part in at least one combination (s, p, o) from S × P × O that is a known
//! fact or is exempted by the policy. The surviving members are interned as
//! subsets and recorded as a [`RefinementRule`].

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::graph::index::TripleIndex;
use crate::policy::ExemptionPolicy;
use crate::store::{SetId, SetStore};

/// Set ids in subject, property and object position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetTriple {
    pub subject: SetId,
    pub property: SetId,
    pub object: SetId,
}

impl SetTriple {
    pub fn new(subject: SetId, property: SetId, object: SetId) -> Self {
        Self {
            subject,
            property,
            object,
        }
    }
}

impl std::fmt::Display for SetTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.property, self.object)
    }
}

/// The cross product of `original` narrows to the cross product of `refined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefinementRule {
    pub original: SetTriple,
    pub refined: SetTriple,
}

/// What a single call to [`Refiner::refine`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// A rule was recorded.
    Rule(RefinementRule),
    /// No subject survived.
    Vacuous,
    /// The refined subject is the orphan set.
    OrphanSuppressed,
}

impl RuleOutcome {
    pub fn rule(self) -> Option<RefinementRule> {
        match self {
            RuleOutcome::Rule(rule) => Some(rule),
            _ => None,
        }
    }
}

/// Reads the triple index through an exemption policy.
pub struct Refiner<'a, P: ExemptionPolicy + ?Sized> {
    index: &'a TripleIndex,
    policy: &'a P,
}

impl<'a, P: ExemptionPolicy + ?Sized> Refiner<'a, P> {
    pub fn new(index: &'a TripleIndex, policy: &'a P) -> Self {
        Self { index, policy }
    }

    /// Refine `target` against the index, interning the resulting subsets.
    pub fn refine(&self, store: &mut SetStore, target: SetTriple) -> StoreResult<RuleOutcome> {
        let (kept_s, kept_p, kept_o) = {
            let subjects = set_symbols(store, target.subject);
            let properties = set_symbols(store, target.property);
            let objects = set_symbols(store, target.object);

            let mut kept_s = vec![false; subjects.len()];
            let mut kept_p = vec![false; properties.len()];
            let mut kept_o = vec![false; objects.len()];

            for (i, &s) in subjects.iter().enumerate() {
                for (j, &p) in properties.iter().enumerate() {
                    let exempt = self.policy.exempts(s, p);
                    for (k, &o) in objects.iter().enumerate() {
                        if kept_s[i] && kept_p[j] && kept_o[k] {
                            continue;
                        }
                        if exempt || self.index.contains(s, p, o) {
                            kept_s[i] = true;
                            kept_p[j] = true;
                            kept_o[k] = true;
                        }
                    }
                }
            }
            (kept_s, kept_p, kept_o)
        };

        let Some(ss) = store.intern_subset(target.subject, &kept_s)? else {
            return Ok(RuleOutcome::Vacuous);
        };
        if store.orphan_set() == Some(ss) {
            return Ok(RuleOutcome::OrphanSuppressed);
        }

        // A surviving subject implies a confirmed combination, which keeps
        // at least one property and one object.
        let pp = store
            .intern_subset(target.property, &kept_p)?
            .expect("surviving subject without a surviving property");
        let oo = store
            .intern_subset(target.object, &kept_o)?
            .expect("surviving subject without a surviving object");

        let rule = RefinementRule {
            original: target,
            refined: SetTriple::new(ss, pp, oo),
        };
        tracing::trace!(original = %rule.original, refined = %rule.refined, "rule");
        Ok(RuleOutcome::Rule(rule))
    }
}

fn set_symbols(store: &SetStore, id: SetId) -> &[crate::symbol::SymbolId] {
    store
        .get(id)
        .map(|set| set.symbols())
        .unwrap_or_else(|| panic!("{id} is not in the set store"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;
    use crate::policy::{NoExemption, OrphanListExemption};
    use crate::symbol::SymbolId;

    fn sym(id: u32) -> SymbolId {
        SymbolId::new(id)
    }

    fn index(triples: &[(u32, u32, u32)]) -> TripleIndex {
        TripleIndex::build(
            triples
                .iter()
                .map(|&(s, p, o)| Triple::new(sym(s), sym(p), sym(o))),
            64,
            1000,
        )
        .unwrap()
    }

    fn store_with_singletons(n: u32, orphan: Option<u32>) -> SetStore {
        let mut store = SetStore::new(orphan.map(sym), 1000);
        for i in 0..n {
            store.register_set([sym(i)]).unwrap();
        }
        store
    }

    #[test]
    fn whole_set_narrows_to_supported_member() {
        // symbols a=0, b=1, c=2; only (a, a, a) holds.
        let idx = index(&[(0, 0, 0)]);
        let mut store = store_with_singletons(3, None);
        let abc = store.register_set([sym(0), sym(1), sym(2)]).unwrap();
        let refiner = Refiner::new(&idx, &NoExemption);

        let outcome = refiner
            .refine(&mut store, SetTriple::new(abc, abc, abc))
            .unwrap();
        let a = SetId::new(0);
        assert_eq!(
            outcome,
            RuleOutcome::Rule(RefinementRule {
                original: SetTriple::new(abc, abc, abc),
                refined: SetTriple::new(a, a, a),
            })
        );
        // {a} already existed as a singleton.
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn unsupported_combination_is_vacuous_and_allocates_nothing() {
        let idx = index(&[(0, 0, 0)]);
        let mut store = store_with_singletons(3, None);
        let bc = store.register_set([sym(1), sym(2)]).unwrap();
        let refiner = Refiner::new(&idx, &NoExemption);

        let before = store.len();
        let outcome = refiner.refine(&mut store, SetTriple::new(bc, bc, bc)).unwrap();
        assert_eq!(outcome, RuleOutcome::Vacuous);
        assert_eq!(store.len(), before);
        assert_eq!(store.degenerate_projections(), 1);
    }

    #[test]
    fn refinement_mints_new_subsets() {
        // (0, 1, 2) and (3, 1, 2) hold; subject set {0, 3, 4}.
        let idx = index(&[(0, 1, 2), (3, 1, 2)]);
        let mut store = store_with_singletons(5, None);
        let subj = store.register_set([sym(0), sym(3), sym(4)]).unwrap();
        let prop = store.register_set([sym(1), sym(4)]).unwrap();
        let obj = store.register_set([sym(2), sym(0)]).unwrap();
        let refiner = Refiner::new(&idx, &NoExemption);

        let rule = refiner
            .refine(&mut store, SetTriple::new(subj, prop, obj))
            .unwrap()
            .rule()
            .unwrap();
        let refined_subject = store.get(rule.refined.subject).unwrap();
        assert_eq!(refined_subject.symbols(), &[sym(0), sym(3)]);
        assert_eq!(rule.refined.property, SetId::new(1));
        assert_eq!(rule.refined.object, SetId::new(2));
    }

    #[test]
    fn orphan_exemption_bypasses_the_index() {
        // symbols: 0 = orphan, 1 = rdffirst, 2 = x, 3 = y
        let idx = index(&[(3, 1, 2)]);
        let mut store = store_with_singletons(4, Some(0));
        let subj = store.register_set([sym(0), sym(3)]).unwrap();
        let policy = OrphanListExemption::new(Some(sym(0)), vec![sym(1)]);
        let refiner = Refiner::new(&idx, &policy);

        let obj = store.register_set([sym(2), sym(3)]).unwrap();
        let rule = refiner
            .refine(&mut store, SetTriple::new(subj, SetId::new(1), obj))
            .unwrap()
            .rule()
            .unwrap();
        // Orphan survives through the exemption, and keeps every object.
        assert_eq!(rule.refined.subject, subj);
        assert_eq!(rule.refined.object, obj);
    }

    #[test]
    fn orphan_subject_is_suppressed() {
        let idx = index(&[]);
        let mut store = store_with_singletons(3, Some(0));
        let policy = OrphanListExemption::new(Some(sym(0)), vec![sym(1)]);
        let refiner = Refiner::new(&idx, &policy);
        let orphan = store.orphan_set().unwrap();

        let outcome = refiner
            .refine(&mut store, SetTriple::new(orphan, SetId::new(1), SetId::new(2)))
            .unwrap();
        assert_eq!(outcome, RuleOutcome::OrphanSuppressed);

        // A larger subject set that narrows to {orphan} is suppressed too.
        let with_orphan = store.register_set([sym(0), sym(2)]).unwrap();
        let outcome = refiner
            .refine(
                &mut store,
                SetTriple::new(with_orphan, SetId::new(1), SetId::new(2)),
            )
            .unwrap();
        assert_eq!(outcome, RuleOutcome::OrphanSuppressed);
    }

    #[test]
    fn closure_policy_is_accepted() {
        let idx = index(&[]);
        let mut store = store_with_singletons(2, None);
        let always = |_s: SymbolId, _p: SymbolId| true;
        let refiner = Refiner::new(&idx, &always);
        let outcome = refiner
            .refine(&mut store, SetTriple::new(SetId::new(0), SetId::new(1), SetId::new(0)))
            .unwrap();
        assert!(outcome.rule().is_some());
    }
}
