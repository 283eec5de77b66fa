//! Post-run consistency check for a finished closure.
//!
//! Re-derives, from the closure's own tables, the properties every run must
//! satisfy: no two sets share content, every refined set is a non-empty
//! subset of its origin holding exactly the origin members that take part in
//! a fact or exempt combination, and no rule refines to the orphan subject
//! set. The expected members are recomputed by brute force, independently of
//! the refinement engine.

use std::collections::BTreeMap;

use crate::engine::Closure;
use crate::policy::ExemptionPolicy;
use crate::refine::RefinementRule;
use crate::store::{SetId, SymbolSet};
use crate::symbol::SymbolId;

const POSITIONS: [&str; 3] = ["subject", "property", "object"];

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two ids hold identical content.
    DuplicateSet { first: SetId, second: SetId },
    /// A rule refers to an id outside the universe.
    MissingSet { rule: usize, set: SetId },
    /// A refined set is empty.
    EmptyRefinement { rule: usize, set: SetId },
    /// A refined set is not a subset of its origin.
    NotSubset { rule: usize, refined: SetId, original: SetId },
    /// A refined member takes part in no fact or exempt combination.
    Unwitnessed {
        rule: usize,
        position: &'static str,
        symbol: SymbolId,
    },
    /// A witnessed origin member is missing from the refined set.
    Dropped {
        rule: usize,
        position: &'static str,
        symbol: SymbolId,
    },
    /// A rule's refined subject is the orphan set.
    OrphanSubject { rule: usize },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::DuplicateSet { first, second } => {
                write!(f, "{first} and {second} have the same content")
            }
            Violation::MissingSet { rule, set } => write!(f, "rule {rule} refers to unknown {set}"),
            Violation::EmptyRefinement { rule, set } => {
                write!(f, "rule {rule} refines to empty {set}")
            }
            Violation::NotSubset {
                rule,
                refined,
                original,
            } => write!(f, "rule {rule}: {refined} is not a subset of {original}"),
            Violation::Unwitnessed {
                rule,
                position,
                symbol,
            } => write!(f, "rule {rule}: {position} {symbol} has no supporting fact"),
            Violation::Dropped {
                rule,
                position,
                symbol,
            } => write!(f, "rule {rule}: supported {position} {symbol} was dropped"),
            Violation::OrphanSubject { rule } => {
                write!(f, "rule {rule} refines its subject to the orphan set")
            }
        }
    }
}

/// Check `closure`, returning every violation found.
pub fn verify<P: ExemptionPolicy + ?Sized>(closure: &Closure, policy: &P) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_canonical(closure, &mut violations);
    for (n, rule) in closure.rules().iter().enumerate() {
        check_rule(closure, policy, n, rule, &mut violations);
    }
    violations
}

fn check_canonical(closure: &Closure, out: &mut Vec<Violation>) {
    let mut seen: BTreeMap<&[SymbolId], SetId> = BTreeMap::new();
    for set in closure.store().iter() {
        if let Some(&first) = seen.get(set.symbols()) {
            out.push(Violation::DuplicateSet {
                first,
                second: set.id(),
            });
        } else {
            seen.insert(set.symbols(), set.id());
        }
    }
}

fn check_rule<P: ExemptionPolicy + ?Sized>(
    closure: &Closure,
    policy: &P,
    n: usize,
    rule: &RefinementRule,
    out: &mut Vec<Violation>,
) {
    let store = closure.store();
    let pairs = [
        (rule.original.subject, rule.refined.subject),
        (rule.original.property, rule.refined.property),
        (rule.original.object, rule.refined.object),
    ];

    let mut original: Vec<&SymbolSet> = Vec::with_capacity(3);
    let mut refined: Vec<&SymbolSet> = Vec::with_capacity(3);
    for (orig_id, ref_id) in pairs {
        let (Some(orig), Some(refd)) = (store.get(orig_id), store.get(ref_id)) else {
            let set = if store.get(orig_id).is_none() { orig_id } else { ref_id };
            out.push(Violation::MissingSet { rule: n, set });
            return;
        };
        if refd.is_empty() {
            out.push(Violation::EmptyRefinement { rule: n, set: ref_id });
        }
        if !refd.is_subset_of(orig) {
            out.push(Violation::NotSubset {
                rule: n,
                refined: ref_id,
                original: orig_id,
            });
        }
        original.push(orig);
        refined.push(refd);
    }

    if store.orphan_set() == Some(rule.refined.subject) {
        out.push(Violation::OrphanSubject { rule: n });
    }

    let expected = witnessed(closure, policy, [original[0], original[1], original[2]]);
    for (pos, (want, got)) in expected.iter().zip(&refined).enumerate() {
        for &symbol in got.symbols() {
            if want.binary_search(&symbol).is_err() {
                out.push(Violation::Unwitnessed {
                    rule: n,
                    position: POSITIONS[pos],
                    symbol,
                });
            }
        }
        for &symbol in want {
            if !got.contains(symbol) {
                out.push(Violation::Dropped {
                    rule: n,
                    position: POSITIONS[pos],
                    symbol,
                });
            }
        }
    }
}

/// Members of each set that take part in a supported combination, sorted.
fn witnessed<P: ExemptionPolicy + ?Sized>(
    closure: &Closure,
    policy: &P,
    sets: [&SymbolSet; 3],
) -> [Vec<SymbolId>; 3] {
    let index = closure.index();
    let mut found: [Vec<SymbolId>; 3] = Default::default();
    for &s in sets[0].symbols() {
        for &p in sets[1].symbols() {
            for &o in sets[2].symbols() {
                if policy.exempts(s, p) || index.contains(s, p, o) {
                    found[0].push(s);
                    found[1].push(p);
                    found[2].push(o);
                }
            }
        }
    }
    for members in &mut found {
        members.sort_unstable();
        members.dedup();
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, EngineConfig};
    use crate::policy::{NoExemption, OrphanListExemption};

    #[test]
    fn worked_example_is_clean() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        for n in ["a", "b", "c"] {
            engine.intern_symbol(n).unwrap();
        }
        engine.add_triple("a", "a", "a").unwrap();
        engine.add_set(&["a", "b", "c"]).unwrap();
        let closure = engine.run().unwrap();
        assert!(verify(&closure, &NoExemption).is_empty());
    }

    #[test]
    fn exempt_combinations_need_the_same_policy() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        for n in ["orphan", "rdffirst", "x", "y"] {
            engine.intern_symbol(n).unwrap();
        }
        engine.add_triple("y", "rdffirst", "x").unwrap();
        engine.add_set(&["orphan", "y"]).unwrap();
        let closure = engine.run().unwrap();
        let policy = OrphanListExemption::from_table(closure.symbols());

        assert!(verify(&closure, &policy).is_empty());
        // Checking without the exemption flags the orphan as unsupported.
        let strict = verify(&closure, &NoExemption);
        assert!(!strict.is_empty());
        assert!(strict.iter().all(|v| matches!(
            v,
            Violation::Unwitnessed {
                position: "subject",
                ..
            }
        )));
    }

    #[test]
    fn violations_render_readably() {
        let v = Violation::NotSubset {
            rule: 4,
            refined: SetId::new(9),
            original: SetId::new(2),
        };
        assert_eq!(v.to_string(), "rule 4: set:9 is not a subset of set:2");
    }
}
