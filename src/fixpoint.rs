//! Fixpoint driver: refines every combination of coexisting sets.
//!
//! Sets are admitted to the frontier one at a time in id order. Admitting
//! set `f` refines every (i, j, k) with all ids ≤ f and at least one equal to
//! f, so each triple of sets is considered exactly once, on admission of its
//! largest member. Sets minted along the way join the back of the worklist.
//! Ids are dense and only ever appended, so worklist order equals id order.
//! The universe is bounded by the distinct subsets of the initial sets,
//! hence the worklist drains.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::collector::RuleLog;
use crate::error::CatResult;
use crate::policy::ExemptionPolicy;
use crate::refine::{Refiner, RuleOutcome, SetTriple};
use crate::store::{SetId, SetStore};

/// Counters gathered during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixpointStats {
    /// Sets admitted to the frontier.
    pub frontier_steps: usize,
    /// Calls to the refinement engine.
    pub refinements: u64,
    /// Rules recorded.
    pub rules: usize,
    /// Refinements where no subject survived.
    pub vacuous: u64,
    /// Refinements whose subject narrowed to the orphan set.
    pub orphan_suppressed: u64,
    /// Sets created by refinement (not loaded from input).
    pub sets_minted: usize,
    /// Empty projections seen by the set store.
    pub degenerate_projections: u64,
}

pub struct FixpointDriver<'a, P: ExemptionPolicy + ?Sized> {
    refiner: Refiner<'a, P>,
}

impl<'a, P: ExemptionPolicy + ?Sized> FixpointDriver<'a, P> {
    pub fn new(refiner: Refiner<'a, P>) -> Self {
        Self { refiner }
    }

    /// Run to fixpoint, appending every rule to `log`.
    pub fn run(&self, store: &mut SetStore, log: &mut RuleLog) -> CatResult<FixpointStats> {
        let initial = store.len();
        let mut stats = FixpointStats::default();
        let mut frontier: VecDeque<SetId> = (0..initial as u32).map(SetId::new).collect();

        while let Some(admitted) = frontier.pop_front() {
            debug_assert_eq!(admitted.index(), stats.frontier_steps);
            let upto = admitted.get();
            let rules_before = log.len();
            let sets_before = store.len();

            for i in 0..=upto {
                for j in 0..=upto {
                    for k in 0..=upto {
                        if i != upto && j != upto && k != upto {
                            continue;
                        }
                        let target = SetTriple::new(SetId::new(i), SetId::new(j), SetId::new(k));
                        let minted_from = store.len();
                        let outcome = self.refiner.refine(store, target)?;
                        stats.refinements += 1;
                        frontier.extend((minted_from as u32..store.len() as u32).map(SetId::new));

                        match outcome {
                            RuleOutcome::Rule(rule) => log.push(rule)?,
                            RuleOutcome::Vacuous => stats.vacuous += 1,
                            RuleOutcome::OrphanSuppressed => stats.orphan_suppressed += 1,
                        }
                    }
                }
            }

            stats.frontier_steps += 1;
            tracing::debug!(
                frontier = %admitted,
                universe = store.len(),
                new_sets = store.len() - sets_before,
                new_rules = log.len() - rules_before,
                pending = frontier.len(),
                "frontier step"
            );
        }

        stats.rules = log.len();
        stats.sets_minted = store.len() - initial;
        stats.degenerate_projections = store.degenerate_projections();
        Ok(stats)
    }
}
