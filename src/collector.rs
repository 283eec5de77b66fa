//! Result collector: refinement rules in discovery order.

use crate::error::{EngineError, EngineResult};
use crate::refine::RefinementRule;

/// Append-only log of refinement rules.
///
/// Rules are not deduplicated: distinct origins that refine to the same
/// target triple are all kept.
#[derive(Debug, Clone)]
pub struct RuleLog {
    rules: Vec<RefinementRule>,
    max_rules: usize,
}

impl RuleLog {
    pub fn new(max_rules: usize) -> Self {
        Self {
            rules: Vec::new(),
            max_rules,
        }
    }

    /// Record a rule.
    pub fn push(&mut self, rule: RefinementRule) -> EngineResult<()> {
        if self.rules.len() >= self.max_rules {
            return Err(EngineError::RuleCapacityExceeded {
                limit: self.max_rules,
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[RefinementRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn into_rules(self) -> Vec<RefinementRule> {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refine::SetTriple;
    use crate::store::SetId;

    fn rule(o: u32, r: u32) -> RefinementRule {
        let o = SetId::new(o);
        let r = SetId::new(r);
        RefinementRule {
            original: SetTriple::new(o, o, o),
            refined: SetTriple::new(r, r, r),
        }
    }

    #[test]
    fn keeps_discovery_order_and_duplicates() {
        let mut log = RuleLog::new(10);
        log.push(rule(3, 0)).unwrap();
        log.push(rule(4, 0)).unwrap();
        log.push(rule(3, 0)).unwrap();
        assert_eq!(log.rules(), &[rule(3, 0), rule(4, 0), rule(3, 0)]);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut log = RuleLog::new(1);
        log.push(rule(1, 1)).unwrap();
        assert!(matches!(
            log.push(rule(2, 2)),
            Err(EngineError::RuleCapacityExceeded { limit: 1 })
        ));
        assert_eq!(log.len(), 1);
    }
}
