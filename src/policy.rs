//! Exemption policies for the refinement engine.
//!
//! An exemption lets a (subject, property) combination count as a confirmed
//! fact without consulting the triple index. The stock policy models
//! structurally orphaned list nodes: facts whose subject is the orphan marker
//! and whose property is a list-structure property hold by construction and
//! never appear in the input relation.

use crate::symbol::{SymbolId, SymbolTable};

/// Predicate over (subject, property) that bypasses the fact check.
pub trait ExemptionPolicy {
    fn exempts(&self, subject: SymbolId, property: SymbolId) -> bool;
}

impl<F> ExemptionPolicy for F
where
    F: Fn(SymbolId, SymbolId) -> bool,
{
    fn exempts(&self, subject: SymbolId, property: SymbolId) -> bool {
        self(subject, property)
    }
}

/// Every combination must be a known fact.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExemption;

impl ExemptionPolicy for NoExemption {
    fn exempts(&self, _subject: SymbolId, _property: SymbolId) -> bool {
        false
    }
}

/// Orphan subjects are exempt for the list-structure properties.
#[derive(Debug, Clone, Default)]
pub struct OrphanListExemption {
    orphan: Option<SymbolId>,
    properties: Vec<SymbolId>,
}

impl OrphanListExemption {
    pub fn new(orphan: Option<SymbolId>, properties: Vec<SymbolId>) -> Self {
        Self { orphan, properties }
    }

    /// Build the policy from the special markers recorded by `table`.
    pub fn from_table(table: &SymbolTable) -> Self {
        Self::new(table.orphan(), table.list_structure().to_vec())
    }

    /// Whether the policy can ever fire.
    pub fn is_active(&self) -> bool {
        self.orphan.is_some() && !self.properties.is_empty()
    }
}

impl ExemptionPolicy for OrphanListExemption {
    fn exempts(&self, subject: SymbolId, property: SymbolId) -> bool {
        self.orphan == Some(subject) && self.properties.contains(&property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SpecialNames;

    #[test]
    fn orphan_list_exemption_from_table() {
        let mut table = SymbolTable::new(64, SpecialNames::default());
        let class = table.intern("classID").unwrap();
        let orphan = table.intern("orphan").unwrap();
        let first = table.intern("rdffirst").unwrap();
        let rest = table.intern("rdfrest").unwrap();
        let sub = table.intern("rdfssubClassOf").unwrap();

        let policy = OrphanListExemption::from_table(&table);
        assert!(policy.is_active());
        assert!(policy.exempts(orphan, first));
        assert!(policy.exempts(orphan, rest));
        assert!(!policy.exempts(orphan, sub));
        assert!(!policy.exempts(class, first));
    }

    #[test]
    fn inactive_without_orphan() {
        let mut table = SymbolTable::new(64, SpecialNames::default());
        let first = table.intern("rdffirst").unwrap();
        let policy = OrphanListExemption::from_table(&table);
        assert!(!policy.is_active());
        assert!(!policy.exempts(first, first));
    }

    #[test]
    fn closures_are_policies() {
        let two = SymbolId::new(2);
        let policy = move |s: SymbolId, _p: SymbolId| s == two;
        assert!(policy.exempts(two, SymbolId::new(0)));
        assert!(!policy.exempts(SymbolId::new(1), SymbolId::new(0)));
        assert!(!NoExemption.exempts(two, two));
    }
}
