//! Ground facts: the fixed ternary relation the closure is computed against.
//!
//! A [`Triple`] is an explicit composite key of three symbol ids. Its derived
//! ordering is lexicographic over (subject, property, object), the same order
//! a packed fixed-width key would give. The sorted [`index::TripleIndex`] is
//! built once at load time and never mutated afterwards.

pub mod index;

use serde::{Deserialize, Serialize};

use crate::symbol::SymbolId;

/// A known fact (subject, property, object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// The subject of the triple.
    pub subject: SymbolId,
    /// The property (predicate) of the triple.
    pub property: SymbolId,
    /// The object of the triple.
    pub object: SymbolId,
}

impl Triple {
    /// Create a fact from its three components.
    pub fn new(subject: SymbolId, property: SymbolId, object: SymbolId) -> Self {
        Self {
            subject,
            property,
            object,
        }
    }

    /// Components paired with their position names.
    pub(crate) fn components(&self) -> [(&'static str, SymbolId); 3] {
        [
            ("subject", self.subject),
            ("property", self.property),
            ("object", self.object),
        ]
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.property, self.object)
    }
}
