use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-unit dictionary of named ontology terms available for cross-unit
/// reference.
///
/// Seeded from a unit's ontology mapping at registration time and replaced
/// wholesale when the unit is extended; entries are additive only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolTable {
    entries: BTreeMap<String, String>,
}

impl SymbolTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a unit's ontology mapping
    #[must_use]
    pub fn from_ontology(ontology: &BTreeMap<String, String>) -> Self {
        Self {
            entries: ontology.clone(),
        }
    }

    /// Look up a term's descriptive text
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Check whether a term is defined
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate term names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of terms
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no terms
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
