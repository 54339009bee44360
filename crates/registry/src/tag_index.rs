use crate::scan;
use corpus_model::{Unit, UnitId};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Corpus-wide address of an HLO. HLO ids are only unique within their unit,
/// so index entries qualify them with the unit id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HloKey {
    pub unit: UnitId,
    pub hlo: String,
}

impl HloKey {
    pub fn new(unit: UnitId, hlo: impl Into<String>) -> Self {
        Self {
            unit,
            hlo: hlo.into(),
        }
    }
}

impl fmt::Display for HloKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.unit, self.hlo)
    }
}

/// Inverted index from `tag(key, value)` markers to the HLOs whose clauses
/// carry them.
///
/// Derived, never authored: the registry rebuilds a unit's postings in full
/// whenever the unit is admitted or extended.
#[derive(Debug, Default)]
pub struct TagIndex {
    postings: HashMap<(String, String), BTreeSet<HloKey>>,
}

impl TagIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a unit's clauses and add its postings
    pub fn index_unit(&mut self, unit: &Unit) {
        for hlo in &unit.hlos {
            for clause in &hlo.clauses {
                for marker in scan::tags(clause) {
                    self.postings
                        .entry((marker.key, marker.value))
                        .or_default()
                        .insert(HloKey::new(unit.id.clone(), hlo.id.clone()));
                }
            }
        }
        log::debug!("Indexed tags for unit {}", unit.id);
    }

    /// Drop every posting belonging to a unit. Rebuilds are total for the
    /// unit: remove, then re-index, so stale entries cannot survive.
    pub fn remove_unit(&mut self, id: &UnitId) {
        self.postings.retain(|_, keys| {
            keys.retain(|key| key.unit != *id);
            !keys.is_empty()
        });
    }

    /// Query by tag. With a value, returns the exact postings set; without,
    /// the union across all values of the key. Result sets are deduplicated
    /// and unordered in meaning (sorted for reproducibility).
    #[must_use]
    pub fn by_tag(&self, key: &str, value: Option<&str>) -> BTreeSet<HloKey> {
        match value {
            Some(value) => self
                .postings
                .get(&(key.to_string(), value.to_string()))
                .cloned()
                .unwrap_or_default(),
            None => self
                .postings
                .iter()
                .filter(|((k, _), _)| k == key)
                .flat_map(|(_, keys)| keys.iter().cloned())
                .collect(),
        }
    }

    /// All tag keys present in the index
    #[must_use]
    pub fn keys(&self) -> BTreeSet<&str> {
        self.postings.keys().map(|(k, _)| k.as_str()).collect()
    }

    /// Number of distinct `(key, value)` entries
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.postings.len()
    }
}
