use corpus_model::{Unit, UnitId};
use std::collections::HashMap;

/// Backing store seam for the registry: a mapping from unit id to unit with
/// stable insertion order.
///
/// The registry performs all invariant checks before calling `insert` or
/// `replace`; implementations only hold data. Callers hold a reference to
/// the registry instance they constructed; there are no module-level
/// singletons.
pub trait UnitStore {
    /// Store a new unit. The id is known to be absent.
    fn insert(&mut self, unit: Unit);

    /// Replace an already-stored unit with the same id.
    fn replace(&mut self, unit: Unit);

    /// Look up a unit by id
    fn get(&self, id: &UnitId) -> Option<&Unit>;

    /// Check whether an id is present
    fn contains(&self, id: &UnitId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate units in insertion order
    fn iter(&self) -> Box<dyn Iterator<Item = &Unit> + '_>;

    /// Number of stored units
    fn len(&self) -> usize;

    /// Check if the store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    units: HashMap<UnitId, Unit>,
    order: Vec<UnitId>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnitStore for MemoryStore {
    fn insert(&mut self, unit: Unit) {
        self.order.push(unit.id.clone());
        self.units.insert(unit.id.clone(), unit);
    }

    fn replace(&mut self, unit: Unit) {
        self.units.insert(unit.id.clone(), unit);
    }

    fn get(&self, id: &UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Unit> + '_> {
        Box::new(self.order.iter().filter_map(|id| self.units.get(id)))
    }

    fn len(&self) -> usize {
        self.units.len()
    }
}
