use crate::error::{RegistryError, Result};
use corpus_model::{Chunk, Hlo, Unit};
use std::collections::HashSet;

/// An incremental batch of chunks, HLOs, and ontology entries appended to an
/// already-defined unit.
///
/// This models the authoring pattern of successive extension blocks growing
/// one unit over time. Each batch must be id-clean relative to everything
/// previously merged and internally: a duplicate chunk, HLO, or symbol id
/// fails the whole batch and leaves the unit untouched. Existing order is
/// preserved; nothing is truncated or reordered.
#[derive(Debug, Clone, Default)]
pub struct ExtensionBatch {
    chunks: Vec<Chunk>,
    hlos: Vec<Hlo>,
    symbols: Vec<(String, String)>,
}

impl ExtensionBatch {
    /// Create an empty batch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a chunk
    #[must_use]
    pub fn chunk(mut self, chunk: Chunk) -> Self {
        self.chunks.push(chunk);
        self
    }

    /// Builder: append an HLO
    #[must_use]
    pub fn hlo(mut self, hlo: Hlo) -> Self {
        self.hlos.push(hlo);
        self
    }

    /// Builder: add an ontology entry
    #[must_use]
    pub fn symbol(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.symbols.push((name.into(), text.into()));
        self
    }

    /// Check if the batch carries nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty() && self.hlos.is_empty() && self.symbols.is_empty()
    }

    /// Append the batch to a unit, preserving existing order.
    ///
    /// All-or-nothing: every id is checked against the unit and the rest of
    /// the batch before anything is written. For units already registered,
    /// go through `UnitRegistry::extend` instead, which re-runs the full
    /// admission gate and swaps the stored unit atomically.
    pub fn apply_to(self, unit: &mut Unit) -> Result<()> {
        self.check_clean(unit)?;
        unit.chunks.extend(self.chunks);
        unit.hlos.extend(self.hlos);
        for (name, text) in self.symbols {
            unit.ontology.insert(name, text);
        }
        Ok(())
    }

    fn check_clean(&self, unit: &Unit) -> Result<()> {
        let mut chunk_ids: HashSet<&str> = unit.chunks.iter().map(|c| c.id.as_str()).collect();
        for chunk in &self.chunks {
            if !chunk_ids.insert(&chunk.id) {
                return Err(RegistryError::DuplicateChunkId {
                    unit: unit.id.clone(),
                    chunk: chunk.id.clone(),
                });
            }
        }

        let mut hlo_ids: HashSet<&str> = unit.hlos.iter().map(|h| h.id.as_str()).collect();
        for hlo in &self.hlos {
            if !hlo_ids.insert(&hlo.id) {
                return Err(RegistryError::DuplicateHloId {
                    unit: unit.id.clone(),
                    hlo: hlo.id.clone(),
                });
            }
        }

        // Symbol tables are additive only: a batch may not redefine a term.
        let mut names: HashSet<&str> = unit.ontology.keys().map(String::as_str).collect();
        for (name, _) in &self.symbols {
            if !names.insert(name) {
                return Err(RegistryError::DuplicateSymbol {
                    unit: unit.id.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}
