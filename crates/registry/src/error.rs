use crate::linker::PendingReference;
use corpus_model::UnitId;
use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors raised by registration, merging, and lookup.
///
/// Structural violations (duplicate ids, dangling chunk references) abort the
/// registration or merge of the offending unit as a whole; unresolved
/// cross-unit symbols are deferred during loading and only become
/// [`RegistryError::UnresolvedSymbols`] once the load is declared complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Unit id already registered
    #[error("Duplicate unit id: {0}")]
    DuplicateUnitId(UnitId),

    /// Unit alias already claimed by another unit
    #[error("Duplicate unit alias '{alias}' (already used by {existing})")]
    DuplicateUnitAlias { alias: String, existing: UnitId },

    /// Alias is not usable as a reference qualifier
    #[error("Invalid alias '{alias}' for unit {unit}: {reason}")]
    InvalidAlias {
        unit: UnitId,
        alias: String,
        reason: String,
    },

    /// Chunk id already present in the unit
    #[error("Duplicate chunk id '{chunk}' in unit {unit}")]
    DuplicateChunkId { unit: UnitId, chunk: String },

    /// HLO id already present in the unit
    #[error("Duplicate HLO id '{hlo}' in unit {unit}")]
    DuplicateHloId { unit: UnitId, hlo: String },

    /// Ontology term already defined in the unit
    #[error("Duplicate symbol '{name}' in unit {unit}")]
    DuplicateSymbol { unit: UnitId, name: String },

    /// HLO references a chunk id that does not exist in its unit
    #[error("HLO '{hlo}' in unit {unit} references missing chunk '{chunk}'")]
    DanglingChunkReference {
        unit: UnitId,
        hlo: String,
        chunk: String,
    },

    /// Qualified name could not be resolved
    #[error("Unresolved symbol '{alias}.{symbol}'")]
    UnresolvedSymbol { alias: String, symbol: String },

    /// Aggregated report of every reference still dangling when the load
    /// was declared complete
    #[error("{} unresolved reference(s) after corpus load: {}", .0.len(), format_pending(.0))]
    UnresolvedSymbols(Vec<PendingReference>),

    /// Unit not registered
    #[error("Unit not found: {0}")]
    NotFound(UnitId),
}

fn format_pending(refs: &[PendingReference]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
