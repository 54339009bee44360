//! # Corpus Registry
//!
//! The registry/linking core behind a corpus of commentary units: a
//! content-addressable store with cross-reference resolution and tag
//! indexing.
//!
//! ## Architecture
//!
//! ```text
//! Unit values (from authoring code)
//!     │
//!     ├──> Extension Merger (fold incremental batches, id-clean)
//!     │
//!     ├──> Unit Registry
//!     │      ├─> Linker (chunk/HLO structure, qualified references)
//!     │      ├─> Tag Index build (tag markers → inverted index)
//!     │      └─> all-or-nothing admission gate
//!     │
//!     └──> Derived views (registry-owned, rebuilt, never authored)
//!            ├─> Symbol tables (per-unit ontology terms)
//!            ├─> Tag Index ((key, value) → HLO keys)
//!            ├─> Reference Graph (resolved cross-unit citations)
//!            └─> Pending references (deferred until load completes)
//! ```
//!
//! Cross-unit references may legitimately point at units that register later
//! in the load sequence; the registry defers them and re-checks on every
//! registration and merge. [`UnitRegistry::complete_load`] turns anything
//! still unresolved into one aggregated report.

mod error;
mod graph;
mod linker;
mod merger;
mod registry;
pub mod scan;
mod store;
mod symbols;
mod tag_index;

pub use error::{RegistryError, Result};
pub use graph::{CorpusGraph, RefEdge};
pub use linker::{ClauseReference, PendingReference};
pub use merger::ExtensionBatch;
pub use registry::{LoadStats, UnitRegistry};
pub use store::{MemoryStore, UnitStore};
pub use symbols::SymbolTable;
pub use tag_index::{HloKey, TagIndex};
