//! # Corpus Model
//!
//! Data model and identifier factory for a corpus of commentary units.
//!
//! A unit is one self-contained body of commentary: a set of titled source
//! excerpts (chunks) and the structured annotations attached to them (HLOs),
//! plus an ontology mapping other units can reference by qualified name.
//!
//! ## Architecture
//!
//! ```text
//! Authoring code
//!     │
//!     ├──> make_unit_id / UnitIdFactory (canonical namespaced ids)
//!     │
//!     ├──> Unit builder
//!     │    ├─> Chunk literals (titled excerpts)
//!     │    ├─> Hlo literals (annotations with symbolic clauses)
//!     │    └─> Ontology entries (term name → descriptive text)
//!     │
//!     └──> Unit value handed to the registry for validation
//! ```
//!
//! This crate holds only inert records and the identifier rules; validation,
//! cross-reference resolution, and indexing live in `corpus-registry`.

mod error;
mod types;
mod unit_id;

pub use error::{ModelError, Result};
pub use types::{Chunk, Classification, Hlo, Unit};
pub use unit_id::{make_unit_id, UnitId, UnitIdFactory};
