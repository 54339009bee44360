use crate::unit_id::UnitId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A titled excerpt or paraphrase of source material.
///
/// Chunks are leaf records: they carry no outgoing references and are never
/// mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk id, unique within its unit
    pub id: String,

    /// Short human title
    pub title: String,

    /// Excerpt or paraphrase text
    pub text: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
        }
    }
}

/// A structured annotation attached to exactly one chunk.
///
/// Clause text is opaque to the core except for two recognizable sub-forms:
/// `tag(key, value)` markers and dotted `alias.symbol` references. Neither is
/// evaluated; both are extracted structurally at registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hlo {
    /// HLO id, unique within its unit
    pub id: String,

    /// Id of the chunk this annotation is attached to
    pub chunk_id: String,

    /// Short human label
    pub label: String,

    /// Ordered free-text symbolic expressions
    pub clauses: Vec<String>,
}

impl Hlo {
    /// Create a new HLO with no clauses
    pub fn new(
        id: impl Into<String>,
        chunk_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            chunk_id: chunk_id.into(),
            label: label.into(),
            clauses: Vec::new(),
        }
    }

    /// Builder: append a clause
    #[must_use]
    pub fn clause(mut self, clause: impl Into<String>) -> Self {
        self.clauses.push(clause.into());
        self
    }
}

/// Uninterpreted classification facets carried on a unit.
///
/// The core stores and exposes these; it never computes over them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
}

impl Classification {
    /// Builder: set scope
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Builder: set mode
    #[must_use]
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Builder: set synthesis
    #[must_use]
    pub fn synthesis(mut self, synthesis: impl Into<String>) -> Self {
        self.synthesis = Some(synthesis.into());
        self
    }

    /// Builder: set faculty
    #[must_use]
    pub fn faculty(mut self, faculty: impl Into<String>) -> Self {
        self.faculty = Some(faculty.into());
        self
    }

    /// Builder: set lens
    #[must_use]
    pub fn lens(mut self, lens: impl Into<String>) -> Self {
        self.lens = Some(lens.into());
        self
    }
}

/// One self-contained body of commentary with its chunks and annotations.
///
/// Units are built once by authoring code, optionally grown through extension
/// batches, and become immutable once registered (the registry's `extend`
/// operation is the only sanctioned mutation path after that).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Unit {
    /// Globally unique canonical id
    pub id: UnitId,

    /// Short dot-free token other units use to qualify references to this
    /// unit's ontology entries (`alias.term`)
    pub alias: String,

    /// Human title
    pub title: String,

    /// Opaque classification facets
    #[serde(default)]
    pub classification: Classification,

    /// Ordered chunks; ids unique within the unit
    pub chunks: Vec<Chunk>,

    /// Ordered HLOs; ids unique within the unit
    pub hlos: Vec<Hlo>,

    /// Ontology term name → descriptive text; seeds the unit's symbol table
    #[serde(default)]
    pub ontology: BTreeMap<String, String>,
}

impl Unit {
    /// Create a new empty unit
    pub fn new(id: UnitId, alias: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            alias: alias.into(),
            title: title.into(),
            classification: Classification::default(),
            chunks: Vec::new(),
            hlos: Vec::new(),
            ontology: BTreeMap::new(),
        }
    }

    /// Builder: set classification facets
    #[must_use]
    pub fn classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
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
        self.ontology.insert(name.into(), text.into());
        self
    }

    /// Find a chunk by id
    #[must_use]
    pub fn chunk_by_id(&self, id: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    /// Find an HLO by id
    #[must_use]
    pub fn hlo_by_id(&self, id: &str) -> Option<&Hlo> {
        self.hlos.iter().find(|h| h.id == id)
    }
}
