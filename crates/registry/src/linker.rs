use crate::error::{RegistryError, Result};
use crate::scan::{self, QualifiedName};
use corpus_model::{Unit, UnitId};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A qualified reference extracted from a specific HLO's clauses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClauseReference {
    /// Id of the HLO whose clause carries the reference
    pub hlo: String,

    /// The dotted name as written
    pub name: QualifiedName,
}

/// A reference whose target alias or symbol was unknown when its unit was
/// admitted.
///
/// Pending references are re-checked whenever a later unit registers or an
/// extension adds ontology entries; anything still pending when the load is
/// declared complete becomes part of the aggregated
/// [`RegistryError::UnresolvedSymbols`] report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingReference {
    /// Unit whose clause carries the reference
    pub unit: UnitId,

    /// HLO whose clause carries the reference
    pub hlo: String,

    /// Referenced unit alias
    pub alias: String,

    /// Referenced symbol name
    pub symbol: String,
}

impl fmt::Display for PendingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} -> {}.{}",
            self.unit, self.hlo, self.alias, self.symbol
        )
    }
}

/// Validate a candidate unit's intra-unit structure and extract every
/// qualified reference its clauses carry.
///
/// Two phases, mirroring registration: first the structural gate (chunk and
/// HLO id uniqueness, every `chunk_id` resolving within the unit), then
/// clause scanning. Structural failures abort the whole admission; extracted
/// references are resolved or deferred by the registry.
pub fn link_unit(unit: &Unit) -> Result<Vec<ClauseReference>> {
    let mut chunk_ids = HashSet::new();
    for chunk in &unit.chunks {
        if !chunk_ids.insert(chunk.id.as_str()) {
            return Err(RegistryError::DuplicateChunkId {
                unit: unit.id.clone(),
                chunk: chunk.id.clone(),
            });
        }
    }

    let mut hlo_ids = HashSet::new();
    for hlo in &unit.hlos {
        if !hlo_ids.insert(hlo.id.as_str()) {
            return Err(RegistryError::DuplicateHloId {
                unit: unit.id.clone(),
                hlo: hlo.id.clone(),
            });
        }
        if !chunk_ids.contains(hlo.chunk_id.as_str()) {
            return Err(RegistryError::DanglingChunkReference {
                unit: unit.id.clone(),
                hlo: hlo.id.clone(),
                chunk: hlo.chunk_id.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    let mut refs = Vec::new();
    for hlo in &unit.hlos {
        for clause in &hlo.clauses {
            for name in scan::references(clause) {
                let reference = ClauseReference {
                    hlo: hlo.id.clone(),
                    name,
                };
                if seen.insert(reference.clone()) {
                    refs.push(reference);
                }
            }
        }
    }
    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_model::{make_unit_id, Chunk, Hlo, Unit};

    fn base_unit() -> Unit {
        Unit::new(make_unit_id("ys", "i.45").unwrap(), "subtlety", "The subtle terminates")
            .chunk(Chunk::new("c1", "Subtle objects", "Subtlety ends in the unmarked."))
    }

    #[test]
    fn test_valid_unit_yields_references() {
        let unit = base_unit().hlo(
            Hlo::new("h1", "c1", "Descent")
                .clause("subtle := descent(gross)")
                .clause("terminus := alinga and seer.purusha"),
        );
        let refs = link_unit(&unit).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].hlo, "h1");
        assert_eq!(refs[0].name.alias, "seer");
        assert_eq!(refs[0].name.symbol, "purusha");
    }

    #[test]
    fn test_duplicate_chunk_id_rejected() {
        let unit = base_unit().chunk(Chunk::new("c1", "Again", "duplicate"));
        match link_unit(&unit).unwrap_err() {
            RegistryError::DuplicateChunkId { chunk, .. } => assert_eq!(chunk, "c1"),
            other => panic!("expected DuplicateChunkId, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_hlo_id_rejected() {
        let unit = base_unit()
            .hlo(Hlo::new("h1", "c1", "First"))
            .hlo(Hlo::new("h1", "c1", "Second"));
        match link_unit(&unit).unwrap_err() {
            RegistryError::DuplicateHloId { hlo, .. } => assert_eq!(hlo, "h1"),
            other => panic!("expected DuplicateHloId, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_chunk_reference_names_the_hlo() {
        let unit = base_unit().hlo(Hlo::new("h2", "c9", "Orphan"));
        match link_unit(&unit).unwrap_err() {
            RegistryError::DanglingChunkReference { hlo, chunk, .. } => {
                assert_eq!(hlo, "h2");
                assert_eq!(chunk, "c9");
            }
            other => panic!("expected DanglingChunkReference, got {other:?}"),
        }
    }

    #[test]
    fn test_repeated_references_deduplicated() {
        let unit = base_unit().hlo(
            Hlo::new("h1", "c1", "Repeats")
                .clause("seer.purusha")
                .clause("seer.purusha again"),
        );
        assert_eq!(link_unit(&unit).unwrap().len(), 1);
    }
}
