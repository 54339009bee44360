use crate::error::{RegistryError, Result};
use crate::graph::CorpusGraph;
use crate::linker::{self, ClauseReference, PendingReference};
use crate::merger::ExtensionBatch;
use crate::store::{MemoryStore, UnitStore};
use crate::symbols::SymbolTable;
use crate::tag_index::{HloKey, TagIndex};
use corpus_model::{Unit, UnitId};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Corpus-level counters, reported when a load completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub units: usize,
    pub chunks: usize,
    pub hlos: usize,
    pub symbols: usize,
    pub tag_entries: usize,
    pub pending_references: usize,
}

/// The central store: owns the canonical copy of every registered unit and
/// every derived view (symbol tables, tag index, reference graph).
///
/// Registration is all-or-nothing: the linker and tag index build run as a
/// single gate, and a unit that fails any part of it is not admitted; there
/// is no partially-visible unit. Single-writer by construction: every
/// mutating operation takes `&mut self`.
pub struct UnitRegistry {
    store: Box<dyn UnitStore>,
    aliases: HashMap<String, UnitId>,
    symbols: HashMap<UnitId, SymbolTable>,
    tags: TagIndex,
    graph: CorpusGraph,
    pending: Vec<PendingReference>,
}

impl UnitRegistry {
    /// Create a registry backed by the default in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    /// Create a registry with an injected backing store
    #[must_use]
    pub fn with_store(store: Box<dyn UnitStore>) -> Self {
        Self {
            store,
            aliases: HashMap::new(),
            symbols: HashMap::new(),
            tags: TagIndex::new(),
            graph: CorpusGraph::new(),
            pending: Vec::new(),
        }
    }

    /// Register a fully constructed unit.
    ///
    /// Fails with [`RegistryError::DuplicateUnitId`] /
    /// [`RegistryError::DuplicateUnitAlias`] before validation, and with the
    /// linker's structural errors if the gate rejects the unit. References
    /// to units not yet registered are deferred, not fatal; they are
    /// re-checked on every later registration and merge.
    pub fn register(&mut self, unit: Unit) -> Result<()> {
        if self.store.contains(&unit.id) {
            return Err(RegistryError::DuplicateUnitId(unit.id));
        }
        validate_alias(&unit)?;
        if let Some(existing) = self.aliases.get(&unit.alias) {
            return Err(RegistryError::DuplicateUnitAlias {
                alias: unit.alias.clone(),
                existing: existing.clone(),
            });
        }

        let refs = linker::link_unit(&unit)?;
        let table = SymbolTable::from_ontology(&unit.ontology);
        let (resolved, new_pending) = self.resolve_references(&unit.id, &unit.alias, &table, refs);

        // Gate passed; everything below is commit.
        self.tags.index_unit(&unit);
        self.graph.add_unit(&unit.id);
        for (target, symbol) in resolved {
            self.graph.add_reference(&unit.id, &target, &symbol);
        }
        self.aliases.insert(unit.alias.clone(), unit.id.clone());
        self.symbols.insert(unit.id.clone(), table);
        self.pending.extend(new_pending);
        self.retry_pending();

        log::info!(
            "Registered unit {} ({} chunks, {} HLOs, {} pending refs total)",
            unit.id,
            unit.chunks.len(),
            unit.hlos.len(),
            self.pending.len()
        );
        self.store.insert(unit);
        Ok(())
    }

    /// Look up a registered unit
    pub fn get(&self, id: &UnitId) -> Result<&Unit> {
        self.store
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    /// Iterate all registered units in registration order.
    ///
    /// The sequence is lazy and restartable; insertion order is meaningful
    /// for reproducible exports.
    pub fn all(&self) -> impl Iterator<Item = &Unit> {
        self.store.iter()
    }

    /// Resolve a qualified cross-unit reference against the registered
    /// symbol tables
    pub fn resolve_symbol(&self, alias: &str, symbol: &str) -> Result<&str> {
        let unresolved = || RegistryError::UnresolvedSymbol {
            alias: alias.to_string(),
            symbol: symbol.to_string(),
        };
        let id = self.aliases.get(alias).ok_or_else(unresolved)?;
        let table = self.symbols.get(id).ok_or_else(unresolved)?;
        table.get(symbol).ok_or_else(unresolved)
    }

    /// Merge an extension batch into an already-registered unit.
    ///
    /// The batch is applied to a candidate copy, the full admission gate
    /// re-runs, and only then does the updated unit replace the old one, so
    /// readers never observe a half-merged unit. The unit's tag postings and
    /// outgoing citations are rebuilt in full, not patched.
    pub fn extend(&mut self, id: &UnitId, batch: ExtensionBatch) -> Result<()> {
        let current = self
            .store
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        let mut candidate = current.clone();
        batch.apply_to(&mut candidate)?;

        let refs = linker::link_unit(&candidate)?;
        let table = SymbolTable::from_ontology(&candidate.ontology);
        let (resolved, new_pending) =
            self.resolve_references(&candidate.id, &candidate.alias, &table, refs);

        // Commit: total rebuild of this unit's derived views.
        self.tags.remove_unit(id);
        self.tags.index_unit(&candidate);
        self.graph.clear_outgoing(id);
        for (target, symbol) in resolved {
            self.graph.add_reference(id, &target, &symbol);
        }
        self.pending.retain(|p| p.unit != *id);
        self.pending.extend(new_pending);
        self.symbols.insert(id.clone(), table);

        log::info!(
            "Extended unit {} ({} chunks, {} HLOs after merge)",
            id,
            candidate.chunks.len(),
            candidate.hlos.len()
        );
        self.store.replace(candidate);
        self.retry_pending();
        Ok(())
    }

    /// Declare the corpus fully loaded.
    ///
    /// Unresolved references are soft failures while units are still
    /// arriving; here they harden into one aggregated report naming every
    /// dangling qualified name and its referencing unit and HLO.
    pub fn complete_load(&mut self) -> Result<LoadStats> {
        self.retry_pending();
        if !self.pending.is_empty() {
            return Err(RegistryError::UnresolvedSymbols(self.pending.clone()));
        }
        let stats = self.stats();
        log::info!(
            "Corpus load complete: {} units, {} chunks, {} HLOs, {} tag entries",
            stats.units,
            stats.chunks,
            stats.hlos,
            stats.tag_entries
        );
        Ok(stats)
    }

    /// Query the tag index; `value: None` unions all values of the key
    #[must_use]
    pub fn by_tag(&self, key: &str, value: Option<&str>) -> BTreeSet<HloKey> {
        self.tags.by_tag(key, value)
    }

    /// All tag keys present in the corpus
    #[must_use]
    pub fn tag_keys(&self) -> BTreeSet<&str> {
        self.tags.keys()
    }

    /// The derived graph of resolved cross-unit references
    #[must_use]
    pub fn reference_graph(&self) -> &CorpusGraph {
        &self.graph
    }

    /// References still waiting for their target unit or symbol
    #[must_use]
    pub fn pending_references(&self) -> &[PendingReference] {
        &self.pending
    }

    /// Current corpus counters
    #[must_use]
    pub fn stats(&self) -> LoadStats {
        let (mut chunks, mut hlos) = (0, 0);
        for unit in self.store.iter() {
            chunks += unit.chunks.len();
            hlos += unit.hlos.len();
        }
        LoadStats {
            units: self.store.len(),
            chunks,
            hlos,
            symbols: self.symbols.values().map(SymbolTable::len).sum(),
            tag_entries: self.tags.entry_count(),
            pending_references: self.pending.len(),
        }
    }

    /// Split extracted references into resolved `(target unit, symbol)`
    /// pairs and pending ones. The candidate's own table is consulted for
    /// self-references, since it is not committed yet.
    fn resolve_references(
        &self,
        unit_id: &UnitId,
        unit_alias: &str,
        own_table: &SymbolTable,
        refs: Vec<ClauseReference>,
    ) -> (Vec<(UnitId, String)>, Vec<PendingReference>) {
        let mut resolved = Vec::new();
        let mut pending = Vec::new();

        for reference in refs {
            let target = if reference.name.alias == unit_alias {
                Some((unit_id, own_table))
            } else {
                self.aliases
                    .get(&reference.name.alias)
                    .and_then(|id| self.symbols.get(id).map(|table| (id, table)))
            };

            match target {
                Some((target_id, table)) if table.contains(&reference.name.symbol) => {
                    // Self-citations resolve but are not graph edges
                    if target_id != unit_id {
                        resolved.push((target_id.clone(), reference.name.symbol));
                    }
                }
                _ => pending.push(PendingReference {
                    unit: unit_id.clone(),
                    hlo: reference.hlo,
                    alias: reference.name.alias,
                    symbol: reference.name.symbol,
                }),
            }
        }
        (resolved, pending)
    }

    /// Opportunistic re-check of deferred references against the current
    /// alias and symbol tables
    fn retry_pending(&mut self) {
        let mut still_pending = Vec::new();
        for reference in std::mem::take(&mut self.pending) {
            let target = self
                .aliases
                .get(&reference.alias)
                .filter(|id| {
                    self.symbols
                        .get(*id)
                        .map_or(false, |table| table.contains(&reference.symbol))
                })
                .cloned();

            match target {
                Some(target_id) => {
                    log::debug!("Resolved deferred reference {reference}");
                    if target_id != reference.unit {
                        self.graph
                            .add_reference(&reference.unit, &target_id, &reference.symbol);
                    }
                }
                None => still_pending.push(reference),
            }
        }
        self.pending = still_pending;
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_alias(unit: &Unit) -> Result<()> {
    let alias = unit.alias.as_str();
    let mut chars = alias.chars();
    let head_ok = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if head_ok && tail_ok {
        Ok(())
    } else {
        Err(RegistryError::InvalidAlias {
            unit: unit.id.clone(),
            alias: alias.to_string(),
            reason: "aliases are identifier-shaped: ASCII letter or '_' first, then letters, digits, '_'".to_string(),
        })
    }
}
