use corpus_model::UnitId;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Edge payload: which of the target unit's symbols the source unit cites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefEdge {
    /// Cited symbol names, deduplicated
    pub symbols: BTreeSet<String>,
}

impl RefEdge {
    /// Number of distinct symbols cited along this edge
    #[must_use]
    pub fn weight(&self) -> usize {
        self.symbols.len()
    }
}

/// Derived directed graph of resolved cross-unit references.
///
/// One node per registered unit, one edge per citing/cited unit pair.
/// Pending (unresolved) references never appear as edges; self-citations are
/// resolved but not recorded as edges. Like the tag index, the graph is
/// rebuilt-for-unit when a unit is extended.
#[derive(Debug, Default)]
pub struct CorpusGraph {
    graph: DiGraph<UnitId, RefEdge>,
    index: HashMap<UnitId, NodeIndex>,
}

impl CorpusGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node for a unit (idempotent)
    pub(crate) fn add_unit(&mut self, id: &UnitId) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.index.insert(id.clone(), idx);
        idx
    }

    /// Record that `from` cites `symbol` of `to`
    pub(crate) fn add_reference(&mut self, from: &UnitId, to: &UnitId, symbol: &str) {
        let from_idx = self.add_unit(from);
        let to_idx = self.add_unit(to);
        let edge = match self.graph.find_edge(from_idx, to_idx) {
            Some(edge) => edge,
            None => self.graph.add_edge(from_idx, to_idx, RefEdge::default()),
        };
        if let Some(weight) = self.graph.edge_weight_mut(edge) {
            weight.symbols.insert(symbol.to_string());
        }
    }

    /// Drop every outgoing edge of a unit (extension rebuilds are total for
    /// the unit's own citations; edges pointing at it are untouched)
    pub(crate) fn clear_outgoing(&mut self, from: &UnitId) {
        let Some(&from_idx) = self.index.get(from) else {
            return;
        };
        self.graph.retain_edges(|graph, edge| {
            graph
                .edge_endpoints(edge)
                .map_or(true, |(source, _)| source != from_idx)
        });
    }

    /// Units this unit cites
    #[must_use]
    pub fn cites(&self, id: &UnitId) -> Vec<&UnitId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Units citing this unit
    #[must_use]
    pub fn cited_by(&self, id: &UnitId) -> Vec<&UnitId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// The citation edge between two units, if any
    #[must_use]
    pub fn citation(&self, from: &UnitId, to: &UnitId) -> Option<&RefEdge> {
        let from_idx = *self.index.get(from)?;
        let to_idx = *self.index.get(to)?;
        let edge = self.graph.find_edge(from_idx, to_idx)?;
        self.graph.edge_weight(edge)
    }

    /// Units related to this one within `max_depth` citation hops, in either
    /// direction. Returns `(unit, distance)` pairs, nearest first.
    #[must_use]
    pub fn related(&self, id: &UnitId, max_depth: usize) -> Vec<(&UnitId, usize)> {
        let Some(&start) = self.index.get(id) else {
            return Vec::new();
        };

        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        let mut result = Vec::new();

        while let Some((current, depth)) = queue.pop_front() {
            if current != start {
                result.push((&self.graph[current], depth));
            }
            if depth == max_depth {
                continue;
            }
            for neighbor in self.graph.neighbors_undirected(current) {
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }
        result
    }

    /// Number of units in the graph
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of citing/cited unit pairs
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn neighbors(&self, id: &UnitId, direction: Direction) -> Vec<&UnitId> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, direction)
            .map(|n| &self.graph[n])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_model::make_unit_id;

    fn id(key: &str) -> UnitId {
        make_unit_id("ys", key).unwrap()
    }

    #[test]
    fn test_citation_edges_accumulate_symbols() {
        let mut graph = CorpusGraph::new();
        let (a, b) = (id("iv.17"), id("iv.15"));
        graph.add_reference(&a, &b, "vibhaga");
        graph.add_reference(&a, &b, "svatantra");

        assert_eq!(graph.unit_count(), 2);
        assert_eq!(graph.reference_count(), 1);
        let edge = graph.citation(&a, &b).unwrap();
        assert_eq!(edge.weight(), 2);
        assert_eq!(graph.cites(&a), vec![&b]);
        assert_eq!(graph.cited_by(&b), vec![&a]);
        assert!(graph.cites(&b).is_empty());
    }

    #[test]
    fn test_clear_outgoing_keeps_incoming() {
        let mut graph = CorpusGraph::new();
        let (a, b, c) = (id("iv.15"), id("iv.16"), id("iv.17"));
        graph.add_reference(&a, &b, "x");
        graph.add_reference(&c, &a, "y");

        graph.clear_outgoing(&a);
        assert!(graph.cites(&a).is_empty());
        assert_eq!(graph.cited_by(&a), vec![&c]);
    }

    #[test]
    fn test_related_is_depth_bounded() {
        let mut graph = CorpusGraph::new();
        let (a, b, c, d) = (id("i.41"), id("i.42"), id("i.43"), id("i.44"));
        graph.add_reference(&a, &b, "x");
        graph.add_reference(&b, &c, "y");
        graph.add_reference(&c, &d, "z");

        let related: Vec<_> = graph.related(&a, 2).into_iter().collect();
        assert_eq!(related, vec![(&b, 1), (&c, 2)]);
        assert_eq!(graph.related(&a, 0), Vec::<(&UnitId, usize)>::new());
    }
}
