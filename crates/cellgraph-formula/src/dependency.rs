//! Dependency graph between workbook cells

use ahash::{AHashMap, AHashSet};
use cellgraph_core::CellId;

/// Dependency graph for a workbook
///
/// Nodes are interned [`CellId`]s listed in first-seen order. An edge
/// `precedent → dependent` means the dependent's value is computed from the
/// precedent. Both directions are kept as adjacency lists so upstream and
/// downstream walks cost the same.
///
/// Edges are unique per (precedent, dependent) pair. Self-loops and longer
/// cycles are allowed.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    nodes: Vec<CellId>,
    index: AHashMap<CellId, usize>,
    /// Node → nodes that depend on it (dependents)
    dependents: Vec<Vec<usize>>,
    /// Node → nodes it depends on (precedents)
    precedents: Vec<Vec<usize>>,
    /// Edges in insertion order
    edges: Vec<(usize, usize)>,
    edge_set: AHashSet<(usize, usize)>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its index; existing nodes keep their index
    pub fn add_node(&mut self, id: CellId) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(id.clone(), idx);
        self.nodes.push(id);
        self.dependents.push(Vec::new());
        self.precedents.push(Vec::new());
        idx
    }

    /// Add a dependency: `dependent` depends on `precedent`
    ///
    /// Both cells become nodes. Returns `false` if the edge already existed.
    pub fn add_dependency(&mut self, precedent: CellId, dependent: CellId) -> bool {
        let from = self.add_node(precedent);
        let to = self.add_node(dependent);
        if !self.edge_set.insert((from, to)) {
            return false;
        }
        self.dependents[from].push(to);
        self.precedents[to].push(from);
        self.edges.push((from, to));
        true
    }

    /// Whether `id` is a node of this graph
    pub fn contains(&self, id: &CellId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in first-seen order
    pub fn nodes(&self) -> impl Iterator<Item = &CellId> + '_ {
        self.nodes.iter()
    }

    /// Edges as `(precedent, dependent)` in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&CellId, &CellId)> + '_ {
        self.edges
            .iter()
            .map(|&(from, to)| (&self.nodes[from], &self.nodes[to]))
    }

    /// Get cells that directly depend on the given cell
    pub fn get_dependents(&self, id: &CellId) -> impl Iterator<Item = &CellId> + '_ {
        self.neighbors(id, &self.dependents)
    }

    /// Get cells the given cell directly depends on
    pub fn get_precedents(&self, id: &CellId) -> impl Iterator<Item = &CellId> + '_ {
        self.neighbors(id, &self.precedents)
    }

    fn neighbors<'a>(
        &'a self,
        id: &CellId,
        adjacency: &'a [Vec<usize>],
    ) -> impl Iterator<Item = &'a CellId> + 'a {
        self.index
            .get(id)
            .into_iter()
            .flat_map(move |&idx| adjacency[idx].iter().map(move |&n| &self.nodes[n]))
    }

    pub(crate) fn index_of(&self, id: &CellId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn node(&self, idx: usize) -> &CellId {
        &self.nodes[idx]
    }

    pub(crate) fn dependents_of(&self, idx: usize) -> &[usize] {
        &self.dependents[idx]
    }

    pub(crate) fn precedents_of(&self, idx: usize) -> &[usize] {
        &self.precedents[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CellId {
        CellId::parse(s).unwrap()
    }

    #[test]
    fn test_add_dependency() {
        let mut graph = DependencyGraph::new();

        let a1 = id("Sheet1!A1");
        let b1 = id("Sheet1!B1");

        assert!(graph.add_dependency(a1.clone(), b1.clone()));

        assert!(graph.get_dependents(&a1).any(|c| *c == b1));
        assert!(graph.get_precedents(&b1).any(|c| *c == a1));
        assert_eq!(graph.get_precedents(&a1).count(), 0);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut graph = DependencyGraph::new();

        assert!(graph.add_dependency(id("S!A1"), id("S!B1")));
        assert!(!graph.add_dependency(id("S!A1"), id("S!B1")));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.get_dependents(&id("S!A1")).count(), 1);
    }

    #[test]
    fn test_nodes_keep_first_seen_order() {
        let mut graph = DependencyGraph::new();

        graph.add_node(id("S!C1"));
        graph.add_dependency(id("S!A1"), id("S!C1"));
        graph.add_node(id("S!A1"));

        let nodes: Vec<String> = graph.nodes().map(ToString::to_string).collect();
        assert_eq!(nodes, vec!["S!C1", "S!A1"]);
    }

    #[test]
    fn test_self_loop() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(id("S!A1"), id("S!A1"));

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.get_dependents(&id("S!A1")).any(|c| *c == id("S!A1")));
    }

    #[test]
    fn test_unknown_node_has_no_neighbors() {
        let graph = DependencyGraph::new();
        assert!(!graph.contains(&id("S!A1")));
        assert_eq!(graph.get_dependents(&id("S!A1")).count(), 0);
        assert!(graph.is_empty());
    }
}
