//! Upstream and downstream reachability
//!
//! Walks are breadth-first over an explicit queue with a visited bitmap, so
//! each node and edge is touched at most once and cycles cannot loop. The start
//! node is not marked visited up front: it shows up in its own result exactly
//! when a cycle leads back to it.

use std::collections::{BTreeSet, VecDeque};

use cellgraph_core::CellId;

use crate::dependency::DependencyGraph;
use crate::error::{GraphError, GraphResult};

/// Both reachability sets of one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reachable {
    /// Ancestors: everything the node transitively depends on
    pub upstream: BTreeSet<CellId>,
    /// Descendants: everything that transitively depends on the node
    pub downstream: BTreeSet<CellId>,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Upstream,
    Downstream,
}

/// All nodes with a directed path into `node`
pub fn ancestors(graph: &DependencyGraph, node: &CellId) -> GraphResult<BTreeSet<CellId>> {
    walk(graph, node, Direction::Upstream)
}

/// All nodes reachable from `node`
pub fn descendants(graph: &DependencyGraph, node: &CellId) -> GraphResult<BTreeSet<CellId>> {
    walk(graph, node, Direction::Downstream)
}

/// Ancestors and descendants of `node`
pub fn reachability(graph: &DependencyGraph, node: &CellId) -> GraphResult<Reachable> {
    Ok(Reachable {
        upstream: ancestors(graph, node)?,
        downstream: descendants(graph, node)?,
    })
}

fn walk(
    graph: &DependencyGraph,
    node: &CellId,
    direction: Direction,
) -> GraphResult<BTreeSet<CellId>> {
    let start = graph
        .index_of(node)
        .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?;

    let mut visited = vec![false; graph.node_count()];
    let mut queue = VecDeque::from([start]);
    let mut found = BTreeSet::new();

    while let Some(current) = queue.pop_front() {
        let next = match direction {
            Direction::Upstream => graph.precedents_of(current),
            Direction::Downstream => graph.dependents_of(current),
        };
        for &n in next {
            if !visited[n] {
                visited[n] = true;
                found.insert(graph.node(n).clone());
                queue.push_back(n);
            }
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn id(s: &str) -> CellId {
        CellId::parse(s).unwrap()
    }

    fn set(ids: &[&str]) -> BTreeSet<CellId> {
        ids.iter().map(|s| id(s)).collect()
    }

    fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (from, to) in edges {
            graph.add_dependency(id(from), id(to));
        }
        graph
    }

    #[test]
    fn test_chain() {
        let g = graph(&[
            ("Sheet1!A1", "Sheet1!B1"),
            ("Sheet1!B1", "Sheet1!C1"),
            ("Sheet2!D1", "Sheet1!C1"),
        ]);

        assert_eq!(
            ancestors(&g, &id("Sheet1!C1")).unwrap(),
            set(&["Sheet1!A1", "Sheet1!B1", "Sheet2!D1"])
        );
        assert_eq!(
            descendants(&g, &id("Sheet1!A1")).unwrap(),
            set(&["Sheet1!B1", "Sheet1!C1"])
        );
        assert!(ancestors(&g, &id("Sheet1!A1")).unwrap().is_empty());
        assert!(descendants(&g, &id("Sheet1!C1")).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_node() {
        let g = graph(&[("S!A1", "S!B1")]);
        assert_eq!(
            ancestors(&g, &id("S!Z9")),
            Err(GraphError::NodeNotFound("S!Z9".into()))
        );
        assert!(descendants(&g, &id("Other!A1")).is_err());
    }

    #[test]
    fn test_isolated_node_has_empty_sets() {
        let mut g = DependencyGraph::new();
        g.add_node(id("S!A1"));
        assert_eq!(reachability(&g, &id("S!A1")).unwrap(), Reachable::default());
    }

    #[test]
    fn test_cycle_includes_start() {
        // A1 -> B1 -> C1 -> A1
        let g = graph(&[("S!A1", "S!B1"), ("S!B1", "S!C1"), ("S!C1", "S!A1")]);

        let all = set(&["S!A1", "S!B1", "S!C1"]);
        for node in ["S!A1", "S!B1", "S!C1"] {
            assert_eq!(ancestors(&g, &id(node)).unwrap(), all);
            assert_eq!(descendants(&g, &id(node)).unwrap(), all);
        }
    }

    #[test]
    fn test_self_loop() {
        let g = graph(&[("S!A1", "S!A1"), ("S!A1", "S!B1")]);
        assert_eq!(ancestors(&g, &id("S!A1")).unwrap(), set(&["S!A1"]));
        assert_eq!(descendants(&g, &id("S!A1")).unwrap(), set(&["S!A1", "S!B1"]));
        assert_eq!(ancestors(&g, &id("S!B1")).unwrap(), set(&["S!A1"]));
    }

    #[test]
    fn test_cycle_downstream_only() {
        // B1 <-> C1 cycle fed by A1; A1 is not on the cycle
        let g = graph(&[("S!A1", "S!B1"), ("S!B1", "S!C1"), ("S!C1", "S!B1")]);
        assert_eq!(descendants(&g, &id("S!A1")).unwrap(), set(&["S!B1", "S!C1"]));
        assert!(ancestors(&g, &id("S!A1")).unwrap().is_empty());
    }

    #[test]
    fn test_diamond_counted_once() {
        let g = graph(&[
            ("S!A1", "S!B1"),
            ("S!A1", "S!C1"),
            ("S!B1", "S!D1"),
            ("S!C1", "S!D1"),
        ]);
        assert_eq!(
            ancestors(&g, &id("S!D1")).unwrap(),
            set(&["S!A1", "S!B1", "S!C1"])
        );
    }

    #[test]
    fn test_wide_fan_out() {
        let mut g = DependencyGraph::new();
        for row in 1..=10_000 {
            g.add_dependency(id("S!A1"), CellId::new("S", format!("B{row}")));
        }
        assert_eq!(descendants(&g, &id("S!A1")).unwrap().len(), 10_000);
        assert_eq!(ancestors(&g, &id("S!B5000")).unwrap(), set(&["S!A1"]));
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let mut g = DependencyGraph::new();
        for row in 1..100_000 {
            g.add_dependency(
                CellId::new("S", format!("A{row}")),
                CellId::new("S", format!("A{}", row + 1)),
            );
        }
        assert_eq!(ancestors(&g, &id("S!A100000")).unwrap().len(), 99_999);
    }

    /// Transitive closure by repeated relaxation, for comparison
    fn closure(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<bool>> {
        let mut reach = vec![vec![false; n]; n];
        for &(a, b) in edges {
            reach[a][b] = true;
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    if reach[i][k] && reach[k][j] {
                        reach[i][j] = true;
                    }
                }
            }
        }
        reach
    }

    fn node_id(i: usize) -> CellId {
        CellId::new("S", format!("A{}", i + 1))
    }

    proptest! {
        #[test]
        fn prop_matches_transitive_closure(
            n in 1usize..12,
            raw_edges in prop::collection::vec((0usize..12, 0usize..12), 0..40),
        ) {
            let edges: Vec<(usize, usize)> = raw_edges
                .into_iter()
                .filter(|&(a, b)| a < n && b < n)
                .collect();

            let mut g = DependencyGraph::new();
            for i in 0..n {
                g.add_node(node_id(i));
            }
            for &(a, b) in &edges {
                g.add_dependency(node_id(a), node_id(b));
            }

            let reach = closure(n, &edges);
            for v in 0..n {
                let up = ancestors(&g, &node_id(v)).unwrap();
                let down = descendants(&g, &node_id(v)).unwrap();
                for u in 0..n {
                    prop_assert_eq!(up.contains(&node_id(u)), reach[u][v]);
                    prop_assert_eq!(down.contains(&node_id(u)), reach[v][u]);
                }
                // start node only appears via a cycle
                prop_assert_eq!(up.contains(&node_id(v)), reach[v][v]);
            }
        }
    }
}
