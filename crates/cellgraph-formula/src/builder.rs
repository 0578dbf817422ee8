//! Dependency graph construction from workbook cells

use ahash::AHashSet;
use cellgraph_core::{CellId, CellRecord};

use crate::dependency::DependencyGraph;
use crate::references::{LexicalExtractor, ReferenceExtractor};

/// A formula-bearing cell and its raw text (including the leading `=`)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormulaRecord {
    pub id: CellId,
    pub formula: String,
}

/// Result of [`GraphBuilder::build`]
#[derive(Debug, Default)]
pub struct BuildOutput {
    /// The dependency graph
    pub graph: DependencyGraph,
    /// One record per formula cell, in visit order
    pub formulas: Vec<FormulaRecord>,
}

/// Builds a [`DependencyGraph`] from the cells of a workbook
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder<E = LexicalExtractor> {
    extractor: E,
}

impl GraphBuilder {
    /// Builder using the lexical extractor
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: ReferenceExtractor> GraphBuilder<E> {
    /// Builder using a custom extractor
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    /// Build the graph
    ///
    /// Every visited cell becomes a node, formula or not. Each formula adds an
    /// edge from every cell it references to itself, creating nodes for
    /// referenced cells that were never visited. Visit order only affects the
    /// order nodes and formulas are listed in.
    pub fn build<I>(&self, cells: I) -> BuildOutput
    where
        I: IntoIterator<Item = CellRecord>,
    {
        let mut graph = DependencyGraph::new();
        let mut formulas = Vec::new();
        let mut recorded = AHashSet::new();

        for cell in cells {
            let id = cell.id();
            graph.add_node(id.clone());

            let Some(formula) = cell.formula() else {
                continue;
            };

            for reference in self.extractor.extract(&cell.sheet, formula) {
                graph.add_dependency(reference.id, id.clone());
            }

            if recorded.insert(id.clone()) {
                formulas.push(FormulaRecord {
                    id,
                    formula: formula.to_string(),
                });
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            formulas = formulas.len(),
            "built dependency graph"
        );

        BuildOutput { graph, formulas }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::references::Reference;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn cell(sheet: &str, coord: &str, raw: &str) -> CellRecord {
        CellRecord::new(sheet, coord, Some(raw))
    }

    fn edge_strings(graph: &DependencyGraph) -> Vec<(String, String)> {
        graph
            .edges()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    #[test]
    fn test_build_chain() {
        let built = GraphBuilder::new().build(vec![
            cell("Sheet1", "A1", "5"),
            cell("Sheet1", "B1", "=A1*2"),
            cell("Sheet1", "C1", "=B1+Sheet2!D1"),
        ]);

        let nodes: Vec<String> = built.graph.nodes().map(ToString::to_string).collect();
        assert_eq!(nodes, vec!["Sheet1!A1", "Sheet1!B1", "Sheet1!C1", "Sheet2!D1"]);

        assert_eq!(
            edge_strings(&built.graph),
            vec![
                ("Sheet1!A1".to_string(), "Sheet1!B1".to_string()),
                ("Sheet1!B1".to_string(), "Sheet1!C1".to_string()),
                ("Sheet2!D1".to_string(), "Sheet1!C1".to_string()),
            ]
        );

        assert_eq!(
            built.formulas,
            vec![
                FormulaRecord {
                    id: CellId::new("Sheet1", "B1"),
                    formula: "=A1*2".into(),
                },
                FormulaRecord {
                    id: CellId::new("Sheet1", "C1"),
                    formula: "=B1+Sheet2!D1".into(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_workbook() {
        let built = GraphBuilder::new().build(Vec::<CellRecord>::new());
        assert!(built.graph.is_empty());
        assert!(built.formulas.is_empty());
    }

    #[test]
    fn test_empty_and_literal_cells_are_nodes() {
        let built = GraphBuilder::new().build(vec![
            CellRecord::empty("S", "A1"),
            cell("S", "A2", "hello A1"),
        ]);

        assert_eq!(built.graph.node_count(), 2);
        assert_eq!(built.graph.edge_count(), 0);
        assert!(built.formulas.is_empty());
    }

    #[test]
    fn test_repeated_reference_makes_one_edge() {
        let built = GraphBuilder::new().build(vec![
            cell("S", "B1", "=A1+A1"),
            cell("S", "C1", "=SUM(A1,A1)"),
        ]);

        assert_eq!(built.graph.edge_count(), 2);
    }

    #[test]
    fn test_same_cell_listed_twice_keeps_one_formula() {
        let built = GraphBuilder::new().build(vec![
            cell("S", "B1", "=A1"),
            cell("S", "B1", "=A1"),
        ]);

        assert_eq!(built.formulas.len(), 1);
        assert_eq!(built.graph.edge_count(), 1);
    }

    #[test]
    fn test_custom_extractor() {
        let fixed = |_: &str, _: &str| {
            let mut refs = BTreeSet::new();
            refs.insert(Reference::cross_sheet("Fixed", "Z1"));
            refs
        };
        let built = GraphBuilder::with_extractor(fixed).build(vec![cell("S", "A1", "=B2")]);

        assert_eq!(
            edge_strings(&built.graph),
            vec![("Fixed!Z1".to_string(), "S!A1".to_string())]
        );
    }

    fn arb_cell() -> impl Strategy<Value = CellRecord> {
        (
            prop::sample::select(vec!["S1", "S2", "Data"]),
            "[A-D][1-5]",
            prop::option::of(prop_oneof!["[0-9]{1,3}", "=[A-D][1-5]\\+S2![A-D][1-5]"]),
        )
            .prop_map(|(sheet, coord, raw)| CellRecord::new(sheet, coord, raw))
    }

    proptest! {
        #[test]
        fn prop_every_visited_cell_is_a_node(cells in prop::collection::vec(arb_cell(), 0..40)) {
            let built = GraphBuilder::new().build(cells.clone());
            for cell in &cells {
                prop_assert!(built.graph.contains(&cell.id()));
            }
            for (from, to) in built.graph.edges() {
                prop_assert!(built.graph.contains(from));
                prop_assert!(built.graph.contains(to));
            }
        }
    }
}
