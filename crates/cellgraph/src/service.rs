//! Extraction and reachability requests
//!
//! [`DependencyService`] is what a transport layer talks to: one call turns a
//! workbook into a graph and publishes it, another answers reachability
//! questions against whatever graph is live.

use std::path::Path;
use std::sync::Arc;

use cellgraph_core::{CellId, CellRecord};
use cellgraph_formula::{
    reachability, FormulaRecord, GraphBuilder, LexicalExtractor, Reachable, ReferenceExtractor,
};
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};
use crate::open::{open_workbook, OpenOptions};
use crate::store::GraphStore;

/// A node entry of an extraction response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: CellId,
}

/// An edge of an extraction response: `target` depends on `source`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: CellId,
    pub target: CellId,
}

/// Everything extracted from one workbook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Every node, in first-seen order
    pub nodes: Vec<Node>,
    /// Distinct edges, in insertion order
    pub links: Vec<Link>,
    /// Formula cells, in visit order
    pub formulas: Vec<FormulaRecord>,
}

/// Builds graphs into a [`GraphStore`] and queries them
#[derive(Debug)]
pub struct DependencyService<E = LexicalExtractor> {
    store: Arc<GraphStore>,
    builder: GraphBuilder<E>,
    open_options: OpenOptions,
}

impl DependencyService {
    /// Service over `store` using the lexical extractor
    pub fn new(store: Arc<GraphStore>) -> Self {
        Self::with_builder(store, GraphBuilder::new())
    }
}

impl<E: ReferenceExtractor> DependencyService<E> {
    /// Service over `store` using a custom graph builder
    pub fn with_builder(store: Arc<GraphStore>, builder: GraphBuilder<E>) -> Self {
        Self {
            store,
            builder,
            open_options: OpenOptions::default(),
        }
    }

    /// Set the reader options used by [`DependencyService::upload`]
    pub fn with_open_options(mut self, options: OpenOptions) -> Self {
        self.open_options = options;
        self
    }

    /// Build a graph from `cells`, publish it, and describe it
    pub fn extract_and_build<I>(&self, cells: I) -> Extraction
    where
        I: IntoIterator<Item = CellRecord>,
    {
        let built = self.builder.build(cells);

        let extraction = Extraction {
            nodes: built
                .graph
                .nodes()
                .map(|id| Node { id: id.clone() })
                .collect(),
            links: built
                .graph
                .edges()
                .map(|(source, target)| Link {
                    source: source.clone(),
                    target: target.clone(),
                })
                .collect(),
            formulas: built.formulas,
        };

        self.store.replace(built.graph);
        tracing::info!(
            nodes = extraction.nodes.len(),
            links = extraction.links.len(),
            formulas = extraction.formulas.len(),
            "published dependency graph"
        );

        extraction
    }

    /// Read the workbook at `path` and [`extract_and_build`](Self::extract_and_build) it
    ///
    /// `None` means no workbook was supplied. A workbook that fails to read
    /// leaves the live graph untouched.
    pub fn upload<P: AsRef<Path>>(&self, path: Option<P>) -> ServiceResult<Extraction> {
        let path = path.ok_or(ServiceError::NoWorkbookProvided)?;
        let cells = open_workbook(path.as_ref(), &self.open_options)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            cells = cells.len(),
            "read workbook"
        );
        Ok(self.extract_and_build(cells))
    }

    /// Upstream and downstream cells of `node` (a `Sheet!Coordinate` string)
    /// in the live graph
    pub fn query_reachability(&self, node: &str) -> ServiceResult<Reachable> {
        let graph = self.store.current().ok_or(ServiceError::NoGraphAvailable)?;
        let id = CellId::parse(node).map_err(|_| ServiceError::NodeNotFound(node.to_string()))?;
        Ok(reachability(&graph, &id)?)
    }
}
