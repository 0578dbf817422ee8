//! # cellgraph-formula
//!
//! Formula reference extraction and dependency graph queries for cellgraph.
//!
//! This crate provides:
//! - Lexical reference extraction (formula text → referenced cells)
//! - Dependency graph construction from workbook cell records
//! - Upstream / downstream reachability over the built graph
//!
//! ## Example
//!
//! ```rust
//! use cellgraph_core::{CellId, CellRecord};
//! use cellgraph_formula::{ancestors, GraphBuilder};
//!
//! let cells = vec![
//!     CellRecord::new("Sheet1", "A1", Some("5")),
//!     CellRecord::new("Sheet1", "B1", Some("=A1*2")),
//! ];
//! let built = GraphBuilder::new().build(cells);
//!
//! let upstream = ancestors(&built.graph, &CellId::new("Sheet1", "B1")).unwrap();
//! assert!(upstream.contains(&CellId::new("Sheet1", "A1")));
//! ```

pub mod builder;
pub mod dependency;
pub mod error;
pub mod reachability;
pub mod references;

pub use builder::{BuildOutput, FormulaRecord, GraphBuilder};
pub use dependency::DependencyGraph;
pub use error::{GraphError, GraphResult};
pub use reachability::{ancestors, descendants, reachability, Reachable};
pub use references::{
    extract_references, LexicalExtractor, Reference, ReferenceExtractor, ReferenceKind,
};
