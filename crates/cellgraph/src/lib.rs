//! # cellgraph
//!
//! Extract cell-to-cell formula dependencies from spreadsheets and answer
//! "what feeds this cell" / "what does this cell feed" queries.
//!
//! ## Features
//!
//! - Read XLSX and CSV workbooks into `(sheet, coordinate, raw value)` cells
//! - Lexical extraction of same-sheet (`B2`) and cross-sheet (`Data!B2`) references
//! - One live dependency graph per [`GraphStore`], replaced on every build
//! - Upstream / downstream reachability that terminates on circular formulas
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cellgraph::{CellRecord, DependencyService, GraphStore};
//!
//! let service = DependencyService::new(Arc::new(GraphStore::new()));
//!
//! let extraction = service.extract_and_build(vec![
//!     CellRecord::new("Sheet1", "A1", Some("5")),
//!     CellRecord::new("Sheet1", "B1", Some("=A1*2")),
//!     CellRecord::new("Sheet1", "C1", Some("=B1+Sheet2!D1")),
//! ]);
//! assert_eq!(extraction.nodes.len(), 4);
//!
//! let reach = service.query_reachability("Sheet1!C1").unwrap();
//! assert_eq!(reach.upstream.len(), 3);
//! assert!(reach.downstream.is_empty());
//! ```

pub mod error;
pub mod open;
pub mod service;
pub mod store;

pub use error::{ServiceError, ServiceResult};
pub use open::{open_workbook, OpenOptions};
pub use service::{DependencyService, Extraction, Link, Node};
pub use store::GraphStore;

// Re-export core types
pub use cellgraph_core::{CellAddress, CellId, CellRecord};

// Re-export graph types
pub use cellgraph_formula::{
    ancestors, descendants, extract_references, reachability, BuildOutput, DependencyGraph,
    FormulaRecord, GraphBuilder, GraphError, LexicalExtractor, Reachable, Reference,
    ReferenceExtractor, ReferenceKind,
};

// Re-export I/O types
#[cfg(feature = "csv")]
pub use cellgraph_csv::{CsvError, CsvReadOptions, CsvReader};
#[cfg(feature = "xlsx")]
pub use cellgraph_xlsx::{XlsxError, XlsxReadOptions, XlsxReader};
