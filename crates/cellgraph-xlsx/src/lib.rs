//! # cellgraph-xlsx
//!
//! XLSX (Office Open XML) cell reader for cellgraph.
//!
//! The reader walks every worksheet of a workbook and yields one
//! [`CellRecord`](cellgraph_core::CellRecord) per cell, with formula cells
//! carrying their `=`-prefixed text. Shared formulas are expanded for every cell
//! that uses them.

pub mod error;
pub mod options;
pub mod reader;

pub use error::{XlsxError, XlsxResult};
pub use options::{XlsxReadOptions, DEFAULT_MAX_FILLED_CELLS};
pub use reader::XlsxReader;
