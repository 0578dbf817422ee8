//! # cellgraph-csv
//!
//! CSV cell reader for cellgraph. A CSV file is read as a workbook with a
//! single sheet.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
