//! # cellgraph-core
//!
//! Core data structures shared by the cellgraph crates.
//!
//! This crate provides:
//! - [`CellId`] - The canonical `Sheet!Coordinate` node identifier
//! - [`CellRecord`] - One `(sheet, coordinate, raw value)` triple from a workbook reader
//! - [`CellAddress`] - A1-style coordinate parsing and column letter conversion
//!
//! ## Example
//!
//! ```rust
//! use cellgraph_core::{CellId, CellRecord};
//!
//! let id: CellId = "Sheet1!B2".parse().unwrap();
//! assert_eq!(id.sheet(), "Sheet1");
//! assert_eq!(id.coordinate(), "B2");
//!
//! let record = CellRecord::new("Sheet1", "C1", Some("=B2*2"));
//! assert!(record.is_formula());
//! assert_eq!(record.id(), CellId::new("Sheet1", "C1"));
//! ```

pub mod address;
pub mod cell_id;
pub mod error;
pub mod record;

pub use address::CellAddress;
pub use cell_id::CellId;
pub use error::{Error, Result};
pub use record::CellRecord;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Separator between the sheet name and the coordinate in a [`CellId`]
pub const SHEET_SEPARATOR: char = '!';
