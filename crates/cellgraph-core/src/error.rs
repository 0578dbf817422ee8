//! Error types for cellgraph-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing coordinates and identifiers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Text is not an A1-style coordinate
    #[error("Invalid cell coordinate '{0}'")]
    InvalidAddress(String),

    /// Text is not of the form `Sheet!Coordinate`
    #[error("'{0}' is not a Sheet!Coordinate identifier")]
    InvalidCellId(String),

    /// Well-formed coordinate past row 1048576 or column XFD
    #[error("Cell coordinate '{0}' is outside the sheet")]
    OutOfBounds(String),
}
