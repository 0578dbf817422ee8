//! CSV reader errors

use thiserror::Error;

/// Result type for CSV reading
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Why a CSV file could not be read
#[derive(Debug, Error)]
pub enum CsvError {
    /// The file could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The data is not valid CSV (for example, not UTF-8)
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A field lies past row 1048576 or column XFD
    #[error("Field at row {row}, column {column} is outside the sheet")]
    OutOfBounds { row: usize, column: usize },
}
