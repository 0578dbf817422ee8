//! CSV read options

/// How to split a CSV file into cells
///
/// A CSV file has no sheet name of its own, so one is supplied here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReadOptions {
    /// Field separator byte
    pub delimiter: u8,
    /// Quoting byte
    pub quote: u8,
    /// Sheet every cell is placed on
    pub sheet_name: String,
}

impl Default for CsvReadOptions {
    /// Comma-separated, double-quoted, on `Sheet1`
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            sheet_name: String::from("Sheet1"),
        }
    }
}
