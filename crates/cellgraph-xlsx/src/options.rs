//! XLSX read options

/// Largest used range, in cells, that is filled in before falling back to
/// stored cells only
pub const DEFAULT_MAX_FILLED_CELLS: u64 = 4_000_000;

/// Options for reading XLSX files
#[derive(Debug, Clone)]
pub struct XlsxReadOptions {
    /// Emit every coordinate of each sheet's used range, from `A1` to the
    /// furthest populated row and column, with `None` for cells the file does
    /// not store. When off, only cells present in the file are emitted.
    pub fill_used_range: bool,

    /// Sheets whose used range holds more cells than this are read as if
    /// `fill_used_range` were off
    pub max_filled_cells: u64,
}

impl Default for XlsxReadOptions {
    fn default() -> Self {
        Self {
            fill_used_range: true,
            max_filled_cells: DEFAULT_MAX_FILLED_CELLS,
        }
    }
}
