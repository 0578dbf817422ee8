//! Workbook cell records

use crate::cell_id::CellId;

/// Prefix that marks cell content as a formula
pub const FORMULA_PREFIX: char = '=';

/// One cell as supplied by a workbook reader
///
/// `raw` is the cell's textual content exactly as stored: formula cells carry
/// their `=`-prefixed text, literal values their display text, and empty cells
/// inside a sheet's used range carry `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRecord {
    /// Sheet name
    pub sheet: String,
    /// A1-style coordinate
    pub coordinate: String,
    /// Raw content, if any
    pub raw: Option<String>,
}

impl CellRecord {
    /// Create a record
    pub fn new<S: Into<String>>(
        sheet: impl Into<String>,
        coordinate: impl Into<String>,
        raw: Option<S>,
    ) -> Self {
        Self {
            sheet: sheet.into(),
            coordinate: coordinate.into(),
            raw: raw.map(Into::into),
        }
    }

    /// Create a record for an empty cell
    pub fn empty(sheet: impl Into<String>, coordinate: impl Into<String>) -> Self {
        Self::new::<String>(sheet, coordinate, None)
    }

    /// Identifier of this cell
    pub fn id(&self) -> CellId {
        CellId::new(self.sheet.as_str(), self.coordinate.as_str())
    }

    /// Whether the content is formula-like (starts with `=`)
    pub fn is_formula(&self) -> bool {
        self.formula().is_some()
    }

    /// The formula text, including the leading `=`
    pub fn formula(&self) -> Option<&str> {
        self.raw
            .as_deref()
            .filter(|raw| raw.starts_with(FORMULA_PREFIX))
    }
}
