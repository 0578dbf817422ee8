//! Lexical cell reference extraction
//!
//! Formulas are scanned with a single pattern rather than parsed:
//!
//! - `B2` (letters then digits) is a same-sheet reference, resolved against the
//!   formula's own sheet.
//! - `Other_Sheet2!B2` (sheet name of letters, digits or `_`, then `!`) is a
//!   cross-sheet reference, resolved as written.
//!
//! Absolute markers (`$B$2`) are accepted and dropped from the identifier.
//! Because the scan is lexical, function names shaped like cells (`LOG10`) and
//! text inside string literals are picked up too, and a range `A1:B5` yields its
//! two corners only.

use std::collections::BTreeSet;

use cellgraph_core::record::FORMULA_PREFIX;
use cellgraph_core::CellId;
use lazy_regex::{lazy_regex, Lazy, Regex};

/// One cross-sheet or same-sheet token per match. The optional sheet prefix is
/// tried first, so a cross-sheet token is consumed whole and neither its sheet
/// name nor its coordinate is reported again as a same-sheet hit.
static CELL_REFERENCE: Lazy<Regex> =
    lazy_regex!(r"(?:(?P<sheet>[A-Za-z0-9_]+)!)?\$?(?P<col>[A-Za-z]+)\$?(?P<row>[0-9]+)");

/// How a reference named its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    /// Bare coordinate, resolved against the formula's sheet
    SameSheet,
    /// `Sheet!Coordinate`
    CrossSheet,
}

/// A cell referenced by a formula
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
    /// Referenced cell
    pub id: CellId,
    /// How it was written
    pub kind: ReferenceKind,
}

impl Reference {
    /// Reference to `coordinate` on the formula's own sheet
    pub fn same_sheet(sheet: &str, coordinate: impl Into<String>) -> Self {
        Self {
            id: CellId::new(sheet, coordinate),
            kind: ReferenceKind::SameSheet,
        }
    }

    /// Reference to `coordinate` on another sheet
    pub fn cross_sheet(sheet: &str, coordinate: impl Into<String>) -> Self {
        Self {
            id: CellId::new(sheet, coordinate),
            kind: ReferenceKind::CrossSheet,
        }
    }
}

/// Turns one formula into the cells it references
///
/// [`GraphBuilder`](crate::GraphBuilder) only talks to this trait, so a stricter
/// parser can replace [`LexicalExtractor`] without touching graph construction.
pub trait ReferenceExtractor {
    /// References made by `formula`, a cell on `sheet`.
    ///
    /// Text that does not start with `=` yields no references.
    fn extract(&self, sheet: &str, formula: &str) -> BTreeSet<Reference>;
}

impl<F> ReferenceExtractor for F
where
    F: Fn(&str, &str) -> BTreeSet<Reference>,
{
    fn extract(&self, sheet: &str, formula: &str) -> BTreeSet<Reference> {
        self(sheet, formula)
    }
}

/// Pattern-matching extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalExtractor;

impl ReferenceExtractor for LexicalExtractor {
    fn extract(&self, sheet: &str, formula: &str) -> BTreeSet<Reference> {
        extract_references(sheet, formula)
    }
}

/// Scan `formula` (a cell on `sheet`) for cell references
///
/// # Examples
/// ```
/// use cellgraph_core::CellId;
/// use cellgraph_formula::extract_references;
///
/// let ids: Vec<CellId> = extract_references("Sheet1", "=B2+Sheet2!C3")
///     .into_iter()
///     .map(|r| r.id)
///     .collect();
/// assert_eq!(ids, vec![CellId::new("Sheet1", "B2"), CellId::new("Sheet2", "C3")]);
/// ```
pub fn extract_references(sheet: &str, formula: &str) -> BTreeSet<Reference> {
    if !formula.starts_with(FORMULA_PREFIX) {
        return BTreeSet::new();
    }

    CELL_REFERENCE
        .captures_iter(formula)
        .filter_map(|caps| {
            let col = caps.name("col")?.as_str();
            let row = caps.name("row")?.as_str();
            let coordinate = format!("{col}{row}");
            Some(match caps.name("sheet") {
                Some(other) => Reference::cross_sheet(other.as_str(), coordinate),
                None => Reference::same_sheet(sheet, coordinate),
            })
        })
        .collect()
}
