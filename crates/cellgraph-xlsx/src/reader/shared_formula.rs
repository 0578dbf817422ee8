//! Shared formula expansion
//!
//! A shared formula is stored once on its anchor cell (`<f t="shared" si="0">`)
//! and referenced by index from the other cells of its block
//! (`<f t="shared" si="0"/>`). Each follower's text is the anchor's text with
//! every relative reference moved by the follower's offset from the anchor.

use std::collections::HashMap;

use cellgraph_core::CellAddress;
use lazy_regex::{lazy_regex, Lazy};
use regex::{Captures, Regex};

static SHIFTABLE_REFERENCE: Lazy<Regex> = lazy_regex!(
    r"(?P<sheet>(?:'[^']+'|[A-Za-z0-9_.]+)!)?(?P<cell>\$?[A-Za-z]{1,3}\$?[0-9]+)"
);

/// Anchor formulas of one worksheet, keyed by shared index
#[derive(Debug, Default)]
pub(crate) struct SharedFormulas {
    anchors: HashMap<String, (CellAddress, String)>,
}

impl SharedFormulas {
    /// Remember the anchor formula for `index`
    pub(crate) fn insert(&mut self, index: &str, anchor: CellAddress, text: &str) {
        self.anchors
            .insert(index.to_string(), (anchor, text.to_string()));
    }

    /// Formula text for a follower cell at `at`, if the index is known
    pub(crate) fn expand(&self, index: &str, at: CellAddress) -> Option<String> {
        let (anchor, text) = self.anchors.get(index)?;
        let row_delta = at.row as i64 - anchor.row as i64;
        let col_delta = at.col as i64 - anchor.col as i64;
        Some(shift_references(text, row_delta, col_delta))
    }
}

/// Move every relative cell reference in `formula`
///
/// Tokens followed by `(` are function names (`LOG10(`) and stay put, as do
/// tokens glued to a preceding name character and tokens whose column is past
/// `XFD`.
pub(crate) fn shift_references(formula: &str, row_delta: i64, col_delta: i64) -> String {
    if row_delta == 0 && col_delta == 0 {
        return formula.to_string();
    }

    SHIFTABLE_REFERENCE
        .replace_all(formula, |caps: &Captures| {
            let whole = &caps[0];
            let (start, end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
            let glued = formula[..start]
                .chars()
                .next_back()
                .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_');
            if glued || formula[end..].starts_with('(') {
                return whole.to_string();
            }

            let sheet = caps.name("sheet").map_or("", |m| m.as_str());
            match CellAddress::parse(&caps["cell"]) {
                Ok(addr) => format!("{sheet}{}", addr.offset(row_delta, col_delta)),
                Err(_) => whole.to_string(),
            }
        })
        .into_owned()
}
