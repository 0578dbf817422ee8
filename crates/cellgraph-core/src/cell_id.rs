//! Cell identifiers

use crate::error::{Error, Result};
use crate::SHEET_SEPARATOR;
use std::fmt;
use std::str::FromStr;

/// Canonical identifier of a graph node: `SheetName!Coordinate`
///
/// The sheet name and coordinate are stored verbatim (case-preserving).
/// An identifier may name a populated cell or a cell that is only ever
/// referenced by a formula; both are valid nodes.
///
/// Identifiers order by sheet name, then coordinate text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    sheet: String,
    coordinate: String,
}

impl CellId {
    /// Create an identifier from its two parts
    pub fn new(sheet: impl Into<String>, coordinate: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            coordinate: coordinate.into(),
        }
    }

    /// Parse `Sheet!Coordinate`
    ///
    /// The split happens at the last `!`, so sheet names containing `!`
    /// survive a display/parse round trip.
    ///
    /// # Examples
    /// ```
    /// use cellgraph_core::CellId;
    ///
    /// let id = CellId::parse("Sheet2!C3").unwrap();
    /// assert_eq!(id.sheet(), "Sheet2");
    /// assert_eq!(id.coordinate(), "C3");
    /// assert!(CellId::parse("C3").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        match s.rsplit_once(SHEET_SEPARATOR) {
            Some((sheet, coordinate)) if !sheet.is_empty() && !coordinate.is_empty() => {
                Ok(Self::new(sheet, coordinate))
            }
            _ => Err(Error::InvalidCellId(s.to_string())),
        }
    }

    /// Sheet name part
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Coordinate part (e.g. `B2`)
    pub fn coordinate(&self) -> &str {
        &self.coordinate
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.sheet, SHEET_SEPARATOR, self.coordinate)
    }
}

impl FromStr for CellId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellId {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CellId {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CellId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        assert_eq!(CellId::new("Sheet1", "B2").to_string(), "Sheet1!B2");
    }

    #[test]
    fn test_parse_splits_at_last_separator() {
        let id = CellId::parse("Odd!Name!A1").unwrap();
        assert_eq!(id.sheet(), "Odd!Name");
        assert_eq!(id.coordinate(), "A1");
        assert_eq!(id.to_string(), "Odd!Name!A1");
    }

    #[test]
    fn test_parse_errors() {
        assert!(CellId::parse("").is_err());
        assert!(CellId::parse("A1").is_err());
        assert!(CellId::parse("!A1").is_err());
        assert!(CellId::parse("Sheet1!").is_err());
    }

    #[test]
    fn test_case_is_preserved() {
        let id: CellId = "data!b2".parse().unwrap();
        assert_eq!(id.to_string(), "data!b2");
        assert_ne!(id, CellId::new("data", "B2"));
    }

    #[test]
    fn test_ordering() {
        let mut ids = vec![
            CellId::new("Sheet2", "A1"),
            CellId::new("Sheet1", "B1"),
            CellId::new("Sheet1", "A2"),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                CellId::new("Sheet1", "A2"),
                CellId::new("Sheet1", "B1"),
                CellId::new("Sheet2", "A1"),
            ]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_display_form() {
        let id = CellId::new("Sheet1", "C1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Sheet1!C1\"");
        let back: CellId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
