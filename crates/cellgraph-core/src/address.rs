//! A1-style cell coordinates

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A parsed cell coordinate such as `B2` or `$B$2`
///
/// Rows and columns are 0-based. The `$` flags are kept so a shifted
/// coordinate prints the same way it was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    /// Row index (`1` is row 0)
    pub row: u32,
    /// Column index (`A` is column 0, `XFD` is 16383)
    pub col: u16,
    /// Row written with `$`
    pub row_absolute: bool,
    /// Column written with `$`
    pub col_absolute: bool,
}

/// Split a leading `$` marker off `s`
fn strip_marker(s: &str) -> (bool, &str) {
    match s.strip_prefix('$') {
        Some(rest) => (true, rest),
        None => (false, s),
    }
}

impl CellAddress {
    /// Relative address at `(row, col)`
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Parse an A1-style coordinate
    ///
    /// # Examples
    /// ```
    /// use cellgraph_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("$C$10").unwrap();
    /// assert_eq!((addr.row, addr.col), (9, 2));
    /// assert!(addr.row_absolute && addr.col_absolute);
    ///
    /// assert!(CellAddress::parse("B").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = || Error::InvalidAddress(text.to_string());

        let (col_absolute, rest) = strip_marker(text);
        let letters_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let (letters, rest) = rest.split_at(letters_end);
        let (row_absolute, digits) = strip_marker(rest);

        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let col = Self::letters_to_column(letters).map_err(|err| match err {
            Error::OutOfBounds(_) => Error::OutOfBounds(text.to_string()),
            _ => invalid(),
        })?;

        // All digits, so a parse failure can only be overflow
        let row: u32 = digits
            .parse()
            .map_err(|_| Error::OutOfBounds(text.to_string()))?;
        if row == 0 {
            return Err(invalid());
        }
        if row > MAX_ROWS {
            return Err(Error::OutOfBounds(text.to_string()));
        }

        Ok(Self {
            row: row - 1,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Column letters for a 0-based column index (`0` → `A`, `26` → `AA`)
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::with_capacity(3);
        let mut n = u32::from(col) + 1;
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.iter().rev().map(|&b| char::from(b)).collect()
    }

    /// 0-based column index for column letters, case-insensitive
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress(String::new()));
        }

        let number = letters.bytes().try_fold(0u32, |acc, b| {
            if !b.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(letters.to_string()));
            }
            let next = acc * 26 + u32::from(b.to_ascii_uppercase() - b'A') + 1;
            if next > u32::from(MAX_COLS) {
                return Err(Error::OutOfBounds(letters.to_string()));
            }
            Ok(next)
        })?;

        Ok((number - 1) as u16)
    }

    /// Move the relative parts by the given deltas, stopping at the sheet edges
    ///
    /// `$`-marked parts do not move.
    pub fn offset(&self, row_delta: i64, col_delta: i64) -> Self {
        let shift = |value: i64, delta: i64, absolute: bool, limit: i64| {
            if absolute {
                value
            } else {
                (value + delta).clamp(0, limit - 1)
            }
        };

        Self {
            row: shift(
                i64::from(self.row),
                row_delta,
                self.row_absolute,
                i64::from(MAX_ROWS),
            ) as u32,
            col: shift(
                i64::from(self.col),
                col_delta,
                self.col_absolute,
                i64::from(MAX_COLS),
            ) as u16,
            ..*self
        }
    }

    /// Format as written, `$` markers included
    pub fn to_a1_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = |absolute: bool| if absolute { "$" } else { "" };
        write!(
            f,
            "{}{}{}{}",
            marker(self.col_absolute),
            Self::column_to_letters(self.col),
            marker(self.row_absolute),
            self.row + 1
        )
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
