//! Cell reference parsing and formatting.
//!
//! A reference is a run of uppercase column letters followed by a run of row
//! digits (e.g., "A1", "B2", "AA100"). Input is case-insensitive and is
//! normalized (trimmed, uppercased) before matching. References are compared
//! by their normalized name, so "A01" and "A1" name different cells.
//!
//! # Examples
//!
//! ```
//! use reactsheet_engine::engine::CellRef;
//!
//! let cell = CellRef::parse(" b3 ").unwrap();
//! assert_eq!(cell.as_str(), "B3");
//! assert_eq!(CellRef::from_coords(27, 4).to_string(), "AA4");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A normalized reference to a cell by name.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef(String);

impl CellRef {
    /// Parse a reference, normalizing case and surrounding whitespace.
    /// Returns None if the input does not match the reference pattern.
    pub fn parse(name: &str) -> Option<CellRef> {
        let normalized = name.trim().to_ascii_uppercase();
        if is_reference(&normalized) {
            Some(CellRef(normalized))
        } else {
            None
        }
    }

    /// Build a reference from 1-based column and row numbers.
    ///
    /// Column 0 has no letters and is clamped to column 1.
    pub fn from_coords(col: usize, row: usize) -> CellRef {
        CellRef(format!("{}{}", CellRef::col_to_letters(col.max(1)), row))
    }

    /// Convert a 1-based column number to spreadsheet-style letters
    /// (1 -> A, 26 -> Z, 27 -> AA). Returns an empty string for 0.
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether `text` matches the reference pattern exactly, without normalizing.
pub fn is_reference(text: &str) -> bool {
    reference_re().is_match(text)
}

fn reference_re() -> &'static Regex {
    static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
    REFERENCE_RE
        .get_or_init(|| Regex::new(r"^[A-Z]+[0-9]+$").expect("reference regex must compile"))
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl TryFrom<String> for CellRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellRef> for String {
    fn from(value: CellRef) -> Self {
        value.0
    }
}

impl AsRef<str> for CellRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
