//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`Value`] - An evaluated cell value (number, text, or error sentinel)
//! - [`ErrorCode`] - The error sentinels a computation can produce
//! - [`Cell`] - A cell with raw definition, cached value and graph edges
//! - [`Grid`] - Sparse storage for cells keyed by reference name

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::cell_ref::CellRef;

/// Prefix marking a cell definition as a formula.
pub const FORMULA_MARKER: char = '=';

/// Value-level error sentinels. These are stored in a cell like any other
/// value and are never returned as `Err`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Malformed formula, invalid operand, or non-numeric operand.
    Err,
    /// Division by zero.
    DivZero,
    /// The cell is part of a self- or mutually-referential chain.
    Cycle,
}

impl ErrorCode {
    pub fn sentinel(self) -> &'static str {
        match self {
            ErrorCode::Err => "#ERR!",
            ErrorCode::DivZero => "#DIV/0!",
            ErrorCode::Cycle => "#CYCLE!",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sentinel())
    }
}

/// An evaluated cell value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
    Error(ErrorCode),
}

impl Value {
    /// The value of a cell that has never been given a definition.
    pub fn blank() -> Value {
        Value::Text(String::new())
    }

    /// Interpret literal cell text: a number if it parses as one, text otherwise.
    pub fn from_literal(raw: &str) -> Value {
        match raw.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::blank()
    }
}

/// A cell in the spreadsheet grid.
///
/// `deps` and `dependents` hold reference names, not pointers; the sheet
/// keeps them mirrored so that `b` is in `a.deps` exactly when `a` is in
/// `b.dependents`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cell {
    /// Trimmed user input, either a literal or `=` followed by a formula.
    pub raw: String,
    /// Last computed value; stale while `dirty` is set.
    pub value: Value,
    pub dirty: bool,
    pub deps: BTreeSet<CellRef>,
    pub dependents: BTreeSet<CellRef>,
}

impl Cell {
    /// A blank cell that has never been evaluated.
    pub fn new_blank() -> Cell {
        Cell {
            raw: String::new(),
            value: Value::blank(),
            dirty: true,
            deps: BTreeSet::new(),
            dependents: BTreeSet::new(),
        }
    }

    /// The formula body (without the marker) if this cell holds a formula.
    pub fn formula(&self) -> Option<&str> {
        self.raw.strip_prefix(FORMULA_MARKER)
    }

    pub fn is_formula(&self) -> bool {
        self.formula().is_some()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new_blank()
    }
}

/// Sparse grid storage keyed by normalized reference.
pub type Grid = HashMap<CellRef, Cell>;
