//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Cell`], [`Value`], [`ErrorCode`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`] - Reference parsing and normalization (A1 notation)
//! - [`tokenize`], [`extract_dependencies`] - Formula scanning
//! - [`evaluate`] - Lazy, memoized, cycle-detecting evaluation
//! - [`EvalContext`] - Per-read evaluation path and cycle bookkeeping
//! - [`format_value`] - Format values for display

mod cell;
mod cell_ref;
mod cycle;
mod eval;
mod format;
mod tokenize;

pub use cell::{Cell, ErrorCode, FORMULA_MARKER, Grid, Value};
pub use cell_ref::{CellRef, is_reference};
pub use cycle::{CycleError, EvalContext};
pub use eval::{apply, evaluate};
pub use format::{format_number, format_value};
pub use tokenize::{OPERATORS, extract_dependencies, tokenize};
