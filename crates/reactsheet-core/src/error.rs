//! Error types for Reactsheet core.

use thiserror::Error;

use reactsheet_engine::engine::{CellRef, Value};

/// Errors that can occur while editing, reading or storing a sheet.
///
/// Value-level failures (`#ERR!`, `#DIV/0!`, `#CYCLE!`) are not errors here;
/// they are stored in the cell as [`Value::Error`].
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("invalid reference: {0:?}")]
    InvalidReference(String),

    /// A cycle closed at `at` during this read. `value` is what the
    /// requested cell evaluated to and is now cached.
    #[error("circular reference detected at {at}")]
    Cycle { at: CellRef, value: Value },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, SheetError>;
