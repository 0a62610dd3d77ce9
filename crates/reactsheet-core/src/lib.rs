//! reactsheet_core - Concurrent sheet, seed storage and grid snapshots.

pub mod error;
pub mod sheet;
pub mod storage;

pub use error::{Result, SheetError};
pub use sheet::{Sheet, SheetStats};

pub use reactsheet_engine::engine::{CellRef, ErrorCode, Value};
