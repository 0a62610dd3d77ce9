//! The reactive sheet: edits rewire the dependency graph, reads evaluate lazily.

mod eval;
mod ops;
mod state;

pub use state::{Sheet, SheetStats};
