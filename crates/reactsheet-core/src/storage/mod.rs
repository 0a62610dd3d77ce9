//! Seed files and grid snapshots.
//!
//! Seed files hold one cell definition per line (`A1: 5`, `C1: =A1+B1`).
//! Snapshots render a fixed window of the grid through [`crate::Sheet::get`].

mod parser;
mod snapshot;
mod writer;

pub use parser::{load_seed, parse_seed, parse_seed_content};
pub use snapshot::{SnapshotFormat, SnapshotOptions, render_markdown, render_plain, render_snapshot};
pub use writer::{write_seed, write_seed_content};
