//! Writer for seed files

use crate::error::Result;
use crate::sheet::Sheet;
use std::fs;
use std::path::Path;

/// Write a sheet's definitions to a seed file.
pub fn write_seed(path: &Path, sheet: &Sheet) -> Result<()> {
    fs::write(path, write_seed_content(sheet))?;
    Ok(())
}

/// Write a sheet's definitions in seed format. Blank cells are skipped.
pub fn write_seed_content(sheet: &Sheet) -> String {
    let mut lines = vec!["# Reactsheet".to_string()];
    for (cell_ref, raw) in sheet.definitions() {
        lines.push(format!("{}: {}", cell_ref, raw));
    }
    lines.join("\n") + "\n"
}
