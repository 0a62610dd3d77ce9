//! Parser for seed files

use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use reactsheet_engine::engine::CellRef;
use std::fs;
use std::path::Path;

/// Parse a seed file into `(reference, raw)` definitions.
pub fn parse_seed(path: &Path) -> Result<Vec<(CellRef, String)>> {
    let content = fs::read_to_string(path)?;
    parse_seed_content(&content)
}

/// Parse seed content from a string.
pub fn parse_seed_content(content: &str) -> Result<Vec<(CellRef, String)>> {
    let mut entries = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse "CELLREF: RAW" format
        let Some((cell_ref_str, raw)) = line.split_once(':') else {
            return Err(SheetError::Parse {
                line: line_num + 1,
                message: "Expected 'CELLREF: VALUE' format".to_string(),
            });
        };

        let cell_ref_str = cell_ref_str.trim();
        let cell_ref = CellRef::parse(cell_ref_str).ok_or_else(|| SheetError::Parse {
            line: line_num + 1,
            message: format!("Invalid cell reference: {}", cell_ref_str),
        })?;

        entries.push((cell_ref, raw.trim().to_string()));
    }

    Ok(entries)
}

/// Build a sheet from a seed file.
pub fn load_seed(path: &Path) -> Result<Sheet> {
    let sheet = Sheet::new();
    sheet.set_many(parse_seed(path)?)?;
    Ok(sheet)
}
