//! Fixed-size grid snapshots for display.

use crate::sheet::Sheet;
use reactsheet_engine::engine::CellRef;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Tab-separated values, one line per row.
    #[default]
    Plain,
    /// Markdown table with column letters and row numbers.
    Markdown,
}

/// Which window of the grid to render, starting at A1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotOptions {
    pub rows: usize,
    pub cols: usize,
    pub format: SnapshotFormat,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            format: SnapshotFormat::Plain,
        }
    }
}

pub fn render_snapshot(sheet: &Sheet, options: &SnapshotOptions) -> String {
    match options.format {
        SnapshotFormat::Plain => render_plain(sheet, options.rows, options.cols),
        SnapshotFormat::Markdown => render_markdown(sheet, options.rows, options.cols),
    }
}

/// Render rows `1..=rows` and columns `A..` as tab-separated values.
pub fn render_plain(sheet: &Sheet, rows: usize, cols: usize) -> String {
    let mut out = String::new();
    for row in 1..=rows {
        let values: Vec<String> = (1..=cols)
            .map(|col| sheet.get_display(CellRef::from_coords(col, row).as_str()))
            .collect();
        out.push_str(&values.join("\t"));
        out.push('\n');
    }
    out
}

/// Render the same window as a Markdown table.
pub fn render_markdown(sheet: &Sheet, rows: usize, cols: usize) -> String {
    let mut out = String::from("|   |");
    for col in 1..=cols {
        out.push_str(&format!(" {} |", CellRef::col_to_letters(col)));
    }
    out.push_str("\n|---|");
    for _ in 1..=cols {
        out.push_str("---|");
    }
    out.push('\n');

    for row in 1..=rows {
        out.push_str(&format!("| {} |", row));
        for col in 1..=cols {
            let display = sheet.get_display(CellRef::from_coords(col, row).as_str());
            out.push_str(&format!(" {} |", escape_markdown(&display)));
        }
        out.push('\n');
    }
    out
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sheet {
        let sheet = Sheet::new();
        sheet.set("A1", "5").unwrap();
        sheet.set("B1", "10").unwrap();
        sheet.set("C1", "=A1+B1").unwrap();
        sheet.set("A2", "a|b").unwrap();
        sheet
    }

    #[test]
    fn test_plain_snapshot() {
        let out = render_plain(&sample(), 2, 3);
        assert_eq!(out, "5\t10\t15\na|b\t\t\n");
    }

    #[test]
    fn test_markdown_snapshot() {
        let out = render_markdown(&sample(), 2, 3);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "|   | A | B | C |");
        assert_eq!(lines[1], "|---|---|---|---|");
        assert_eq!(lines[2], "| 1 | 5 | 10 | 15 |");
        assert_eq!(lines[3], "| 2 | a\\|b |  |  |");
    }

    #[test]
    fn test_snapshot_reads_do_not_create_cells() {
        let sheet = sample();
        let before = sheet.len();
        render_snapshot(&sheet, &SnapshotOptions::default());
        assert_eq!(sheet.len(), before);
    }

    #[test]
    fn test_default_options() {
        let options = SnapshotOptions::default();
        assert_eq!((options.rows, options.cols), (5, 5));
        assert_eq!(options.format, SnapshotFormat::Plain);
    }
}
