//! CSV output modules for raw articles and monthly aggregates.
//!
//! # Submodules
//!
//! - [`table`]: appends raw article records to a persistent CSV, writing
//!   the header exactly once
//! - [`aggregate`]: rewrites the per-month per-pillar count CSV from
//!   scratch at the end of each run
//!
//! Both files are plain comma-delimited text. Row formatting lives here so
//! the two writers escape cells the same way.

pub mod aggregate;
pub mod table;

/// Render one CSV row, escaping cells that need it, with a trailing newline.
pub(crate) fn format_row<I>(cells: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut row = cells
        .into_iter()
        .map(|cell| escape_cell(&cell))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

/// Quote a cell when it contains the delimiter, a quote, or a line break;
/// embedded quotes are doubled.
fn escape_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
