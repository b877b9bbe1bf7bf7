use crate::error::Result;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CellStyle
// ---------------------------------------------------------------------------

/// Background/foreground pair applied to a marked cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub background: String,
    pub foreground: String,
}

// ---------------------------------------------------------------------------
// TabularStore
// ---------------------------------------------------------------------------

/// Narrow interface to the persistent two-dimensional grid the attendance
/// records live in. The store is externally mutable between requests (manual
/// edits, concurrent submissions), so callers must not cache reads.
///
/// All row/column indices are 1-based. Implementations report unknown sheet
/// names as errors rather than creating sheets implicitly.
pub trait TabularStore {
    /// Read a rectangular range as text. Cells beyond the sheet's current
    /// extent read as empty strings.
    fn read_range(
        &self,
        sheet: &str,
        start_row: u32,
        start_col: u32,
        rows: u32,
        cols: u32,
    ) -> Result<Vec<Vec<String>>>;

    /// Overwrite a single cell's value.
    fn write_cell(&self, sheet: &str, row: u32, col: u32, value: &str) -> Result<()>;

    /// Attach (or replace) a free-text note on a cell.
    fn set_cell_note(&self, sheet: &str, row: u32, col: u32, note: &str) -> Result<()>;

    /// Apply background/foreground styling to a cell.
    fn set_cell_style(&self, sheet: &str, row: u32, col: u32, style: &CellStyle) -> Result<()>;

    /// Append one row of values after the sheet's last occupied row.
    fn append_row(&self, sheet: &str, values: &[String]) -> Result<()>;

    /// Index of the last occupied row, 0 for an empty sheet.
    fn last_row(&self, sheet: &str) -> Result<u32>;

    /// Index of the last occupied column, 0 for an empty sheet.
    fn last_column(&self, sheet: &str) -> Result<u32>;
}
