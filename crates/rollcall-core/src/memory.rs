use crate::error::{Result, RollcallError};
use crate::io;
use crate::store::{CellStyle, TabularStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Sheet
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Sheet {
    /// Row-major cell text, grown on demand. Absent cells read as "".
    #[serde(default)]
    cells: Vec<Vec<String>>,
    #[serde(default)]
    notes: BTreeMap<u32, BTreeMap<u32, String>>,
    #[serde(default)]
    styles: BTreeMap<u32, BTreeMap<u32, CellStyle>>,
}

impl Sheet {
    fn cell(&self, row: u32, col: u32) -> &str {
        let (Some(row), Some(col)) = (row.checked_sub(1), col.checked_sub(1)) else {
            return "";
        };
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Callers validate indices via `check_cell` first; `append_row`
    /// constructs its own indices starting at 1.
    fn set_cell(&mut self, row: u32, col: u32, value: &str) {
        let row = (row - 1) as usize;
        let col = (col - 1) as usize;
        if self.cells.len() <= row {
            self.cells.resize_with(row + 1, Vec::new);
        }
        let cells_row = &mut self.cells[row];
        if cells_row.len() <= col {
            cells_row.resize_with(col + 1, String::new);
        }
        cells_row[col] = value.to_string();
    }

    fn last_row(&self) -> u32 {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, r)| r.iter().any(|c| !c.is_empty()))
            .map(|(i, _)| i as u32 + 1)
            .max()
            .unwrap_or(0)
    }

    fn last_column(&self) -> u32 {
        self.cells
            .iter()
            .filter_map(|r| {
                r.iter()
                    .enumerate()
                    .filter(|(_, c)| !c.is_empty())
                    .map(|(i, _)| i as u32 + 1)
                    .max()
            })
            .max()
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    sheets: BTreeMap<String, Sheet>,
}

/// In-process `TabularStore` over named sheets, optionally persisted to a
/// JSON snapshot file. Every mutation rewrites the snapshot atomically, so a
/// crash leaves the previous consistent state on disk.
pub struct MemoryStore {
    inner: Mutex<Snapshot>,
    path: Option<PathBuf>,
}

impl MemoryStore {
    /// Empty store with no sheets and no backing file.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Snapshot::default()),
            path: None,
        }
    }

    /// Open a snapshot-backed store. A missing file starts empty and is
    /// created on the first mutation.
    pub fn open(path: &Path) -> Result<Self> {
        let snapshot = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Snapshot::default()
        };
        Ok(Self {
            inner: Mutex::new(snapshot),
            path: Some(path.to_path_buf()),
        })
    }

    /// Create an empty sheet if it does not already exist.
    pub fn add_sheet(&self, name: &str) -> Result<()> {
        let mut snapshot = self.lock()?;
        snapshot.sheets.entry(name.to_string()).or_default();
        self.persist(&snapshot)
    }

    pub fn has_sheet(&self, name: &str) -> Result<bool> {
        Ok(self.lock()?.sheets.contains_key(name))
    }

    /// Note text on a cell, if any. Test/inspection helper beyond the
    /// `TabularStore` contract.
    pub fn cell_note(&self, sheet: &str, row: u32, col: u32) -> Result<Option<String>> {
        let snapshot = self.lock()?;
        let sheet = get_sheet(&snapshot, sheet)?;
        Ok(sheet.notes.get(&row).and_then(|r| r.get(&col)).cloned())
    }

    /// Style on a cell, if any. Test/inspection helper.
    pub fn cell_style(&self, sheet: &str, row: u32, col: u32) -> Result<Option<CellStyle>> {
        let snapshot = self.lock()?;
        let sheet = get_sheet(&snapshot, sheet)?;
        Ok(sheet.styles.get(&row).and_then(|r| r.get(&col)).cloned())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Snapshot>> {
        self.inner
            .lock()
            .map_err(|_| RollcallError::Store("store lock poisoned".to_string()))
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(path) = &self.path {
            let json = serde_json::to_vec_pretty(snapshot)?;
            io::atomic_write(path, &json)?;
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn get_sheet<'a>(snapshot: &'a Snapshot, name: &str) -> Result<&'a Sheet> {
    snapshot
        .sheets
        .get(name)
        .ok_or_else(|| RollcallError::SheetNotFound(name.to_string()))
}

fn get_sheet_mut<'a>(snapshot: &'a mut Snapshot, name: &str) -> Result<&'a mut Sheet> {
    snapshot
        .sheets
        .get_mut(name)
        .ok_or_else(|| RollcallError::SheetNotFound(name.to_string()))
}

/// Writes reject zero indices; the trait contract is 1-based. Reads stay
/// lenient and report out-of-range cells as empty.
fn check_cell(row: u32, col: u32) -> Result<()> {
    if row == 0 || col == 0 {
        return Err(RollcallError::Store(format!(
            "invalid cell ({row}, {col}): indices are 1-based"
        )));
    }
    Ok(())
}

impl TabularStore for MemoryStore {
    fn read_range(
        &self,
        sheet: &str,
        start_row: u32,
        start_col: u32,
        rows: u32,
        cols: u32,
    ) -> Result<Vec<Vec<String>>> {
        let snapshot = self.lock()?;
        let sheet = get_sheet(&snapshot, sheet)?;
        let mut out = Vec::with_capacity(rows as usize);
        for r in 0..rows {
            let mut row = Vec::with_capacity(cols as usize);
            for c in 0..cols {
                row.push(sheet.cell(start_row + r, start_col + c).to_string());
            }
            out.push(row);
        }
        Ok(out)
    }

    fn write_cell(&self, sheet: &str, row: u32, col: u32, value: &str) -> Result<()> {
        check_cell(row, col)?;
        let mut snapshot = self.lock()?;
        get_sheet_mut(&mut snapshot, sheet)?.set_cell(row, col, value);
        self.persist(&snapshot)
    }

    fn set_cell_note(&self, sheet: &str, row: u32, col: u32, note: &str) -> Result<()> {
        check_cell(row, col)?;
        let mut snapshot = self.lock()?;
        get_sheet_mut(&mut snapshot, sheet)?
            .notes
            .entry(row)
            .or_default()
            .insert(col, note.to_string());
        self.persist(&snapshot)
    }

    fn set_cell_style(&self, sheet: &str, row: u32, col: u32, style: &CellStyle) -> Result<()> {
        check_cell(row, col)?;
        let mut snapshot = self.lock()?;
        get_sheet_mut(&mut snapshot, sheet)?
            .styles
            .entry(row)
            .or_default()
            .insert(col, style.clone());
        self.persist(&snapshot)
    }

    fn append_row(&self, sheet: &str, values: &[String]) -> Result<()> {
        let mut snapshot = self.lock()?;
        let sheet = get_sheet_mut(&mut snapshot, sheet)?;
        let row = sheet.last_row() + 1;
        for (i, value) in values.iter().enumerate() {
            sheet.set_cell(row, i as u32 + 1, value);
        }
        self.persist(&snapshot)
    }

    fn last_row(&self, sheet: &str) -> Result<u32> {
        let snapshot = self.lock()?;
        Ok(get_sheet(&snapshot, sheet)?.last_row())
    }

    fn last_column(&self, sheet: &str) -> Result<u32> {
        let snapshot = self.lock()?;
        Ok(get_sheet(&snapshot, sheet)?.last_column())
    }
}
