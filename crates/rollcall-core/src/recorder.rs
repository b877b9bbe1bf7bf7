use crate::config::Config;
use crate::error::Result;
use crate::lookup::CellRef;
use crate::request::{LogSubmission, MarkRequest};
use crate::store::{CellStyle, TabularStore};
use chrono::{DateTime, FixedOffset};

// ---------------------------------------------------------------------------
// AuditLogEntry
// ---------------------------------------------------------------------------

/// One append-only row on the log sheet. Written exactly once per successful
/// mark, never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub name: String,
    pub identifier: String,
    pub course: String,
    pub status: String,
}

impl AuditLogEntry {
    /// Row form: [timestamp, name, identifier, course, status].
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
            self.name.clone(),
            self.identifier.clone(),
            self.course.clone(),
            self.status.clone(),
        ]
    }
}

// ---------------------------------------------------------------------------
// AttendanceRecorder
// ---------------------------------------------------------------------------

/// Writes presence marks into the grid and audit rows onto the log sheet.
///
/// Ordering invariant: the audit row is appended before any grid write. If a
/// grid write fails partway, the log may carry an entry the grid lacks, but
/// the log is never missing a mark the grid has.
pub struct AttendanceRecorder<'a> {
    store: &'a dyn TabularStore,
    config: &'a Config,
}

impl<'a> AttendanceRecorder<'a> {
    pub fn new(store: &'a dyn TabularStore, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Mark the resolved cell present: append the audit row, then set the
    /// status token, the course note, and the mark styling. Re-marking the
    /// same cell overwrites the prior mark; the grid keeps no history.
    pub fn mark_present(&self, cell: CellRef, request: &MarkRequest) -> Result<()> {
        let config = self.config;
        let entry = AuditLogEntry {
            timestamp: config.now()?,
            name: request.name.clone(),
            identifier: request.identifier.clone(),
            course: request.course.clone(),
            status: config.mark.status.clone(),
        };
        self.store.append_row(&config.log_sheet, &entry.to_row())?;

        self.store
            .write_cell(&config.grid_sheet, cell.row, cell.col, &config.mark.status)?;
        self.store
            .set_cell_note(&config.grid_sheet, cell.row, cell.col, &request.course)?;
        self.store.set_cell_style(
            &config.grid_sheet,
            cell.row,
            cell.col,
            &CellStyle {
                background: config.mark.background.clone(),
                foreground: config.mark.foreground.clone(),
            },
        )?;

        tracing::info!(
            identifier = %request.identifier,
            row = cell.row,
            col = cell.col,
            "attendance marked"
        );
        Ok(())
    }

    /// Append a raw submission row: [timestamp, name, roll, course, uid].
    /// Pure audit sink; performs no lookup and touches no grid cell.
    pub fn append_submission(&self, submission: &LogSubmission) -> Result<()> {
        let config = self.config;
        let row = vec![
            config.now()?.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
            submission.name.clone(),
            submission.roll.clone(),
            submission.course.clone(),
            submission.uid.clone(),
        ];
        self.store.append_row(&config.log_sheet, &row)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RollcallError;
    use crate::memory::MemoryStore;

    fn setup() -> (Config, MemoryStore) {
        let config = Config::default();
        let store = MemoryStore::new();
        store.add_sheet(&config.grid_sheet).unwrap();
        store.add_sheet(&config.log_sheet).unwrap();
        (config, store)
    }

    fn request() -> MarkRequest {
        MarkRequest {
            name: "Srinivas".to_string(),
            identifier: "250850330077".to_string(),
            course: "DESD".to_string(),
        }
    }

    #[test]
    fn mark_writes_status_note_and_style() {
        let (config, store) = setup();
        let recorder = AttendanceRecorder::new(&store, &config);
        let cell = CellRef { row: 8, col: 6 };

        recorder.mark_present(cell, &request()).unwrap();

        let range = store.read_range(&config.grid_sheet, 8, 6, 1, 1).unwrap();
        assert_eq!(range[0][0], "P");
        assert_eq!(
            store.cell_note(&config.grid_sheet, 8, 6).unwrap().as_deref(),
            Some("DESD")
        );
        let style = store.cell_style(&config.grid_sheet, 8, 6).unwrap().unwrap();
        assert_eq!(style.background, "#006400");
        assert_eq!(style.foreground, "#FFFFFF");
    }

    #[test]
    fn mark_appends_exactly_one_audit_row() {
        let (config, store) = setup();
        let recorder = AttendanceRecorder::new(&store, &config);

        recorder
            .mark_present(CellRef { row: 8, col: 6 }, &request())
            .unwrap();

        assert_eq!(store.last_row(&config.log_sheet).unwrap(), 1);
        let row = store.read_range(&config.log_sheet, 1, 1, 1, 5).unwrap();
        assert_eq!(row[0][1], "Srinivas");
        assert_eq!(row[0][2], "250850330077");
        assert_eq!(row[0][3], "DESD");
        assert_eq!(row[0][4], "P");
        assert!(!row[0][0].is_empty(), "timestamp column populated");
    }

    #[test]
    fn remarking_overwrites_grid_but_appends_to_log() {
        let (config, store) = setup();
        let recorder = AttendanceRecorder::new(&store, &config);
        let cell = CellRef { row: 8, col: 6 };

        recorder.mark_present(cell, &request()).unwrap();
        recorder.mark_present(cell, &request()).unwrap();

        let range = store.read_range(&config.grid_sheet, 8, 6, 1, 1).unwrap();
        assert_eq!(range[0][0], "P");
        // The log is not idempotent: two marks, two rows.
        assert_eq!(store.last_row(&config.log_sheet).unwrap(), 2);
    }

    #[test]
    fn audit_row_lands_before_grid_writes() {
        let config = Config::default();
        let store = MemoryStore::new();
        // Log sheet exists, grid sheet does not: the grid write must fail
        // after the audit append.
        store.add_sheet(&config.log_sheet).unwrap();
        let recorder = AttendanceRecorder::new(&store, &config);

        let err = recorder
            .mark_present(CellRef { row: 8, col: 6 }, &request())
            .unwrap_err();
        assert!(matches!(err, RollcallError::SheetNotFound(_)));
        assert_eq!(store.last_row(&config.log_sheet).unwrap(), 1);
    }

    #[test]
    fn submission_row_carries_uid_in_status_slot() {
        let (config, store) = setup();
        let recorder = AttendanceRecorder::new(&store, &config);

        recorder
            .append_submission(&LogSubmission {
                name: "Srinivas".to_string(),
                roll: "42".to_string(),
                course: "DESD".to_string(),
                uid: "a1b2c3".to_string(),
            })
            .unwrap();

        let row = store.read_range(&config.log_sheet, 1, 1, 1, 5).unwrap();
        assert_eq!(row[0][1], "Srinivas");
        assert_eq!(row[0][2], "42");
        assert_eq!(row[0][3], "DESD");
        assert_eq!(row[0][4], "a1b2c3");
    }

    #[test]
    fn submission_defaults_append_empty_fields() {
        let (config, store) = setup();
        let recorder = AttendanceRecorder::new(&store, &config);

        recorder.append_submission(&LogSubmission::default()).unwrap();

        let row = store.read_range(&config.log_sheet, 1, 1, 1, 5).unwrap();
        assert!(!row[0][0].is_empty());
        assert!(row[0][1..].iter().all(|c| c.is_empty()));
    }
}
