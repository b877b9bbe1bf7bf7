use crate::config::Config;
use crate::error::Result;
use crate::store::TabularStore;

// ---------------------------------------------------------------------------
// CellRef / Resolution
// ---------------------------------------------------------------------------

/// 1-based coordinate of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

/// Outcome of resolving a (date, identifier) pair to a grid cell. The date is
/// checked before the identifier, so a request with both unknown reports the
/// date miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Found(CellRef),
    DateNotFound,
    StudentNotFound,
}

// ---------------------------------------------------------------------------
// LookupEngine
// ---------------------------------------------------------------------------

/// Linear scans over the header row and identifier column. Both scans are
/// O(n) over a single roster and a single term's dates; nothing is cached
/// across calls because the store is externally mutable between requests.
pub struct LookupEngine<'a> {
    store: &'a dyn TabularStore,
    config: &'a Config,
}

impl<'a> LookupEngine<'a> {
    pub fn new(store: &'a dyn TabularStore, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Scan the header row left to right for the first cell whose trimmed
    /// text equals `today_label` exactly. Byte-for-byte string match, no
    /// case folding and no date-value comparison.
    pub fn resolve_date_column(&self, today_label: &str) -> Result<Option<u32>> {
        let config = self.config;
        let last_col = self.store.last_column(&config.grid_sheet)?;
        if last_col < config.first_date_column {
            return Ok(None);
        }
        let cols = last_col - config.first_date_column + 1;
        let header = self.store.read_range(
            &config.grid_sheet,
            config.header_row,
            config.first_date_column,
            1,
            cols,
        )?;

        for (i, cell) in header[0].iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            if cell.trim() == today_label {
                return Ok(Some(config.first_date_column + i as u32));
            }
        }
        Ok(None)
    }

    /// Scan the identifier column top to bottom for the first cell whose
    /// trimmed text equals the trimmed `identifier`. If the roster holds
    /// duplicate registration numbers, the first match wins.
    pub fn resolve_student_row(&self, identifier: &str) -> Result<Option<u32>> {
        let config = self.config;
        let last_row = self.store.last_row(&config.grid_sheet)?;
        if last_row < config.first_student_row {
            return Ok(None);
        }
        let rows = last_row - config.first_student_row + 1;
        let column = self.store.read_range(
            &config.grid_sheet,
            config.first_student_row,
            config.id_column,
            rows,
            1,
        )?;

        let target = identifier.trim();
        for (i, row) in column.iter().enumerate() {
            let cell = &row[0];
            if cell.is_empty() {
                continue;
            }
            if cell.trim() == target {
                return Ok(Some(config.first_student_row + i as u32));
            }
        }
        Ok(None)
    }

    /// Resolve both coordinates for a mark.
    pub fn resolve(&self, today_label: &str, identifier: &str) -> Result<Resolution> {
        let Some(col) = self.resolve_date_column(today_label)? else {
            return Ok(Resolution::DateNotFound);
        };
        let Some(row) = self.resolve_student_row(identifier)? else {
            return Ok(Resolution::StudentNotFound);
        };
        Ok(Resolution::Found(CellRef { row, col }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn seed_store(config: &Config) -> MemoryStore {
        let store = MemoryStore::new();
        store.add_sheet(&config.grid_sheet).unwrap();
        store
            .write_cell(&config.grid_sheet, config.header_row, 5, "04/06/2024")
            .unwrap();
        store
            .write_cell(&config.grid_sheet, config.header_row, 6, "05/06/2024")
            .unwrap();
        store
            .write_cell(&config.grid_sheet, 8, config.id_column, "250850330077")
            .unwrap();
        store
            .write_cell(&config.grid_sheet, 9, config.id_column, "250850330099")
            .unwrap();
        store
    }

    #[test]
    fn date_column_first_exact_match() {
        let config = Config::default();
        let store = seed_store(&config);
        let engine = LookupEngine::new(&store, &config);

        assert_eq!(engine.resolve_date_column("04/06/2024").unwrap(), Some(5));
        assert_eq!(engine.resolve_date_column("05/06/2024").unwrap(), Some(6));
    }

    #[test]
    fn date_match_is_byte_for_byte() {
        let config = Config::default();
        let store = seed_store(&config);
        let engine = LookupEngine::new(&store, &config);

        // Same date, different text: no locale-aware parsing.
        assert_eq!(engine.resolve_date_column("4/6/2024").unwrap(), None);
        assert_eq!(engine.resolve_date_column("05-06-2024").unwrap(), None);
    }

    #[test]
    fn date_scan_skips_empty_header_cells() {
        let config = Config::default();
        let store = seed_store(&config);
        // Gap at column 7, match at column 8.
        store
            .write_cell(&config.grid_sheet, config.header_row, 8, "06/06/2024")
            .unwrap();
        let engine = LookupEngine::new(&store, &config);

        assert_eq!(engine.resolve_date_column("06/06/2024").unwrap(), Some(8));
    }

    #[test]
    fn date_scan_trims_header_text() {
        let config = Config::default();
        let store = seed_store(&config);
        store
            .write_cell(&config.grid_sheet, config.header_row, 7, " 06/06/2024 ")
            .unwrap();
        let engine = LookupEngine::new(&store, &config);

        assert_eq!(engine.resolve_date_column("06/06/2024").unwrap(), Some(7));
    }

    #[test]
    fn empty_header_row_is_a_miss() {
        let config = Config::default();
        let store = MemoryStore::new();
        store.add_sheet(&config.grid_sheet).unwrap();
        let engine = LookupEngine::new(&store, &config);

        assert_eq!(engine.resolve_date_column("05/06/2024").unwrap(), None);
    }

    #[test]
    fn student_row_first_exact_match() {
        let config = Config::default();
        let store = seed_store(&config);
        let engine = LookupEngine::new(&store, &config);

        assert_eq!(
            engine.resolve_student_row("250850330077").unwrap(),
            Some(8)
        );
        assert_eq!(
            engine.resolve_student_row("250850330099").unwrap(),
            Some(9)
        );
        assert_eq!(engine.resolve_student_row("250850330000").unwrap(), None);
    }

    #[test]
    fn student_lookup_trims_both_sides() {
        let config = Config::default();
        let store = seed_store(&config);
        store
            .write_cell(&config.grid_sheet, 10, config.id_column, " 250850330111 ")
            .unwrap();
        let engine = LookupEngine::new(&store, &config);

        assert_eq!(
            engine.resolve_student_row("  250850330111  ").unwrap(),
            Some(10)
        );
    }

    #[test]
    fn duplicate_identifier_first_row_wins() {
        let config = Config::default();
        let store = seed_store(&config);
        store
            .write_cell(&config.grid_sheet, 11, config.id_column, "250850330077")
            .unwrap();
        let engine = LookupEngine::new(&store, &config);

        assert_eq!(
            engine.resolve_student_row("250850330077").unwrap(),
            Some(8)
        );
    }

    #[test]
    fn student_scan_skips_blank_roster_rows() {
        let config = Config::default();
        let store = seed_store(&config);
        // Row 10 blank, row 11 occupied.
        store
            .write_cell(&config.grid_sheet, 11, config.id_column, "250850330111")
            .unwrap();
        let engine = LookupEngine::new(&store, &config);

        assert_eq!(
            engine.resolve_student_row("250850330111").unwrap(),
            Some(11)
        );
    }

    #[test]
    fn resolve_reports_date_miss_before_student_miss() {
        let config = Config::default();
        let store = seed_store(&config);
        let engine = LookupEngine::new(&store, &config);

        // Both unknown: date wins.
        assert_eq!(
            engine.resolve("01/01/2030", "nobody").unwrap(),
            Resolution::DateNotFound
        );
        assert_eq!(
            engine.resolve("05/06/2024", "nobody").unwrap(),
            Resolution::StudentNotFound
        );
        assert_eq!(
            engine.resolve("05/06/2024", "250850330077").unwrap(),
            Resolution::Found(CellRef { row: 8, col: 6 })
        );
    }
}
