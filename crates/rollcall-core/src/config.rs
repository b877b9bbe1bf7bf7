use crate::error::{Result, RollcallError};
use crate::io;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// MarkStyle
// ---------------------------------------------------------------------------

/// Value and visual styling written into a cell on a successful mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkStyle {
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_foreground")]
    pub foreground: String,
}

fn default_status() -> String {
    "P".to_string()
}

fn default_background() -> String {
    // Dark green, white text: legible "present" signal for a human reviewer.
    "#006400".to_string()
}

fn default_foreground() -> String {
    "#FFFFFF".to_string()
}

impl Default for MarkStyle {
    fn default() -> Self {
        Self {
            status: default_status(),
            background: default_background(),
            foreground: default_foreground(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Grid layout, log surface, and clock settings. All row/column indices are
/// 1-based, matching how the attendance template is laid out by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sheet holding the attendance grid.
    #[serde(default = "default_grid_sheet")]
    pub grid_sheet: String,
    /// Sheet receiving append-only audit rows.
    #[serde(default = "default_log_sheet")]
    pub log_sheet: String,
    /// Row whose cells are dd/mm/yyyy date labels.
    #[serde(default = "default_header_row")]
    pub header_row: u32,
    /// Column holding registration numbers.
    #[serde(default = "default_id_column")]
    pub id_column: u32,
    /// First column of the header row that may hold a date label.
    #[serde(default = "default_first_date_column")]
    pub first_date_column: u32,
    /// First row of the identifier column that may hold a registration number.
    #[serde(default = "default_first_student_row")]
    pub first_student_row: u32,
    /// Fixed UTC offset for date labels and audit timestamps, in minutes.
    /// Default 330 = UTC+05:30 (IST).
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub mark: MarkStyle,
}

fn default_grid_sheet() -> String {
    "Sheet1".to_string()
}

fn default_log_sheet() -> String {
    "Sheet2".to_string()
}

fn default_header_row() -> u32 {
    7
}

fn default_id_column() -> u32 {
    2
}

fn default_first_date_column() -> u32 {
    5
}

fn default_first_student_row() -> u32 {
    8
}

fn default_utc_offset_minutes() -> i32 {
    330
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_sheet: default_grid_sheet(),
            log_sheet: default_log_sheet(),
            header_row: default_header_row(),
            id_column: default_id_column(),
            first_date_column: default_first_date_column(),
            first_student_row: default_first_student_row(),
            utc_offset_minutes: default_utc_offset_minutes(),
            mark: MarkStyle::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file, validating offsets and layout indices.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Layout indices are 1-based; zero means a template that cannot exist.
    pub fn validate(&self) -> Result<()> {
        self.offset()?;
        for (name, value) in [
            ("header_row", self.header_row),
            ("id_column", self.id_column),
            ("first_date_column", self.first_date_column),
            ("first_student_row", self.first_student_row),
        ] {
            if value == 0 {
                return Err(RollcallError::InvalidLayout(format!(
                    "{name} must be at least 1"
                )));
            }
        }
        Ok(())
    }

    /// Write config as YAML via an atomic replace.
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        io::atomic_write(path, yaml.as_bytes())
    }

    fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(RollcallError::InvalidUtcOffset(self.utc_offset_minutes))
    }

    /// Current timestamp in the configured offset.
    pub fn now(&self) -> Result<DateTime<FixedOffset>> {
        Ok(Utc::now().with_timezone(&self.offset()?))
    }

    /// Today's date label as it appears in the header row: dd/mm/yyyy in the
    /// configured offset. Matching against the header is byte-for-byte string
    /// equality, so this format must stay in sync with the template.
    pub fn today_label(&self) -> Result<String> {
        Ok(self.now()?.format("%d/%m/%Y").to_string())
    }
}
