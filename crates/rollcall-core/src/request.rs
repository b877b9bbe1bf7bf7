use crate::error::{Result, RollcallError};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// MarkRequest
// ---------------------------------------------------------------------------

/// Parsed form of the GET `data` parameter: a whitespace-separated triple
/// "name identifier course".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkRequest {
    pub name: String,
    pub identifier: String,
    pub course: String,
}

impl MarkRequest {
    /// Split the raw parameter into the first three whitespace-separated
    /// tokens. Tokens past the third are silently dropped (the RFID client
    /// appends a device uid the grid path does not use), which also means a
    /// course label cannot itself contain spaces under this scheme.
    pub fn parse(data: &str) -> Result<Self> {
        let mut tokens = data.split_whitespace();
        let (Some(name), Some(identifier), Some(course)) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(RollcallError::InvalidDataFormat);
        };
        Ok(Self {
            name: name.to_string(),
            identifier: identifier.to_string(),
            course: course.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// LogSubmission
// ---------------------------------------------------------------------------

/// JSON body of the POST audit-sink path. Every field is optional and
/// defaults to an empty string; the row is appended regardless of whether the
/// student or date exists in the grid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roll: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub uid: String,
}
