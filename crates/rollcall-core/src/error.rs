use thiserror::Error;

#[derive(Debug, Error)]
pub enum RollcallError {
    #[error("Missing data parameter")]
    MissingData,

    #[error("Invalid data format")]
    InvalidDataFormat,

    #[error("Date not found in sheet")]
    DateNotFound(String),

    #[error("Student ID not found")]
    StudentNotFound(String),

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("invalid utc offset: {0} minutes")]
    InvalidUtcOffset(i32),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RollcallError>;
