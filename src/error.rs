use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid date format: {0:?} (expected yyyy-MM-dd)")]
    InvalidDateFormat(String),

    #[error("invalid record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
