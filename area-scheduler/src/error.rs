//! Error types for parsing and planning runs.
//!
//! Only structural and schema problems surface here. Bad cells degrade to
//! zero values and allocation shortfalls are reported as data in the result
//! tables, so an `Ok` result may still contain flagged rows.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors that abort a parse or a planning run before any result is exposed.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The input could not be read as a delimited row table at all.
    #[error("Could not read table: {0}")]
    Csv(#[from] csv::Error),

    /// IO error while reading inputs or writing reports.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is absent from a header row.
    #[error("Table must contain column '{column}' (case-insensitive). Columns found: {found:?}")]
    MissingColumn { column: String, found: Vec<String> },

    /// Seat demand references a shift that is not defined.
    #[error("Seat demand references unknown shift '{0}'")]
    UnknownShift(String),

    /// A shift definition has hours outside the clock range.
    #[error("Shift '{id}' has invalid hours {start_hour}..{end_hour}")]
    InvalidShift { id: String, start_hour: u32, end_hour: u32 },

    /// A date argument could not be parsed.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Configuration file could not be used.
    #[error("Configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl PlannerError {
    pub(crate) fn missing_column(column: &str, found: &[String]) -> Self {
        PlannerError::MissingColumn {
            column: column.to_string(),
            found: found.to_vec(),
        }
    }
}
