//! Error types for import and export operations.

use microplan_core::CoreError;
use thiserror::Error;

/// Error types for the import/export surfaces.
///
/// Row-level validation problems during CSV import are not errors; they
/// are collected into the import report. These variants cover failures of
/// the operation as a whole.
#[derive(Error, Debug)]
pub enum BackendError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed structurally.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Plan mutation error.
    #[error("plan error: {0}")]
    Core(#[from] CoreError),

    /// Import was refused because the plan already has work areas.
    #[error("plan already has work areas")]
    PlanNotEmpty,
}

/// Type alias for [`Result<T, BackendError>`].
pub type Result<T> = std::result::Result<T, BackendError>;
