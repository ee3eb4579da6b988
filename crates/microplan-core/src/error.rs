//! Error types for plan and domain-model operations.

use crate::model::{GroupId, WorkAreaId};
use thiserror::Error;

/// Error types that can occur while building or persisting plans.
#[derive(Error, Debug)]
pub enum CoreError {
    /// File I/O error reading or writing a plan document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error for a plan document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A work-area slug already exists in the plan.
    #[error("duplicate work area slug: {0}")]
    DuplicateSlug(String),

    /// A status string did not match any known work-area status.
    #[error("unknown work area status: {0:?}")]
    UnknownStatus(String),

    /// A work-area id was not found in the plan.
    #[error("unknown work area id: {0}")]
    UnknownArea(WorkAreaId),

    /// A group id or name was not found in the plan.
    #[error("unknown work area group: {0}")]
    UnknownGroup(GroupId),

    /// An area and the group it is being assigned to are in different wards.
    #[error("work area {area:?} is in ward {area_ward:?} but group is in ward {group_ward:?}")]
    WardMismatch {
        /// Slug of the work area being assigned.
        area: String,
        /// Ward of the work area.
        area_ward: String,
        /// Ward of the target group.
        group_ward: String,
    },

    /// The target plan file already exists.
    #[error("plan file already exists: {0}")]
    PlanExists(String),
}

/// Type alias for [`Result<T, CoreError>`].
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_slug_display() {
        let error = CoreError::DuplicateSlug("area-7".to_string());
        assert_eq!(format!("{error}"), "duplicate work area slug: area-7");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing plan");
        let core_err: CoreError = io_err.into();
        match core_err {
            CoreError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_ward_mismatch_display() {
        let error = CoreError::WardMismatch {
            area: "a-1".to_string(),
            area_ward: "ward-1".to_string(),
            group_ward: "ward-2".to_string(),
        };
        let display = format!("{error}");
        assert!(display.contains("ward-1"));
        assert!(display.contains("ward-2"));
    }

    #[test]
    fn test_error_size() {
        use std::mem::size_of;
        let size = size_of::<CoreError>();
        assert!(
            size < 256,
            "CoreError size is {size} bytes, consider boxing large variants"
        );
    }
}
