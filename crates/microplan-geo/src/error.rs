//! Error types for geometry parsing and validation.

use thiserror::Error;

/// Error types for WKT parsing and geometry validation.
#[derive(Error, Debug)]
pub enum GeoError {
    /// The input was not parseable WKT.
    #[error("WKT parse error: {0}")]
    Wkt(String),

    /// A point was expected but the WKT held another geometry type.
    #[error("expected a POINT, got {0}")]
    NotAPoint(String),

    /// A polygon was expected but the WKT held another geometry type.
    #[error("expected a POLYGON, got {0}")]
    NotAPolygon(String),

    /// The polygon is structurally invalid (open ring, too few vertices,
    /// non-finite coordinates, or zero area).
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),
}

/// Type alias for [`Result<T, GeoError>`].
pub type Result<T> = std::result::Result<T, GeoError>;
