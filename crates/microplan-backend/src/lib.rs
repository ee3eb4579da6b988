//! # microplan-backend
//!
//! Data surfaces around plan documents:
//!
//! - CSV import of work areas, with per-line validation errors grouped by
//!   message ([`csv_import`])
//! - flat "case" records for downstream case-management systems ([`cases`])
//! - GeoJSON documents for maps: per-group boundary unions and the
//!   work-area feature collection ([`geojson`])

pub mod cases;
pub mod csv_import;
pub mod error;
pub mod geojson;

pub use cases::{work_area_cases, WorkAreaCase, WORK_AREA_CASE_TYPE};
pub use csv_import::{csv_template, ImportReport, WorkAreaCsvImporter, REQUIRED_HEADERS};
pub use error::{BackendError, Result};
pub use geojson::{area_feature_collection, group_features};
