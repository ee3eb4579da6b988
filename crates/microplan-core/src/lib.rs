//! # microplan-core
//!
//! Core domain model for microplanning field work: geographically bounded
//! work areas, the groups they are clustered into, and the plan documents
//! that hold both.
//!
//! A [`Plan`] is the unit of persistence. It scopes everything to a single
//! opportunity and serializes to a stable JSON document, which the CLI and
//! the import/export surfaces read and write.
//!
//! ## Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`WorkArea`] | One bounded unit of field work (polygon, centroid, counts) |
//! | [`WorkAreaGroup`] | A named cluster of work areas within one ward |
//! | [`WorkAreaStatus`] | Lifecycle status of a work area |
//! | [`Plan`] | Serializable container of areas and groups for an opportunity |
//!
//! ## Quick Start
//!
//! ```
//! use microplan_core::{Plan, WorkAreaDraft, WorkAreaStatus};
//! use geo::{polygon, point};
//!
//! let mut plan = Plan::new(42);
//! plan.add_area(WorkAreaDraft {
//!     slug: "area-1".into(),
//!     ward: "ward-1".into(),
//!     centroid: point! { x: 77.5, y: 28.5 },
//!     boundary: polygon![
//!         (x: 77.0, y: 28.0),
//!         (x: 78.0, y: 28.0),
//!         (x: 78.0, y: 29.0),
//!         (x: 77.0, y: 29.0),
//!     ],
//!     building_count: 120,
//!     expected_visit_count: 30,
//!     status: WorkAreaStatus::NotStarted,
//!     group: None,
//! })?;
//!
//! assert_eq!(plan.ungrouped_areas().count(), 1);
//! # Ok::<(), microplan_core::CoreError>(())
//! ```

pub mod error;
pub mod metrics;
pub mod model;
pub mod plan;

pub use error::{CoreError, Result};
pub use metrics::PlanMetrics;
pub use model::{GroupId, WorkArea, WorkAreaDraft, WorkAreaGroup, WorkAreaId, WorkAreaStatus};
pub use plan::Plan;
