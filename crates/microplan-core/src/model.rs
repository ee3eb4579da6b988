//! Work areas, groups, and their lifecycle status.

use crate::error::CoreError;
use geo::{Point, Polygon};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a work area, unique within a plan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct WorkAreaId(pub u64);

impl fmt::Display for WorkAreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a work-area group, unique within a plan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a work area.
///
/// Statuses fall into four buckets: the initial state, to-do states,
/// in-progress states, and terminal states. The string form is the
/// snake_case name used in plan files and CSV imports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkAreaStatus {
    /// Initial state before any assignment or visit.
    #[default]
    NotStarted,
    /// No field worker assigned yet.
    Unassigned,
    /// Assigned but not yet visited.
    NotVisited,
    /// At least one visit recorded.
    Visited,
    /// A field worker has requested the area be marked inaccessible.
    RequestInaccessible,
    /// The expected visit count has been reached.
    ExpectedVisitReached,
    /// Confirmed inaccessible.
    Inaccessible,
    /// Excluded from the plan.
    Excluded,
}

impl WorkAreaStatus {
    /// All statuses, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::NotStarted,
        Self::Unassigned,
        Self::NotVisited,
        Self::Visited,
        Self::RequestInaccessible,
        Self::ExpectedVisitReached,
        Self::Inaccessible,
        Self::Excluded,
    ];

    /// Snake_case wire form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Unassigned => "unassigned",
            Self::NotVisited => "not_visited",
            Self::Visited => "visited",
            Self::RequestInaccessible => "request_inaccessible",
            Self::ExpectedVisitReached => "expected_visit_reached",
            Self::Inaccessible => "inaccessible",
            Self::Excluded => "excluded",
        }
    }

    /// True for areas still waiting to be worked (`unassigned`, `not_visited`).
    #[must_use]
    pub const fn is_to_do(self) -> bool {
        matches!(self, Self::Unassigned | Self::NotVisited)
    }

    /// True for areas being actively worked (`visited`, `request_inaccessible`).
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Visited | Self::RequestInaccessible)
    }

    /// True for areas that need no further work.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::ExpectedVisitReached | Self::Inaccessible | Self::Excluded
        )
    }
}

impl fmt::Display for WorkAreaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkAreaStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

/// One geographically bounded unit of field work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkArea {
    /// Plan-unique identifier.
    pub id: WorkAreaId,
    /// Plan-unique slug.
    pub slug: String,
    /// Administrative ward the area belongs to.
    pub ward: String,
    /// Centroid as WGS84 (longitude, latitude).
    pub centroid: Point<f64>,
    /// Boundary polygon in WGS84.
    pub boundary: Polygon<f64>,
    /// Number of buildings inside the boundary.
    pub building_count: u32,
    /// Number of visits expected for this area.
    pub expected_visit_count: u32,
    /// Lifecycle status.
    #[serde(default)]
    pub status: WorkAreaStatus,
    /// Group assignment produced by clustering, if any.
    #[serde(default)]
    pub group: Option<GroupId>,
}

/// A work area before it has been given an id by a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkAreaDraft {
    /// Plan-unique slug.
    pub slug: String,
    /// Administrative ward.
    pub ward: String,
    /// Centroid as WGS84 (longitude, latitude).
    pub centroid: Point<f64>,
    /// Boundary polygon in WGS84.
    pub boundary: Polygon<f64>,
    /// Number of buildings inside the boundary.
    pub building_count: u32,
    /// Number of visits expected.
    pub expected_visit_count: u32,
    /// Lifecycle status.
    pub status: WorkAreaStatus,
    /// Pre-existing group assignment, if any.
    pub group: Option<GroupId>,
}

/// A named cluster of work areas within one ward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkAreaGroup {
    /// Plan-unique identifier.
    pub id: GroupId,
    /// Group name. Clustering assigns a fresh UUID string.
    pub name: String,
    /// Ward all member areas belong to.
    pub ward: String,
    /// Field worker the group is assigned to, if any.
    #[serde(default)]
    pub assignee: Option<String>,
}
