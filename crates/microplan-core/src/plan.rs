//! Plan documents: the serializable container scoping areas and groups
//! to a single opportunity.

use crate::error::{CoreError, Result};
use crate::model::{GroupId, WorkArea, WorkAreaDraft, WorkAreaGroup, WorkAreaId};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// All microplanning state for one opportunity.
///
/// Serializes to a stable JSON document. Ids are assigned by the plan
/// on insertion and never reused within a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Opportunity this plan belongs to.
    pub opportunity_id: u64,
    /// Last day of field work, used for the days-remaining metric.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Work areas, in insertion order.
    #[serde(default)]
    pub areas: Vec<WorkArea>,
    /// Work-area groups, in creation order.
    #[serde(default)]
    pub groups: Vec<WorkAreaGroup>,
}

impl Plan {
    /// Create an empty plan for an opportunity.
    #[must_use]
    pub fn new(opportunity_id: u64) -> Self {
        Self {
            opportunity_id,
            end_date: None,
            areas: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Load a plan from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be read or
    /// [`CoreError::Json`] if it is not a valid plan document.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let plan: Self = serde_json::from_str(&raw)?;
        debug!(
            "loaded plan for opportunity {} ({} areas, {} groups)",
            plan.opportunity_id,
            plan.areas.len(),
            plan.groups.len()
        );
        Ok(plan)
    }

    /// Write the plan to a JSON file, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Add a work area, assigning it the next free id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateSlug`] if the slug is already taken,
    /// [`CoreError::UnknownGroup`] if the draft references a group that does
    /// not exist, or [`CoreError::WardMismatch`] if it references a group in
    /// a different ward.
    pub fn add_area(&mut self, draft: WorkAreaDraft) -> Result<WorkAreaId> {
        if self.area_by_slug(&draft.slug).is_some() {
            return Err(CoreError::DuplicateSlug(draft.slug));
        }
        if let Some(group_id) = draft.group {
            let group = self.group(group_id).ok_or(CoreError::UnknownGroup(group_id))?;
            if group.ward != draft.ward {
                return Err(CoreError::WardMismatch {
                    area: draft.slug,
                    area_ward: draft.ward,
                    group_ward: group.ward.clone(),
                });
            }
        }

        let id = self.next_area_id();
        self.areas.push(WorkArea {
            id,
            slug: draft.slug,
            ward: draft.ward,
            centroid: draft.centroid,
            boundary: draft.boundary,
            building_count: draft.building_count,
            expected_visit_count: draft.expected_visit_count,
            status: draft.status,
            group: draft.group,
        });
        Ok(id)
    }

    /// Create a new group, assigning it the next free id.
    pub fn create_group(&mut self, ward: &str, name: &str) -> GroupId {
        let id = self.next_group_id();
        self.groups.push(WorkAreaGroup {
            id,
            name: name.to_string(),
            ward: ward.to_string(),
            assignee: None,
        });
        id
    }

    /// Assign an area to a group, guarded against double-assignment.
    ///
    /// Returns `true` if the area was assigned, `false` if it already had a
    /// group (in which case nothing changes).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownArea`] / [`CoreError::UnknownGroup`] for
    /// dangling ids, or [`CoreError::WardMismatch`] if the area and group
    /// are in different wards.
    pub fn assign_to_group(&mut self, area_id: WorkAreaId, group_id: GroupId) -> Result<bool> {
        let group_ward = self
            .group(group_id)
            .ok_or(CoreError::UnknownGroup(group_id))?
            .ward
            .clone();
        let area = self
            .areas
            .iter_mut()
            .find(|a| a.id == area_id)
            .ok_or(CoreError::UnknownArea(area_id))?;
        if area.group.is_some() {
            return Ok(false);
        }
        if area.ward != group_ward {
            return Err(CoreError::WardMismatch {
                area: area.slug.clone(),
                area_ward: area.ward.clone(),
                group_ward,
            });
        }
        area.group = Some(group_id);
        Ok(true)
    }

    /// Look up an area by id.
    #[must_use]
    pub fn area(&self, id: WorkAreaId) -> Option<&WorkArea> {
        self.areas.iter().find(|a| a.id == id)
    }

    /// Look up an area by slug.
    #[must_use]
    pub fn area_by_slug(&self, slug: &str) -> Option<&WorkArea> {
        self.areas.iter().find(|a| a.slug == slug)
    }

    /// Look up a group by id.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&WorkAreaGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Look up a group by name.
    #[must_use]
    pub fn group_by_name(&self, name: &str) -> Option<&WorkAreaGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Areas that have not been assigned to any group.
    pub fn ungrouped_areas(&self) -> impl Iterator<Item = &WorkArea> {
        self.areas.iter().filter(|a| a.group.is_none())
    }

    /// Member areas of a group.
    pub fn areas_of_group(&self, group_id: GroupId) -> impl Iterator<Item = &WorkArea> {
        self.areas.iter().filter(move |a| a.group == Some(group_id))
    }

    /// Summary metrics for this plan as of `today`.
    #[must_use]
    pub fn metrics(&self, today: NaiveDate) -> crate::metrics::PlanMetrics {
        crate::metrics::PlanMetrics::compute(self, today)
    }

    fn next_area_id(&self) -> WorkAreaId {
        WorkAreaId(self.areas.iter().map(|a| a.id.0).max().map_or(1, |m| m + 1))
    }

    fn next_group_id(&self) -> GroupId {
        GroupId(self.groups.iter().map(|g| g.id.0).max().map_or(1, |m| m + 1))
    }
}
