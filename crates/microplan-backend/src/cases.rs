//! Flat "case" records for downstream case-management systems.
//!
//! Every work area exports as one case with string-typed properties, the
//! shape mobile tooling expects.

use microplan_core::{Plan, WorkArea};
use microplan_geo::{format_point, format_polygon};
use serde::Serialize;
use std::collections::BTreeMap;

/// Case type tag carried by every exported work area.
pub const WORK_AREA_CASE_TYPE: &str = "work-area";

/// One work area as a case record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkAreaCase {
    /// Case name: the area slug.
    pub case_name: String,
    /// Always [`WORK_AREA_CASE_TYPE`].
    pub case_type: &'static str,
    /// The area id, stringified.
    pub external_id: String,
    /// String-typed case properties.
    pub properties: BTreeMap<String, String>,
}

impl WorkAreaCase {
    fn from_area(area: &WorkArea, plan: &Plan) -> Self {
        let group_name = area
            .group
            .and_then(|group_id| plan.group(group_id))
            .map(|group| group.name.clone())
            .unwrap_or_default();

        let properties = BTreeMap::from([
            ("bounding_box".to_string(), format_polygon(&area.boundary)),
            (
                "building_count".to_string(),
                area.building_count.to_string(),
            ),
            ("centroid".to_string(), format_point(&area.centroid)),
            (
                "expected_visit_count".to_string(),
                area.expected_visit_count.to_string(),
            ),
            ("wa_status".to_string(), area.status.to_string()),
            ("ward".to_string(), area.ward.clone()),
            ("work_area_group".to_string(), group_name),
        ]);

        Self {
            case_name: area.slug.clone(),
            case_type: WORK_AREA_CASE_TYPE,
            external_id: area.id.to_string(),
            properties,
        }
    }
}

/// Export every work area of `plan` as a case record, in area order.
#[must_use]
pub fn work_area_cases(plan: &Plan) -> Vec<WorkAreaCase> {
    plan.areas
        .iter()
        .map(|area| WorkAreaCase::from_area(area, plan))
        .collect()
}
