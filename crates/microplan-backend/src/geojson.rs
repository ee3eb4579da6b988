//! GeoJSON documents for map rendering.
//!
//! Assembled as plain JSON values: the shapes here are small and fixed,
//! and the map layer consumes them as-is.

use geo::{BooleanOps, LineString, MultiPolygon, Polygon};
use microplan_core::Plan;
use microplan_geo::extent;
use serde_json::{json, Value};

/// Per-group boundary unions plus the overall work-area bounds.
///
/// Each group with at least one member becomes a Feature whose geometry
/// is the union of its members' boundaries (a MultiPolygon). Groups
/// without members are omitted. `workarea_bounds` is
/// `[min_x, min_y, max_x, max_y]` over every area boundary, or `null`
/// for a plan without areas.
#[must_use]
pub fn group_features(plan: &Plan) -> Value {
    let mut features = Vec::new();
    for group in &plan.groups {
        let members: Vec<&Polygon<f64>> =
            plan.areas_of_group(group.id).map(|area| &area.boundary).collect();
        let Some((first, rest)) = members.split_first() else {
            continue;
        };

        let mut union = MultiPolygon::new(vec![(*first).clone()]);
        for polygon in rest {
            union = union.union(&MultiPolygon::new(vec![(*polygon).clone()]));
        }

        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": multi_polygon_coordinates(&union),
            },
            "properties": { "group_id": group.id.0 },
        }));
    }

    let bounds = extent(plan.areas.iter().map(|area| &area.boundary))
        .map(|rect| json!([rect.min().x, rect.min().y, rect.max().x, rect.max().y]));

    json!({
        "group_features": features,
        "workarea_bounds": bounds,
    })
}

/// FeatureCollection of every work area with its map-layer properties.
#[must_use]
pub fn area_feature_collection(plan: &Plan) -> Value {
    let features: Vec<Value> = plan
        .areas
        .iter()
        .map(|area| {
            let group = area.group.and_then(|group_id| plan.group(group_id));
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": polygon_coordinates(&area.boundary),
                },
                "properties": {
                    "id": area.id.0,
                    "status": area.status.as_str(),
                    "building_count": area.building_count,
                    "expected_visit_count": area.expected_visit_count,
                    "group_id": group.map(|g| g.id.0),
                    "group_name": group.map(|g| g.name.clone()),
                    "assignee": group.and_then(|g| g.assignee.clone()),
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn ring_coordinates(ring: &LineString<f64>) -> Value {
    Value::Array(
        ring.coords()
            .map(|coord| json!([coord.x, coord.y]))
            .collect(),
    )
}

fn polygon_coordinates(polygon: &Polygon<f64>) -> Value {
    let mut rings = vec![ring_coordinates(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring_coordinates));
    Value::Array(rings)
}

fn multi_polygon_coordinates(multi: &MultiPolygon<f64>) -> Value {
    Value::Array(multi.iter().map(polygon_coordinates).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{point, polygon};
    use microplan_core::{WorkAreaDraft, WorkAreaStatus};

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]
    }

    fn add_area(plan: &mut Plan, slug: &str, x: f64, y: f64) -> microplan_core::WorkAreaId {
        plan.add_area(WorkAreaDraft {
            slug: slug.to_string(),
            ward: "ward-1".to_string(),
            centroid: point! { x: x + 0.005, y: y + 0.005 },
            boundary: square(x, y, 0.01),
            building_count: 10,
            expected_visit_count: 2,
            status: WorkAreaStatus::NotStarted,
            group: None,
        })
        .unwrap()
    }

    #[test]
    fn test_group_features_unions_members() {
        let mut plan = Plan::new(1);
        let a = add_area(&mut plan, "a", 77.0, 28.0);
        let b = add_area(&mut plan, "b", 77.01, 28.0);
        let group = plan.create_group("ward-1", "g");
        plan.assign_to_group(a, group).unwrap();
        plan.assign_to_group(b, group).unwrap();

        let doc = group_features(&plan);
        let features = doc["group_features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["geometry"]["type"], "MultiPolygon");
        assert_eq!(features[0]["properties"]["group_id"], group.0);

        // Two adjacent squares union into one polygon.
        let polygons = features[0]["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(polygons.len(), 1);
    }

    #[test]
    fn test_group_features_skips_empty_groups() {
        let mut plan = Plan::new(1);
        plan.create_group("ward-1", "empty");
        add_area(&mut plan, "a", 77.0, 28.0);

        let doc = group_features(&plan);
        assert!(doc["group_features"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_workarea_bounds() {
        let mut plan = Plan::new(1);
        add_area(&mut plan, "a", 77.0, 28.0);
        add_area(&mut plan, "b", 77.05, 28.02);

        let doc = group_features(&plan);
        let bounds = doc["workarea_bounds"].as_array().unwrap();
        let values: Vec<f64> = bounds.iter().map(|v| v.as_f64().unwrap()).collect();
        let expected = [77.0, 28.0, 77.06, 28.03];
        for (value, want) in values.iter().zip(expected) {
            assert!((value - want).abs() < 1e-9, "bounds {values:?}");
        }
    }

    #[test]
    fn test_workarea_bounds_null_for_empty_plan() {
        let doc = group_features(&Plan::new(1));
        assert!(doc["workarea_bounds"].is_null());
    }

    #[test]
    fn test_area_feature_collection_properties() {
        let mut plan = Plan::new(1);
        let a = add_area(&mut plan, "a", 77.0, 28.0);
        add_area(&mut plan, "b", 77.05, 28.0);
        let group = plan.create_group("ward-1", "north");
        plan.assign_to_group(a, group).unwrap();

        let doc = area_feature_collection(&plan);
        assert_eq!(doc["type"], "FeatureCollection");
        let features = doc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);

        assert_eq!(features[0]["properties"]["group_name"], "north");
        assert_eq!(features[0]["properties"]["status"], "not_started");
        assert!(features[1]["properties"]["group_id"].is_null());
        assert!(features[1]["properties"]["assignee"].is_null());

        // Exterior ring is closed.
        let ring = features[0]["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.first(), ring.last());
    }
}
