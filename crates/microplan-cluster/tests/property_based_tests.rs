//! Property-based tests for the clustering invariants:
//! - every ungrouped area is assigned to exactly one group per run
//! - a group's building total stays within the cap unless it is a
//!   singleton whose own count exceeds it
//! - groups never span wards
//! - a second run changes nothing

use geo::{point, polygon};
use microplan_cluster::{ClusterConfig, WorkAreaGrouper};
use microplan_core::{Plan, WorkAreaDraft, WorkAreaStatus};
use proptest::prelude::*;
use std::collections::HashSet;

/// Build a plan from grid cells. Cells in columns 0-1 go to ward "west",
/// columns 2-3 to ward "east". Duplicate cells are dropped.
fn plan_from_cells(cells: &[(u8, u8, u32)]) -> Plan {
    let size = 0.01;
    let mut plan = Plan::new(1);
    let mut used = HashSet::new();
    for &(col, row, building_count) in cells {
        if !used.insert((col, row)) {
            continue;
        }
        let x = 77.0 + f64::from(col) * size;
        let y = 28.0 + f64::from(row) * size;
        let ward = if col < 2 { "west" } else { "east" };
        plan.add_area(WorkAreaDraft {
            slug: format!("cell-{col}-{row}"),
            ward: ward.to_string(),
            centroid: point! { x: x + size / 2.0, y: y + size / 2.0 },
            boundary: polygon![
                (x: x, y: y),
                (x: x + size, y: y),
                (x: x + size, y: y + size),
                (x: x, y: y + size),
            ],
            building_count,
            expected_visit_count: 0,
            status: WorkAreaStatus::NotStarted,
            group: None,
        })
        .unwrap();
    }
    plan
}

proptest! {
    #[test]
    fn proptest_clustering_invariants(
        cells in prop::collection::vec((0u8..4, 0u8..4, 1u32..150), 1..12),
        max_buildings in 50u32..400,
    ) {
        let mut plan = plan_from_cells(&cells);
        let grouper = WorkAreaGrouper::new(ClusterConfig {
            max_buildings,
            ..ClusterConfig::default()
        });
        grouper.group(&mut plan).unwrap();

        // Full coverage: nothing left ungrouped.
        prop_assert_eq!(plan.ungrouped_areas().count(), 0);

        for group in &plan.groups {
            let members: Vec<_> = plan.areas_of_group(group.id).collect();
            prop_assert!(!members.is_empty(), "empty group {}", group.id);

            // Cap respected, except for oversized singletons.
            let total: u32 = members.iter().map(|a| a.building_count).sum();
            if members.len() > 1 {
                prop_assert!(
                    total <= max_buildings,
                    "group of {} areas totals {total} > {max_buildings}",
                    members.len()
                );
            }

            // No group spans wards.
            for member in &members {
                prop_assert_eq!(&member.ward, &group.ward);
            }
        }

        // Second run: idempotent.
        let snapshot = plan.clone();
        let outcome = grouper.group(&mut plan).unwrap();
        prop_assert_eq!(outcome.groups_created, 0);
        prop_assert_eq!(plan, snapshot);
    }

    #[test]
    fn proptest_connected_under_cap_is_one_group(
        rows in 1u8..4,
        building_count in 1u32..50,
    ) {
        // A vertical strip of adjacent cells whose total fits the cap.
        let cells: Vec<(u8, u8, u32)> =
            (0..rows).map(|r| (0u8, r, building_count)).collect();
        let mut plan = plan_from_cells(&cells);

        let total: u32 = cells.iter().map(|c| c.2).sum();
        let grouper = WorkAreaGrouper::new(ClusterConfig {
            max_buildings: total,
            ..ClusterConfig::default()
        });
        let outcome = grouper.group(&mut plan).unwrap();

        prop_assert_eq!(outcome.groups_created, 1);
        prop_assert_eq!(outcome.areas_grouped, cells.len());
    }
}
