//! Capacity-bounded breadth-first clustering of ungrouped work areas.

use crate::adjacency::build_adjacency;
use crate::config::ClusterConfig;
use geo::{Point, Polygon};
use log::{debug, info};
use microplan_core::{Plan, Result, WorkAreaId};
use microplan_geo::project_polygon;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use uuid::Uuid;

/// Per-ward result counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WardOutcome {
    /// Ward name.
    pub ward: String,
    /// Groups created in this ward.
    pub groups: usize,
    /// Areas assigned in this ward.
    pub areas: usize,
}

/// Summary of one grouping run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct GroupingOutcome {
    /// Total groups created.
    pub groups_created: usize,
    /// Total areas assigned to a group.
    pub areas_grouped: usize,
    /// Per-ward breakdown, in ward order.
    pub wards: Vec<WardOutcome>,
}

/// Everything the per-ward clustering needs about one area, captured up
/// front so wards can be processed in parallel.
struct AreaSnapshot {
    id: WorkAreaId,
    ward: String,
    centroid: Point<f64>,
    boundary: Polygon<f64>,
    building_count: u32,
}

/// Clusters a plan's ungrouped work areas into building-count-capped
/// groups of spatially adjacent areas.
///
/// Only areas without a group are considered, so re-running on a fully
/// grouped plan is a no-op. Wards are clustered independently; a group
/// never spans wards.
#[derive(Debug, Clone, Default)]
pub struct WorkAreaGrouper {
    config: ClusterConfig,
}

impl WorkAreaGrouper {
    /// Create a grouper with the given configuration.
    #[must_use]
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Cluster every ungrouped area of `plan` and record the resulting
    /// groups and assignments in it.
    ///
    /// # Errors
    ///
    /// Propagates plan mutation errors; the geometry math itself is total.
    pub fn group(&self, plan: &mut Plan) -> Result<GroupingOutcome> {
        let snapshots: Vec<AreaSnapshot> = plan
            .ungrouped_areas()
            .map(|area| AreaSnapshot {
                id: area.id,
                ward: area.ward.clone(),
                centroid: area.centroid,
                boundary: project_polygon(&area.boundary),
                building_count: area.building_count,
            })
            .collect();

        if snapshots.is_empty() {
            debug!("no ungrouped areas, nothing to cluster");
            return Ok(GroupingOutcome::default());
        }

        // BTreeMap keeps ward processing order (and therefore group ids)
        // deterministic.
        let mut wards: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, snapshot) in snapshots.iter().enumerate() {
            wards.entry(snapshot.ward.clone()).or_default().push(idx);
        }

        let config = self.config;
        let ward_clusters: Vec<(String, Vec<Vec<WorkAreaId>>)> = wards
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(ward, indices)| {
                let clusters = cluster_ward(&snapshots, &indices, &config);
                (ward, clusters)
            })
            .collect();

        let mut outcome = GroupingOutcome::default();
        for (ward, clusters) in ward_clusters {
            let mut ward_outcome = WardOutcome {
                ward: ward.clone(),
                groups: 0,
                areas: 0,
            };
            for cluster in clusters {
                let group_id = plan.create_group(&ward, &Uuid::new_v4().to_string());
                ward_outcome.groups += 1;
                for area_id in cluster {
                    if plan.assign_to_group(area_id, group_id)? {
                        ward_outcome.areas += 1;
                    }
                }
            }
            info!(
                "ward {:?}: {} groups over {} areas",
                ward_outcome.ward, ward_outcome.groups, ward_outcome.areas
            );
            outcome.groups_created += ward_outcome.groups;
            outcome.areas_grouped += ward_outcome.areas;
            outcome.wards.push(ward_outcome);
        }
        Ok(outcome)
    }
}

/// Cluster one ward's areas. `indices` point into `snapshots`.
fn cluster_ward(
    snapshots: &[AreaSnapshot],
    indices: &[usize],
    config: &ClusterConfig,
) -> Vec<Vec<WorkAreaId>> {
    let boundaries: HashMap<WorkAreaId, Polygon<f64>> = indices
        .iter()
        .map(|&idx| (snapshots[idx].id, snapshots[idx].boundary.clone()))
        .collect();
    let building_counts: HashMap<WorkAreaId, u32> = indices
        .iter()
        .map(|&idx| (snapshots[idx].id, snapshots[idx].building_count))
        .collect();

    let adjacency = build_adjacency(&boundaries, config);

    // Seed order: centroid x ascending, then y descending.
    let mut order: Vec<usize> = indices.to_vec();
    order.sort_by(|&a, &b| {
        snapshots[a]
            .centroid
            .x()
            .total_cmp(&snapshots[b].centroid.x())
            .then(snapshots[b].centroid.y().total_cmp(&snapshots[a].centroid.y()))
    });

    let mut unvisited: HashSet<WorkAreaId> = indices.iter().map(|&idx| snapshots[idx].id).collect();
    let mut clusters = Vec::new();

    for &idx in &order {
        let seed = snapshots[idx].id;
        if !unvisited.contains(&seed) {
            continue;
        }

        let mut cluster = bfs_cluster(seed, &mut unvisited, &adjacency, &building_counts, config);

        // A seed whose own count exceeds the cap still gets its own group.
        if cluster.is_empty() {
            cluster.push(seed);
            unvisited.remove(&seed);
        }
        clusters.push(cluster);
    }

    clusters
}

/// Grow one cluster from `seed`, admitting connected unvisited areas while
/// the running building total stays within the cap.
///
/// A neighbour that would overflow the cap is excluded from this cluster
/// but stays unvisited (and is removed from `seen`), so a later traversal
/// can still pick it up.
fn bfs_cluster(
    seed: WorkAreaId,
    unvisited: &mut HashSet<WorkAreaId>,
    adjacency: &HashMap<WorkAreaId, Vec<WorkAreaId>>,
    building_counts: &HashMap<WorkAreaId, u32>,
    config: &ClusterConfig,
) -> Vec<WorkAreaId> {
    let mut cluster = Vec::new();
    let mut total: u64 = 0;
    let mut queue = VecDeque::from([seed]);
    let mut seen = HashSet::from([seed]);

    while let Some(current) = queue.pop_front() {
        if !unvisited.contains(&current) {
            continue;
        }

        let count = u64::from(building_counts.get(&current).copied().unwrap_or(0));
        if total + count > u64::from(config.max_buildings) {
            seen.remove(&current);
            continue;
        }

        cluster.push(current);
        unvisited.remove(&current);
        total += count;

        for &neighbour in adjacency.get(&current).map(Vec::as_slice).unwrap_or(&[]) {
            if unvisited.contains(&neighbour) && !seen.contains(&neighbour) {
                queue.push_back(neighbour);
                seen.insert(neighbour);
            }
        }
    }

    cluster
}
