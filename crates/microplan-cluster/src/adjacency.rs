//! Adjacency graph construction over projected work-area boundaries.

use crate::config::ClusterConfig;
use geo::Polygon;
use microplan_core::WorkAreaId;
use microplan_geo::{polygon_distance, shared_boundary_length, BoundsIndex};
use std::collections::HashMap;

/// Build the adjacency relation for one ward.
///
/// Two areas are adjacent when their boundaries share an edge longer than
/// the configured tolerance, or when the distance between them is within
/// the buffer. Candidate pairs are pruned with an R-tree over bounding
/// boxes expanded by the buffer distance; the exact tests decide.
///
/// Neighbour lists are sorted by id so traversal order is deterministic.
pub fn build_adjacency(
    boundaries: &HashMap<WorkAreaId, Polygon<f64>>,
    config: &ClusterConfig,
) -> HashMap<WorkAreaId, Vec<WorkAreaId>> {
    let index = BoundsIndex::build(boundaries.iter().map(|(id, poly)| (id.0, poly)));

    let mut adjacency: HashMap<WorkAreaId, Vec<WorkAreaId>> =
        HashMap::with_capacity(boundaries.len());

    for (&area_id, boundary) in boundaries {
        let mut neighbours = Vec::new();
        for candidate_raw in index.candidates_within(boundary, config.buffer_distance) {
            let candidate_id = WorkAreaId(candidate_raw);
            if candidate_id == area_id {
                continue;
            }
            let candidate = &boundaries[&candidate_id];

            let shared = shared_boundary_length(boundary, candidate);
            if shared > config.shared_boundary_tolerance {
                neighbours.push(candidate_id);
                continue;
            }

            if polygon_distance(boundary, candidate) <= config.buffer_distance {
                neighbours.push(candidate_id);
            }
        }
        neighbours.sort_unstable();
        adjacency.insert(area_id, neighbours);
    }

    adjacency
}
