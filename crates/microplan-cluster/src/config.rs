//! Clustering configuration.

use serde::{Deserialize, Serialize};

/// Tunables for work-area clustering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Maximum total building count per group.
    ///
    /// A single area whose own count exceeds this still gets a group of
    /// its own; it is never merged with anything.
    pub max_buildings: u32,
    /// Adjacency buffer in metres: areas within this distance of each
    /// other count as neighbours even without a shared boundary.
    pub buffer_distance: f64,
    /// Minimum shared boundary length in metres for the shared-edge
    /// adjacency rule. Guards against float noise on corner touches.
    pub shared_boundary_tolerance: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_buildings: 300,
            buffer_distance: 100.0,
            shared_boundary_tolerance: 1e-6,
        }
    }
}
