//! # microplan-cluster
//!
//! Partitions a plan's ungrouped work areas into spatially-adjacent groups,
//! each capped at a maximum total building count.
//!
//! Within each ward, areas form an adjacency graph (shared boundary, or
//! within a buffer distance of each other). A breadth-first traversal grows
//! clusters from deterministically ordered seeds, skipping neighbours that
//! would push the cluster over the cap; skipped areas seed or join later
//! clusters. Wards are processed independently and never mix.
//!
//! ## Quick Start
//!
//! ```no_run
//! use microplan_cluster::{ClusterConfig, WorkAreaGrouper};
//! use microplan_core::Plan;
//!
//! let mut plan = Plan::load("plan.json")?;
//! let grouper = WorkAreaGrouper::new(ClusterConfig {
//!     max_buildings: 300,
//!     ..ClusterConfig::default()
//! });
//! let outcome = grouper.group(&mut plan)?;
//! println!("created {} groups", outcome.groups_created);
//! plan.save("plan.json")?;
//! # Ok::<(), microplan_core::CoreError>(())
//! ```

pub mod adjacency;
pub mod config;
pub mod grouper;

pub use config::ClusterConfig;
pub use grouper::{GroupingOutcome, WardOutcome, WorkAreaGrouper};
