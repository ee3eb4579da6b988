//! # microplan-geo
//!
//! Geometry support for microplanning: WKT parsing and formatting, Web
//! Mercator projection, and the spatial predicates the clustering pipeline
//! is built on.
//!
//! All input coordinates are WGS84 (longitude, latitude). Distances and
//! shared-boundary lengths are computed in projected metre space
//! (spherical Web Mercator), matching how the adjacency rules are
//! configured.
//!
//! ## Quick Start
//!
//! ```
//! use microplan_geo::{parse_point, parse_polygon, project_polygon, polygon_distance};
//!
//! let centroid = parse_point("POINT(77.5 28.5)")?;
//! let a = parse_polygon("POLYGON((77 28,78 28,78 29,77 29,77 28))")?;
//! let b = parse_polygon("POLYGON((79 28,80 28,80 29,79 29,79 28))")?;
//!
//! let metres = polygon_distance(&project_polygon(&a), &project_polygon(&b));
//! assert!(metres > 100_000.0);
//! # Ok::<(), microplan_geo::GeoError>(())
//! ```

pub mod error;
pub mod index;
pub mod ops;
pub mod parse;
pub mod project;

pub use error::{GeoError, Result};
pub use index::BoundsIndex;
pub use ops::{extent, polygon_distance, shared_boundary_length};
pub use parse::{format_point, format_polygon, parse_point, parse_polygon};
pub use project::{project_point, project_polygon, EARTH_RADIUS_M};
