//! Forward Web Mercator projection (WGS84 lon/lat to EPSG:3857 metres).
//!
//! Adjacency buffers and shared-boundary tolerances are configured in
//! metres, so geometries are projected once before any distance math.
//! The spherical formula is exact for the single CRS pair used here.

use geo::{Coord, MapCoords, Point, Polygon};

/// Web Mercator sphere radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude bound of the Web Mercator projection, in degrees.
const MAX_LATITUDE_DEG: f64 = 85.051_128_779_806_59;

fn mercator(c: Coord<f64>) -> Coord<f64> {
    let lon = c.x.to_radians();
    let lat = c.y.clamp(-MAX_LATITUDE_DEG, MAX_LATITUDE_DEG).to_radians();
    Coord {
        x: EARTH_RADIUS_M * lon,
        y: EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

/// Project a WGS84 point to Web Mercator metres.
#[must_use]
pub fn project_point(point: &Point<f64>) -> Point<f64> {
    Point::from(mercator(point.0))
}

/// Project a WGS84 polygon to Web Mercator metres.
#[must_use]
pub fn project_polygon(polygon: &Polygon<f64>) -> Polygon<f64> {
    polygon.map_coords(mercator)
}
