//! WKT parsing and formatting for plan geometries.
//!
//! The import pipeline stores centroids as `POINT(lon lat)` and boundaries
//! as `POLYGON((lon lat, ...))`. Anything else is rejected here rather than
//! surfacing later as a geometry panic inside the clustering pipeline.

use crate::error::{GeoError, Result};
use geo::{Area, CoordsIter, Geometry, Point, Polygon};
use std::str::FromStr;
use wkt::{ToWkt, Wkt};

/// Parse a WKT `POINT`.
///
/// # Errors
///
/// Returns [`GeoError::Wkt`] for unparseable input and
/// [`GeoError::NotAPoint`] when the WKT holds a different geometry type.
pub fn parse_point(input: &str) -> Result<Point<f64>> {
    match parse_geometry(input)? {
        Geometry::Point(point) => Ok(point),
        other => Err(GeoError::NotAPoint(kind_name(&other).to_string())),
    }
}

/// Parse and validate a WKT `POLYGON`.
///
/// # Errors
///
/// Returns [`GeoError::Wkt`] for unparseable input,
/// [`GeoError::NotAPolygon`] for a different geometry type, and
/// [`GeoError::InvalidPolygon`] for degenerate rings.
pub fn parse_polygon(input: &str) -> Result<Polygon<f64>> {
    let polygon = match parse_geometry(input)? {
        Geometry::Polygon(polygon) => polygon,
        other => return Err(GeoError::NotAPolygon(kind_name(&other).to_string())),
    };
    validate_polygon(&polygon)?;
    Ok(polygon)
}

/// Format a point as WKT.
#[must_use]
pub fn format_point(point: &Point<f64>) -> String {
    point.wkt_string()
}

/// Format a polygon as WKT.
#[must_use]
pub fn format_polygon(polygon: &Polygon<f64>) -> String {
    polygon.wkt_string()
}

fn parse_geometry(input: &str) -> Result<Geometry<f64>> {
    let parsed =
        Wkt::<f64>::from_str(input.trim()).map_err(|e| GeoError::Wkt(e.to_string()))?;
    Geometry::try_from(parsed).map_err(|e| GeoError::Wkt(e.to_string()))
}

fn validate_polygon(polygon: &Polygon<f64>) -> Result<()> {
    // geo closes exterior rings on construction, so a closed ring with at
    // least 3 distinct vertices has at least 4 coordinates.
    if polygon.exterior().0.len() < 4 {
        return Err(GeoError::InvalidPolygon(
            "exterior ring needs at least 3 distinct vertices".to_string(),
        ));
    }
    if polygon.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(GeoError::InvalidPolygon(
            "non-finite coordinate".to_string(),
        ));
    }
    if polygon.unsigned_area() == 0.0 {
        return Err(GeoError::InvalidPolygon("zero area".to_string()));
    }
    Ok(())
}

fn kind_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
