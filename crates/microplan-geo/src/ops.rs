//! Spatial predicates over projected polygons.

use geo::{BoundingRect, EuclideanDistance, EuclideanLength, Line, Polygon, Rect};

/// Perpendicular tolerance (metres) when testing segment collinearity.
const COLLINEARITY_TOLERANCE_M: f64 = 1e-6;

/// Total length of the overlapping collinear portions of two polygons'
/// exterior rings.
///
/// Two polygons that share an edge (or part of one) report the shared
/// length; polygons that only touch at a corner report zero. Inputs are
/// expected in projected metre space.
#[must_use]
pub fn shared_boundary_length(a: &Polygon<f64>, b: &Polygon<f64>) -> f64 {
    let mut total = 0.0;
    for segment_a in a.exterior().lines() {
        for segment_b in b.exterior().lines() {
            total += collinear_overlap(segment_a, segment_b);
        }
    }
    total
}

/// Length of the overlap between two segments, or zero when they are not
/// collinear within tolerance.
fn collinear_overlap(a: Line<f64>, b: Line<f64>) -> f64 {
    let length = a.euclidean_length();
    if length < COLLINEARITY_TOLERANCE_M {
        return 0.0;
    }
    let ux = a.dx() / length;
    let uy = a.dy() / length;

    // Perpendicular distance of b's endpoints from the line through a.
    let perp = |x: f64, y: f64| ((x - a.start.x) * uy - (y - a.start.y) * ux).abs();
    if perp(b.start.x, b.start.y) > COLLINEARITY_TOLERANCE_M
        || perp(b.end.x, b.end.y) > COLLINEARITY_TOLERANCE_M
    {
        return 0.0;
    }

    // Project b's endpoints onto a's direction and intersect the intervals.
    let t = |x: f64, y: f64| (x - a.start.x) * ux + (y - a.start.y) * uy;
    let (t0, t1) = (t(b.start.x, b.start.y), t(b.end.x, b.end.y));
    let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
    (hi.min(length) - lo.max(0.0)).max(0.0)
}

/// Minimum Euclidean distance between two polygons, zero when they
/// intersect or touch. Inputs are expected in projected metre space.
#[must_use]
pub fn polygon_distance(a: &Polygon<f64>, b: &Polygon<f64>) -> f64 {
    a.euclidean_distance(b)
}

/// Axis-aligned extent of a collection of polygons, or `None` when empty.
pub fn extent<'a>(polygons: impl IntoIterator<Item = &'a Polygon<f64>>) -> Option<Rect<f64>> {
    let mut bounds: Option<Rect<f64>> = None;
    for polygon in polygons {
        let Some(rect) = polygon.bounding_rect() else {
            continue;
        };
        bounds = Some(match bounds {
            None => rect,
            Some(acc) => Rect::new(
                geo::coord! {
                    x: acc.min().x.min(rect.min().x),
                    y: acc.min().y.min(rect.min().y),
                },
                geo::coord! {
                    x: acc.max().x.max(rect.max().x),
                    y: acc.max().y.max(rect.max().y),
                },
            ),
        });
    }
    bounds
}
