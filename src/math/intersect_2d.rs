use super::{Point2, TOLERANCE};

/// Half-plane value of `point` relative to the directed line `start -> end`.
///
/// Computed as `(point - start) x (end - start)`. Positive and negative values
/// lie on opposite sides; zero means the point is on the line.
#[must_use]
#[inline]
pub fn half_plane_value(point: &Point2, start: &Point2, end: &Point2) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    (point.x - start.x) * dy - (point.y - start.y) * dx
}

/// Intersection of the infinite line through `p1, p2` with the infinite line
/// through `p3, p4`.
///
/// Returns `None` when the lines are parallel or either is degenerate; the
/// caller treats that as "no intersection contributed".
#[must_use]
pub fn line_intersection(p1: &Point2, p2: &Point2, p3: &Point2, p4: &Point2) -> Option<Point2> {
    let denom = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if denom.abs() < TOLERANCE {
        return None;
    }
    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / denom;
    Some(Point2::new(p1.x + t * (p2.x - p1.x), p1.y + t * (p2.y - p1.y)))
}
