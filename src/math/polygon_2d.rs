use super::{Point2, TOLERANCE};

/// Tolerance used when deciding whether a ring repeats its first point.
pub const CLOSURE_TOLERANCE: f64 = 1e-6;

/// Computes the signed area of a ring (shoelace formula).
///
/// Accepts open or closed rings; a repeated closing point contributes nothing.
/// In canvas space (y down) clockwise-on-screen rings come out positive.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Unsigned shoelace area of a ring.
#[must_use]
pub fn polygon_area(points: &[Point2]) -> f64 {
    signed_area_2d(points).abs()
}

/// Area-weighted centroid of a ring.
///
/// Falls back to the vertex average when the ring has no area.
#[must_use]
pub fn centroid(points: &[Point2]) -> Option<Point2> {
    let ring = open_ring(points);
    if ring.is_empty() {
        return None;
    }
    let n = ring.len();
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        area2 += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    if area2.abs() < TOLERANCE {
        #[allow(clippy::cast_precision_loss)]
        let inv = 1.0 / n as f64;
        let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        return Some(Point2::new(sx * inv, sy * inv));
    }
    let factor = 1.0 / (3.0 * area2);
    Some(Point2::new(cx * factor, cy * factor))
}

/// Returns `true` if the last point repeats the first.
#[must_use]
pub fn is_closed(points: &[Point2]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 => {
            (first.x - last.x).abs() <= CLOSURE_TOLERANCE
                && (first.y - last.y).abs() <= CLOSURE_TOLERANCE
        }
        _ => false,
    }
}

/// Returns the ring without its closing duplicate point.
#[must_use]
pub fn open_ring(points: &[Point2]) -> &[Point2] {
    if is_closed(points) {
        &points[..points.len() - 1]
    } else {
        points
    }
}

/// Appends the first point if the ring is not already closed.
pub fn close_ring(points: &mut Vec<Point2>) {
    if points.len() > 1 && !is_closed(points) {
        let first = points[0];
        points.push(first);
    }
}

/// Number of distinct vertices, ignoring the closing point.
#[must_use]
pub fn distinct_vertex_count(points: &[Point2]) -> usize {
    open_ring(points).len()
}

/// Axis-aligned bounds of a set of points as `(min, max)`.
#[must_use]
pub fn bounds(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}
