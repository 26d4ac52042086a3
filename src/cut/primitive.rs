use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, TAU};

use crate::math::{Point2, Vector2, TOLERANCE};

/// The geometric tool used for one cut attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutPrimitive {
    /// A straight cut, treated as an infinite line through both points.
    Line { start: Point2, end: Point2 },
    /// Pixels inside the triangle are cut away from the rest.
    Triangle { vertices: [Point2; 3] },
    /// Square centred on `center`, `half_extent` from centre to each side,
    /// turned by `rotation` radians.
    RotatedSquare {
        center: Point2,
        half_extent: f64,
        rotation: f64,
    },
    /// Disc of `radius` around `center`.
    Circle { center: Point2, radius: f64 },
}

impl CutPrimitive {
    /// Line from a drag.
    #[must_use]
    pub fn line(start: Point2, end: Point2) -> Self {
        Self::Line { start, end }
    }

    /// Equilateral triangle from a centre and a drag point.
    ///
    /// The drag point sits on the midpoint of one edge, so the circumradius is
    /// twice the drag distance and the triangle turns with the drag.
    #[must_use]
    pub fn equilateral_triangle(center: Point2, drag: Point2) -> Self {
        let delta = drag - center;
        let radius = delta.norm() * 2.0;
        let rotation = delta.y.atan2(delta.x) + FRAC_PI_6;
        let vertex = |i: u8| {
            let angle = -FRAC_PI_2 + rotation + f64::from(i) * TAU / 3.0;
            Point2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        };
        Self::Triangle {
            vertices: [vertex(0), vertex(1), vertex(2)],
        }
    }

    /// Square from a centre and a drag point: the drag sets both the
    /// half-extent and the rotation.
    #[must_use]
    pub fn rotated_square(center: Point2, drag: Point2) -> Self {
        let delta = drag - center;
        Self::RotatedSquare {
            center,
            half_extent: delta.norm(),
            rotation: delta.y.atan2(delta.x),
        }
    }

    /// Circle from a centre and a point on its rim.
    #[must_use]
    pub fn circle(center: Point2, rim: Point2) -> Self {
        Self::Circle {
            center,
            radius: (rim - center).norm(),
        }
    }

    /// Characteristic size: line length, triangle circumradius, square
    /// half-extent or circle radius.
    #[must_use]
    pub fn extent(&self) -> f64 {
        match self {
            Self::Line { start, end } => (*end - *start).norm(),
            Self::Triangle { vertices } => {
                let c = Point2::new(
                    (vertices[0].x + vertices[1].x + vertices[2].x) / 3.0,
                    (vertices[0].y + vertices[1].y + vertices[2].y) / 3.0,
                );
                (vertices[0] - c).norm()
            }
            Self::RotatedSquare { half_extent, .. } => *half_extent,
            Self::Circle { radius, .. } => *radius,
        }
    }

    /// Endpoints if this is a line.
    #[must_use]
    pub fn line_endpoints(&self) -> Option<(Point2, Point2)> {
        match self {
            Self::Line { start, end } => Some((*start, *end)),
            _ => None,
        }
    }

    /// Final form of the primitive for evaluation on a `width x height`
    /// canvas.
    ///
    /// Lines are oriented left to right (top to bottom when vertical) so the
    /// side labels do not depend on drag direction, then extended to the
    /// canvas edges. Other primitives are returned unchanged.
    #[must_use]
    pub fn finalized(&self, width: f64, height: f64) -> Self {
        match *self {
            Self::Line { start, end } => {
                let swap = if (end.x - start.x).abs() < TOLERANCE {
                    start.y > end.y
                } else {
                    start.x > end.x
                };
                let (start, end) = if swap { (end, start) } else { (start, end) };
                let (start, end) = extend_to_bounds(start, end, width, height);
                Self::Line { start, end }
            }
            other => other,
        }
    }
}

/// Extends the line through `start` and `end` to the canvas border,
/// preserving its direction.
///
/// Lines that miss the canvas, and zero-length input, come back unchanged.
#[must_use]
pub fn extend_to_bounds(start: Point2, end: Point2, width: f64, height: f64) -> (Point2, Point2) {
    let d = end - start;
    if d.norm() < TOLERANCE {
        return (start, end);
    }
    let eps = 1e-9;

    let mut t_min = f64::INFINITY;
    let mut t_max = f64::NEG_INFINITY;
    let mut consider = |t: f64| {
        let p = start + d * t;
        if p.x >= -eps && p.x <= width + eps && p.y >= -eps && p.y <= height + eps {
            t_min = t_min.min(t);
            t_max = t_max.max(t);
        }
    };
    if d.x.abs() > TOLERANCE {
        consider(-start.x / d.x);
        consider((width - start.x) / d.x);
    }
    if d.y.abs() > TOLERANCE {
        consider(-start.y / d.y);
        consider((height - start.y) / d.y);
    }

    if !t_min.is_finite() || t_max - t_min < eps {
        return (start, end);
    }
    let clamp = |p: Point2| Point2::new(p.x.clamp(0.0, width), p.y.clamp(0.0, height));
    (clamp(start + d * t_min), clamp(start + d * t_max))
}

/// Restriction on the direction of a line cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineConstraint {
    /// Any direction.
    #[default]
    Free,
    /// Locked to the drag start's row.
    Horizontal,
    /// Locked to the drag start's column.
    Vertical,
    /// 45 degrees rising to the right on screen (`/`).
    DiagonalAscending,
    /// 45 degrees falling to the right on screen (`\`).
    DiagonalDescending,
}

impl LineConstraint {
    /// Projects the pointer position onto the allowed direction through
    /// `start`.
    #[must_use]
    pub fn project(self, start: Point2, pointer: Point2) -> Point2 {
        let dx = pointer.x - start.x;
        let dy = pointer.y - start.y;
        match self {
            Self::Free => pointer,
            Self::Horizontal => Point2::new(pointer.x, start.y),
            Self::Vertical => Point2::new(start.x, pointer.y),
            Self::DiagonalAscending => {
                let proj = (dx - dy) / 2.0;
                Point2::new(start.x + proj, start.y - proj)
            }
            Self::DiagonalDescending => {
                let proj = (dx + dy) / 2.0;
                Point2::new(start.x + proj, start.y + proj)
            }
        }
    }

    /// Unit direction of a constrained line, `None` when free.
    #[must_use]
    pub fn direction(self) -> Option<Vector2> {
        let d = match self {
            Self::Free => return None,
            Self::Horizontal => Vector2::new(1.0, 0.0),
            Self::Vertical => Vector2::new(0.0, 1.0),
            Self::DiagonalAscending => Vector2::new(1.0, -1.0),
            Self::DiagonalDescending => Vector2::new(1.0, 1.0),
        };
        Some(d.normalize())
    }
}
