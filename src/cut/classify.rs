use crate::math::{Point2, TOLERANCE};

use super::{CutPrimitive, Side};

/// Per-pixel side test for one cut primitive.
///
/// All trigonometry and triangle dot products are computed once in
/// [`RegionClassifier::new`]; [`RegionClassifier::classify`] is
/// allocation-free and safe to call in the buffer scan loop.
#[derive(Debug, Clone, Copy)]
pub struct RegionClassifier {
    kind: Kind,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    HalfPlane {
        sx: f64,
        sy: f64,
        dx: f64,
        dy: f64,
    },
    Triangle {
        ax: f64,
        ay: f64,
        v0x: f64,
        v0y: f64,
        v1x: f64,
        v1y: f64,
        dot00: f64,
        dot01: f64,
        dot11: f64,
        inv_denom: f64,
    },
    Square {
        cx: f64,
        cy: f64,
        sin: f64,
        cos: f64,
        half_extent: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius_sq: f64,
    },
    /// Collinear triangle: nothing is inside.
    Empty,
}

impl RegionClassifier {
    /// Precomputes the side test for `primitive`.
    #[must_use]
    pub fn new(primitive: &CutPrimitive) -> Self {
        let kind = match *primitive {
            CutPrimitive::Line { start, end } => Kind::HalfPlane {
                sx: start.x,
                sy: start.y,
                dx: end.x - start.x,
                dy: end.y - start.y,
            },
            CutPrimitive::Triangle { vertices: [a, b, c] } => {
                let v0 = c - a;
                let v1 = b - a;
                let dot00 = v0.dot(&v0);
                let dot01 = v0.dot(&v1);
                let dot11 = v1.dot(&v1);
                let denom = dot00 * dot11 - dot01 * dot01;
                if denom.abs() < TOLERANCE {
                    Kind::Empty
                } else {
                    Kind::Triangle {
                        ax: a.x,
                        ay: a.y,
                        v0x: v0.x,
                        v0y: v0.y,
                        v1x: v1.x,
                        v1y: v1.y,
                        dot00,
                        dot01,
                        dot11,
                        inv_denom: 1.0 / denom,
                    }
                }
            }
            CutPrimitive::RotatedSquare {
                center,
                half_extent,
                rotation,
            } => {
                let (sin, cos) = rotation.sin_cos();
                Kind::Square {
                    cx: center.x,
                    cy: center.y,
                    sin,
                    cos,
                    half_extent,
                }
            }
            CutPrimitive::Circle { center, radius } => Kind::Circle {
                cx: center.x,
                cy: center.y,
                radius_sq: radius * radius,
            },
        };
        Self { kind }
    }

    /// Side of the point `(x, y)`.
    #[must_use]
    #[inline]
    pub fn classify(&self, x: f64, y: f64) -> Side {
        let inside = match self.kind {
            Kind::HalfPlane { sx, sy, dx, dy } => (x - sx) * dy - (y - sy) * dx > 0.0,
            Kind::Triangle {
                ax,
                ay,
                v0x,
                v0y,
                v1x,
                v1y,
                dot00,
                dot01,
                dot11,
                inv_denom,
            } => {
                let v2x = x - ax;
                let v2y = y - ay;
                let dot02 = v0x * v2x + v0y * v2y;
                let dot12 = v1x * v2x + v1y * v2y;
                let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
                let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;
                u >= 0.0 && v >= 0.0 && u + v <= 1.0
            }
            Kind::Square {
                cx,
                cy,
                sin,
                cos,
                half_extent,
            } => {
                // Inverse rotation into the square's local frame.
                let dx = x - cx;
                let dy = y - cy;
                let local_x = dx * cos + dy * sin;
                let local_y = -dx * sin + dy * cos;
                local_x.abs() <= half_extent && local_y.abs() <= half_extent
            }
            Kind::Circle { cx, cy, radius_sq } => {
                let dx = x - cx;
                let dy = y - cy;
                dx * dx + dy * dy <= radius_sq
            }
            Kind::Empty => false,
        };
        if inside {
            Side::A
        } else {
            Side::B
        }
    }

    /// Side of a point.
    #[must_use]
    #[inline]
    pub fn classify_point(&self, point: &Point2) -> Side {
        self.classify(point.x, point.y)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn line_sides_and_boundary() {
        let c = RegionClassifier::new(&CutPrimitive::line(p(50.0, 0.0), p(50.0, 100.0)));
        assert_eq!(c.classify(60.0, 10.0), Side::A);
        assert_eq!(c.classify(40.0, 10.0), Side::B);
        // On the line: always the fixed side.
        assert_eq!(c.classify(50.0, 30.0), Side::B);
    }

    #[test]
    fn triangle_inside_outside() {
        let tri = CutPrimitive::Triangle {
            vertices: [p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0)],
        };
        let c = RegionClassifier::new(&tri);
        assert_eq!(c.classify(2.0, 2.0), Side::A);
        assert_eq!(c.classify(8.0, 8.0), Side::B);
        assert_eq!(c.classify(-1.0, 1.0), Side::B);
    }

    #[test]
    fn triangle_edge_is_consistent() {
        let tri = CutPrimitive::Triangle {
            vertices: [p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0)],
        };
        let c = RegionClassifier::new(&tri);
        let first = c.classify(5.0, 0.0);
        for _ in 0..10 {
            assert_eq!(c.classify(5.0, 0.0), first);
        }
        assert_eq!(RegionClassifier::new(&tri).classify(5.0, 0.0), first);
        assert_eq!(c.classify(0.0, 0.0), Side::A);
    }

    #[test]
    fn collinear_triangle_contains_nothing() {
        let tri = CutPrimitive::Triangle {
            vertices: [p(0.0, 0.0), p(5.0, 5.0), p(10.0, 10.0)],
        };
        let c = RegionClassifier::new(&tri);
        assert_eq!(c.classify(5.0, 5.0), Side::B);
    }

    #[test]
    fn rotated_square_uses_local_frame() {
        let sq = CutPrimitive::RotatedSquare {
            center: p(0.0, 0.0),
            half_extent: 10.0,
            rotation: FRAC_PI_4,
        };
        let c = RegionClassifier::new(&sq);
        // Axis-aligned corner region falls outside once the square is turned 45 degrees.
        assert_eq!(c.classify(9.5, 9.5), Side::B);
        // Along the axis the turned square reaches half_extent * sqrt(2).
        assert_eq!(c.classify(13.0, 0.0), Side::A);
        assert_eq!(c.classify(0.0, 0.0), Side::A);
    }

    #[test]
    fn unrotated_square_bounds() {
        let sq = CutPrimitive::RotatedSquare {
            center: p(50.0, 50.0),
            half_extent: 10.0,
            rotation: 0.0,
        };
        let c = RegionClassifier::new(&sq);
        assert_eq!(c.classify(60.0, 40.0), Side::A);
        assert_eq!(c.classify(60.5, 50.0), Side::B);
    }

    #[test]
    fn circle_includes_rim() {
        let c = RegionClassifier::new(&CutPrimitive::Circle {
            center: p(0.0, 0.0),
            radius: 5.0,
        });
        assert_eq!(c.classify(3.0, 4.0), Side::A);
        assert_eq!(c.classify(3.1, 4.0), Side::B);
        assert_eq!(c.classify_point(&p(0.0, 0.0)), Side::A);
    }
}
