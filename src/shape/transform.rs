use crate::math::transform_2d::rotate_point_with;
use crate::math::Point2;

use super::{Shape, ShapeStore, ShapeTag};

/// Rotates every ring of every shape about a pivot.
///
/// Pure: the input store is never mutated. Animation code calls this with the
/// unrotated baseline and the absolute angle of the current frame, so
/// repeated application never accumulates error.
#[derive(Debug, Clone, Copy)]
pub struct RigidTransform {
    center: Point2,
    angle: f64,
}

impl RigidTransform {
    /// Creates a new `RigidTransform`.
    ///
    /// * `angle` - Rotation angle in radians.
    #[must_use]
    pub fn new(center: Point2, angle: f64) -> Self {
        Self { center, angle }
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    /// Rotation angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Rotates one shape. Reference markers are returned unchanged.
    #[must_use]
    pub fn apply_to_shape(&self, shape: &Shape) -> Shape {
        if shape.tag == ShapeTag::Reference {
            return shape.clone();
        }
        let (sin, cos) = self.angle.sin_cos();
        let rotate_ring = |ring: &Vec<Point2>| -> Vec<Point2> {
            ring.iter()
                .map(|p| rotate_point_with(p, &self.center, sin, cos))
                .collect()
        };
        Shape {
            outer_ring: rotate_ring(&shape.outer_ring),
            holes: shape.holes.iter().map(rotate_ring).collect(),
            tag: shape.tag,
            role: shape.role.clone(),
        }
    }

    /// Rotates a whole store, keeping shape ids.
    #[must_use]
    pub fn apply(&self, store: &ShapeStore) -> ShapeStore {
        store.map_shapes(|shape| self.apply_to_shape(shape))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, TAU};

    use approx::assert_abs_diff_eq;

    use super::*;

    fn store() -> (ShapeStore, crate::shape::ShapeId, crate::shape::ShapeId) {
        let mut store = ShapeStore::new();
        let square = store.insert(Shape::rectangle(200.0, 180.0, 20.0, 20.0));
        let marker = store.insert(Shape::reference(Point2::new(10.0, 10.0), None));
        (store, square, marker)
    }

    #[test]
    fn quarter_turn_moves_vertices() {
        let (store, square, _) = store();
        let center = Point2::new(190.0, 190.0);
        let rotated = RigidTransform::new(center, FRAC_PI_2).apply(&store);
        let first = rotated.get(square).unwrap().outer_ring[0];
        // (200, 180) is (10, -10) from the pivot; a quarter turn maps it to (10, 10).
        assert_abs_diff_eq!(first.x, 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.y, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn input_is_not_mutated() {
        let (store, square, _) = store();
        let before = store.get(square).unwrap().clone();
        let _ = RigidTransform::new(Point2::new(0.0, 0.0), 1.0).apply(&store);
        assert_eq!(store.get(square).unwrap(), &before);
    }

    #[test]
    fn references_are_left_in_place() {
        let (store, _, marker) = store();
        let rotated = RigidTransform::new(Point2::new(0.0, 0.0), 2.0).apply(&store);
        assert_eq!(rotated.get(marker).unwrap(), store.get(marker).unwrap());
    }

    #[test]
    fn same_angle_is_deterministic() {
        let (store, square, _) = store();
        let t = RigidTransform::new(Point2::new(190.0, 190.0), 0.731);
        let a = t.apply(&store);
        let b = t.apply(&store);
        assert_eq!(a.get(square).unwrap(), b.get(square).unwrap());
    }

    #[test]
    fn full_turn_returns_to_start() {
        let (store, square, _) = store();
        let rotated = RigidTransform::new(Point2::new(190.0, 190.0), TAU).apply(&store);
        let original = store.get(square).unwrap();
        for (a, b) in rotated.get(square).unwrap().outer_ring.iter().zip(&original.outer_ring) {
            assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
            assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn area_is_preserved() {
        let (store, _, _) = store();
        let rotated = RigidTransform::new(Point2::new(190.0, 190.0), 0.4).apply(&store);
        assert_abs_diff_eq!(rotated.total_area(), store.total_area(), epsilon = 1e-6);
    }
}
