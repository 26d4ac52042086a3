use super::Point2;

/// Rotates `point` about `center` by `angle` radians.
///
/// In canvas space (y down) a positive angle turns clockwise on screen.
#[must_use]
pub fn rotate_point(point: &Point2, center: &Point2, angle: f64) -> Point2 {
    let (sin, cos) = angle.sin_cos();
    rotate_point_with(point, center, sin, cos)
}

/// Rotation with a precomputed sine and cosine, for tight loops.
#[must_use]
#[inline]
pub fn rotate_point_with(point: &Point2, center: &Point2, sin: f64, cos: f64) -> Point2 {
    let x = point.x - center.x;
    let y = point.y - center.y;
    Point2::new(x * cos - y * sin + center.x, x * sin + y * cos + center.y)
}

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn quarter_turn_about_origin() {
        let p = rotate_point(&Point2::new(1.0, 0.0), &Point2::origin(), FRAC_PI_2);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn half_turn_about_offset_center() {
        let p = rotate_point(&Point2::new(3.0, 2.0), &Point2::new(2.0, 2.0), PI);
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn center_is_fixed() {
        let c = Point2::new(190.0, 190.0);
        let p = rotate_point(&c, &c, 1.234);
        assert_abs_diff_eq!(p.x, c.x, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, c.y, epsilon = 1e-12);
    }

    #[test]
    fn normalize_wraps_both_directions() {
        assert_abs_diff_eq!(normalize_angle(TAU + 0.5), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-0.5), TAU - 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(0.0), 0.0);
    }
}
