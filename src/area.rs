use crate::config::EngineConfig;
use crate::cut::{CutPrimitive, RegionClassifier, Side};
use crate::error::CutError;
use crate::raster::{PixelBuffer, Rgb};

/// Outcome of one cut evaluation.
///
/// Percentages are normalised so `side_a_percentage <= side_b_percentage`.
/// `smaller` records which geometric side of the primitive the smaller share
/// came from, so callers can colour or clip the right half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaResult {
    /// Pixels on the smaller side.
    pub side_a_pixels: u64,
    /// Pixels on the larger side.
    pub side_b_pixels: u64,
    /// All sentinel pixels in the buffer.
    pub total_shape_pixels: u64,
    /// Share of the smaller side, in `[0, 50]`.
    pub side_a_percentage: f64,
    /// Share of the larger side, in `[50, 100]` (0 for an empty shape).
    pub side_b_percentage: f64,
    /// Geometric side that holds `side_a_pixels`.
    pub smaller: Side,
}

impl AreaResult {
    /// Builds a normalised result from raw per-side counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(geometric_a: u64, geometric_b: u64) -> Self {
        let total = geometric_a + geometric_b;
        let (smaller, small, large) = if geometric_a <= geometric_b {
            (Side::A, geometric_a, geometric_b)
        } else {
            (Side::B, geometric_b, geometric_a)
        };
        let (side_a_percentage, side_b_percentage) = if total == 0 {
            (0.0, 0.0)
        } else {
            let t = total as f64;
            (small as f64 / t * 100.0, large as f64 / t * 100.0)
        };
        Self {
            side_a_pixels: small,
            side_b_pixels: large,
            total_shape_pixels: total,
            side_a_percentage,
            side_b_percentage,
            smaller,
        }
    }

    /// Geometric side that holds the larger share; the side a halving cut
    /// keeps.
    #[must_use]
    pub fn larger(&self) -> Side {
        self.smaller.opposite()
    }

    /// Percentage that fell on geometric `side`.
    #[must_use]
    pub fn percentage_of(&self, side: Side) -> f64 {
        if side == self.smaller {
            self.side_a_percentage
        } else {
            self.side_b_percentage
        }
    }

    /// Checks the split against the validity floor.
    ///
    /// # Errors
    ///
    /// Returns `CutError::InvalidSplit` if either side is below `floor`
    /// percent, which includes cuts that miss the shape entirely.
    pub fn validate(&self, floor: f64) -> Result<(), CutError> {
        if validate_cut(self, floor) {
            Ok(())
        } else {
            Err(CutError::InvalidSplit {
                side_a: self.side_a_percentage,
                side_b: self.side_b_percentage,
                floor,
            })
        }
    }
}

/// Returns `true` if both sides hold at least `floor` percent of the shape.
#[must_use]
pub fn validate_cut(result: &AreaResult, floor: f64) -> bool {
    result.total_shape_pixels > 0
        && result.side_a_percentage >= floor
        && result.side_b_percentage >= floor
}

/// Tallies sentinel pixels on each side of a cut primitive.
///
/// One pass over the buffer; each shape pixel is classified at its centre.
pub struct ComputeAreas<'a> {
    primitive: &'a CutPrimitive,
    sentinel: Rgb,
    tolerance: u8,
}

impl<'a> ComputeAreas<'a> {
    /// Creates a new `ComputeAreas` operation using the default sentinel and
    /// exact colour matching.
    #[must_use]
    pub fn new(primitive: &'a CutPrimitive) -> Self {
        Self {
            primitive,
            sentinel: EngineConfig::default().fill_sentinel,
            tolerance: 0,
        }
    }

    /// Sets the colour that marks shape pixels.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: Rgb) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Sets the per-channel tolerance for sentinel matching.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the operation over `buffer`.
    #[must_use]
    pub fn execute(&self, buffer: &PixelBuffer) -> AreaResult {
        let classifier = RegionClassifier::new(self.primitive);
        let width = buffer.width() as usize;
        let mut side_a = 0_u64;
        let mut side_b = 0_u64;
        for (i, px) in buffer.as_rgba().chunks_exact(4).enumerate() {
            if !self.sentinel.matches(px, self.tolerance) {
                continue;
            }
            let (x, y) = (i % width, i / width);
            #[allow(clippy::cast_precision_loss)]
            let side = classifier.classify(x as f64 + 0.5, y as f64 + 0.5);
            match side {
                Side::A => side_a += 1,
                Side::B => side_b += 1,
            }
        }
        let result = AreaResult::from_counts(side_a, side_b);
        tracing::trace!(
            total = result.total_shape_pixels,
            smaller = result.side_a_percentage,
            "computed cut areas"
        );
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Point2;
    use crate::raster::Rasterize;
    use crate::shape::{Shape, ShapeStore};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square_buffer() -> PixelBuffer {
        let store: ShapeStore = [Shape::rectangle(0.0, 0.0, 100.0, 100.0)].into_iter().collect();
        Rasterize::new(100, 100).execute(&store).unwrap()
    }

    #[test]
    fn vertical_bisection_is_even() {
        let line = CutPrimitive::line(p(50.0, 0.0), p(50.0, 100.0));
        let result = ComputeAreas::new(&line).execute(&square_buffer());
        assert_eq!(result.total_shape_pixels, 10_000);
        assert_relative_eq!(result.side_a_percentage, 50.0);
        assert_relative_eq!(result.side_b_percentage, 50.0);
        assert!(validate_cut(&result, 0.1));
    }

    #[test]
    fn smaller_side_is_reported_first() {
        // Side A of this line is x > 20, the larger part.
        let line = CutPrimitive::line(p(20.0, 0.0), p(20.0, 100.0));
        let result = ComputeAreas::new(&line).execute(&square_buffer());
        assert_relative_eq!(result.side_a_percentage, 20.0);
        assert_relative_eq!(result.side_b_percentage, 80.0);
        assert_eq!(result.smaller, Side::B);
        assert_eq!(result.larger(), Side::A);
        assert_relative_eq!(result.percentage_of(Side::A), 80.0);
    }

    #[test]
    fn circle_inside_square() {
        let circle = CutPrimitive::circle(p(50.0, 50.0), p(50.0, 70.0));
        let result = ComputeAreas::new(&circle).execute(&square_buffer());
        let expected = std::f64::consts::PI * 400.0 / 100.0;
        assert!((result.side_a_percentage - expected).abs() < 0.2);
        assert_eq!(result.smaller, Side::A);
        assert_relative_eq!(result.side_a_percentage + result.side_b_percentage, 100.0);
    }

    #[test]
    fn missed_triangle_is_invalid() {
        let tri = CutPrimitive::Triangle {
            vertices: [p(300.0, 300.0), p(350.0, 300.0), p(320.0, 340.0)],
        };
        let result = ComputeAreas::new(&tri).execute(&square_buffer());
        assert_relative_eq!(result.side_a_percentage, 0.0);
        assert_relative_eq!(result.side_b_percentage, 100.0);
        assert!(!validate_cut(&result, 0.1));
        assert!(matches!(
            result.validate(0.1),
            Err(CutError::InvalidSplit { .. })
        ));
    }

    #[test]
    fn empty_buffer_reports_zero() {
        let buffer = PixelBuffer::new(10, 10, Rgb::new(255, 255, 255)).unwrap();
        let line = CutPrimitive::line(p(5.0, 0.0), p(5.0, 10.0));
        let result = ComputeAreas::new(&line).execute(&buffer);
        assert_eq!(result.total_shape_pixels, 0);
        assert_relative_eq!(result.side_a_percentage, 0.0);
        assert_relative_eq!(result.side_b_percentage, 0.0);
        assert!(result.validate(0.1).is_err());
    }

    #[test]
    fn sliver_below_floor_is_invalid() {
        let result = AreaResult::from_counts(1, 9_999);
        assert!(result.side_a_percentage < 0.1);
        assert!(!validate_cut(&result, 0.1));
        let result = AreaResult::from_counts(10, 9_990);
        assert!(validate_cut(&result, 0.1));
    }

    #[test]
    fn tolerance_counts_near_sentinel_pixels() {
        let buffer = PixelBuffer::from_rgba(2, 1, vec![221, 221, 221, 255, 219, 222, 221, 255])
            .unwrap();
        let line = CutPrimitive::line(p(1.0, 0.0), p(1.0, 1.0));
        let exact = ComputeAreas::new(&line).execute(&buffer);
        assert_eq!(exact.total_shape_pixels, 1);
        let loose = ComputeAreas::new(&line).with_tolerance(2).execute(&buffer);
        assert_eq!(loose.total_shape_pixels, 2);
        assert_relative_eq!(loose.side_a_percentage, 50.0);
    }

    #[test]
    fn custom_sentinel() {
        let red = Rgb::new(200, 0, 0);
        let store: ShapeStore = [Shape::rectangle(0.0, 0.0, 10.0, 10.0)].into_iter().collect();
        let buffer = Rasterize::new(10, 10).with_fill(red).execute(&store).unwrap();
        let line = CutPrimitive::line(p(0.0, 5.0), p(10.0, 5.0));
        let default = ComputeAreas::new(&line).execute(&buffer);
        assert_eq!(default.total_shape_pixels, 0);
        let result = ComputeAreas::new(&line).with_sentinel(red).execute(&buffer);
        assert_eq!(result.total_shape_pixels, 100);
    }
}
