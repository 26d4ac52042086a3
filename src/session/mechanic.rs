use crate::config::EngineConfig;
use crate::cut::{CutPrimitive, LineConstraint};
use crate::error::{CutError, Result, SessionError};
use crate::math::{Point2, TOLERANCE};

/// Pointer track of one cut attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub start: Point2,
    pub current: Point2,
}

impl Drag {
    /// Straight-line distance from the press point to the pointer.
    #[must_use]
    pub fn distance(&self) -> f64 {
        (self.current - self.start).norm()
    }
}

/// How a drag becomes a cut primitive.
///
/// Mechanics hold no interaction state; the [`CutSession`](super::CutSession)
/// owns the drag and passes it in.
#[derive(Debug, Clone, PartialEq)]
pub enum CutMechanic {
    /// Straight cut, optionally locked to a direction.
    Line(LineConstraint),
    /// Equilateral triangle grown from its centre.
    Triangle,
    /// Square grown and turned from its centre.
    RotatedSquare,
    /// Circle grown from its centre.
    Circle,
    /// Several line cuts, each discarding the smaller half.
    Halving(Box<CutMechanic>),
}

impl CutMechanic {
    /// Wraps a line mechanic in a halving sequence.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::HalvingRequiresLine` for any other inner
    /// mechanic.
    pub fn halving(inner: CutMechanic) -> Result<Self> {
        let mechanic = Self::Halving(Box::new(inner));
        mechanic.validate()?;
        Ok(mechanic)
    }

    /// Checks that a halving mechanic wraps a plain line mechanic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::HalvingRequiresLine` otherwise.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Halving(inner) if !matches!(**inner, Self::Line(_)) => {
                Err(SessionError::HalvingRequiresLine.into())
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn is_halving(&self) -> bool {
        matches!(self, Self::Halving(_))
    }

    /// Valid cuts before the session stops accepting input.
    #[must_use]
    pub fn max_cuts(&self, config: &EngineConfig) -> u32 {
        if self.is_halving() {
            config.max_halving_cuts
        } else {
            1
        }
    }

    /// Shortest drag that counts as a cut.
    #[must_use]
    pub fn min_drag(&self, config: &EngineConfig) -> f64 {
        match self {
            Self::RotatedSquare => config.min_drag_distance.max(config.min_square_half_extent),
            Self::Halving(inner) => inner.min_drag(config),
            _ => config.min_drag_distance,
        }
    }

    /// Begins a drag at `point`.
    #[must_use]
    pub fn on_start(&self, point: Point2) -> Drag {
        Drag {
            start: point,
            current: point,
        }
    }

    /// Tracks the pointer and returns a preview primitive once the drag is
    /// long enough to show one.
    pub fn on_move(
        &self,
        drag: &mut Drag,
        point: Point2,
        config: &EngineConfig,
    ) -> Option<CutPrimitive> {
        drag.current = point;
        if drag.distance() < config.preview_threshold {
            return None;
        }
        let (width, height) = config.canvas_size();
        Some(self.build(drag).finalized(width, height))
    }

    /// Builds the final primitive, with lines extended to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `CutError::DegenerateCut` if the drag is shorter than
    /// [`CutMechanic::min_drag`].
    pub fn on_end(
        &self,
        drag: &Drag,
        config: &EngineConfig,
    ) -> std::result::Result<CutPrimitive, CutError> {
        let distance = drag.distance();
        let min = self.min_drag(config);
        if distance < min {
            return Err(CutError::DegenerateCut { distance, min });
        }
        let (width, height) = config.canvas_size();
        Ok(self.build(drag).finalized(width, height))
    }

    fn build(&self, drag: &Drag) -> CutPrimitive {
        match self {
            Self::Line(constraint) => {
                let mut end = constraint.project(drag.start, drag.current);
                // A drag across the locked direction still picks the line
                // through its start.
                if (end - drag.start).norm() < TOLERANCE {
                    if let Some(dir) = constraint.direction() {
                        end = drag.start + dir;
                    }
                }
                CutPrimitive::line(drag.start, end)
            }
            Self::Triangle => CutPrimitive::equilateral_triangle(drag.start, drag.current),
            Self::RotatedSquare => CutPrimitive::rotated_square(drag.start, drag.current),
            Self::Circle => CutPrimitive::circle(drag.start, drag.current),
            Self::Halving(inner) => inner.build(drag),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn drag(from: Point2, to: Point2) -> Drag {
        Drag {
            start: from,
            current: to,
        }
    }

    #[test]
    fn halving_only_wraps_lines() {
        assert!(CutMechanic::halving(CutMechanic::Line(LineConstraint::Free)).is_ok());
        assert!(CutMechanic::halving(CutMechanic::Circle).is_err());
        assert!(CutMechanic::Halving(Box::new(CutMechanic::Triangle)).validate().is_err());
    }

    #[test]
    fn short_drag_is_degenerate() {
        let config = EngineConfig::default();
        let mechanic = CutMechanic::Line(LineConstraint::Free);
        let err = mechanic.on_end(&drag(p(10.0, 10.0), p(15.0, 10.0)), &config).unwrap_err();
        assert!(matches!(err, CutError::DegenerateCut { .. }));
    }

    #[test]
    fn square_needs_larger_drag() {
        let config = EngineConfig::default();
        let d = drag(p(100.0, 100.0), p(120.0, 100.0));
        assert!(CutMechanic::Circle.on_end(&d, &config).is_ok());
        assert!(CutMechanic::RotatedSquare.on_end(&d, &config).is_err());
    }

    #[test]
    fn preview_waits_for_threshold() {
        let config = EngineConfig::default();
        let mechanic = CutMechanic::Circle;
        let mut d = mechanic.on_start(p(50.0, 50.0));
        assert!(mechanic.on_move(&mut d, p(52.0, 50.0), &config).is_none());
        let preview = mechanic.on_move(&mut d, p(60.0, 50.0), &config).unwrap();
        assert_abs_diff_eq!(preview.extent(), 10.0);
        assert_eq!(d.current, p(60.0, 50.0));
    }

    #[test]
    fn final_line_spans_canvas() {
        let config = EngineConfig::default();
        let mechanic = CutMechanic::Line(LineConstraint::Free);
        let line = mechanic.on_end(&drag(p(100.0, 50.0), p(100.0, 150.0)), &config).unwrap();
        let (s, e) = line.line_endpoints().unwrap();
        assert_abs_diff_eq!(s.y, 0.0);
        assert_abs_diff_eq!(e.y, 380.0);
    }

    #[test]
    fn cross_drag_on_locked_line_uses_start() {
        let config = EngineConfig::default();
        let mechanic = CutMechanic::Line(LineConstraint::Horizontal);
        let line = mechanic.on_end(&drag(p(100.0, 70.0), p(100.0, 120.0)), &config).unwrap();
        let (s, e) = line.line_endpoints().unwrap();
        assert_abs_diff_eq!(s.x, 0.0);
        assert_abs_diff_eq!(e.x, 380.0);
        assert_abs_diff_eq!(s.y, 70.0);
        assert_abs_diff_eq!(e.y, 70.0);
    }

    #[test]
    fn halving_builds_inner_primitive() {
        let config = EngineConfig::default();
        let mechanic = CutMechanic::halving(CutMechanic::Line(LineConstraint::Vertical)).unwrap();
        assert_eq!(mechanic.max_cuts(&config), 3);
        assert_eq!(CutMechanic::Triangle.max_cuts(&config), 1);
        let line = mechanic.on_end(&drag(p(40.0, 10.0), p(60.0, 90.0)), &config).unwrap();
        let (s, e) = line.line_endpoints().unwrap();
        assert_abs_diff_eq!(s.x, 40.0);
        assert_abs_diff_eq!(e.x, 40.0);
    }
}
