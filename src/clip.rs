use crate::cut::{CutPrimitive, Side};
use crate::error::{ClipError, Result, SessionError};
use crate::math::intersect_2d::{half_plane_value, line_intersection};
use crate::math::polygon_2d::{
    close_ring, distinct_vertex_count, open_ring, polygon_area, CLOSURE_TOLERANCE,
};
use crate::math::{Point2, TOLERANCE};
use crate::shape::{Shape, ShapeStore, ShapeTag};

/// Default minimum shoelace area for a clipped shape to survive.
pub const DEFAULT_MIN_CLIP_AREA: f64 = 1.0;

/// Clips `ring` against the infinite line through `start` and `end`,
/// keeping the part on `keep` (Sutherland-Hodgman).
///
/// Points on the line count as kept for either side. Parallel edges
/// contribute no intersection. The result is closed, or empty when nothing
/// survives.
#[must_use]
pub fn clip_ring_to_side(ring: &[Point2], start: &Point2, end: &Point2, keep: Side) -> Vec<Point2> {
    let open = open_ring(ring);
    let n = open.len();
    if n < 3 {
        return Vec::new();
    }
    let is_kept = |p: &Point2| {
        let value = half_plane_value(p, start, end);
        match keep {
            Side::A => value >= -TOLERANCE,
            Side::B => value <= TOLERANCE,
        }
    };

    let mut output = Vec::with_capacity(n + 2);
    let mut prev = open[n - 1];
    let mut prev_kept = is_kept(&prev);
    for &curr in open {
        let curr_kept = is_kept(&curr);
        if curr_kept {
            if !prev_kept {
                if let Some(hit) = line_intersection(&prev, &curr, start, end) {
                    push_vertex(&mut output, hit);
                }
            }
            push_vertex(&mut output, curr);
        } else if prev_kept {
            if let Some(hit) = line_intersection(&prev, &curr, start, end) {
                push_vertex(&mut output, hit);
            }
        }
        prev = curr;
        prev_kept = curr_kept;
    }

    if !output.is_empty() {
        close_ring(&mut output);
    }
    output
}

// An intersection landing on a vertex that sits on the line would repeat it.
fn push_vertex(output: &mut Vec<Point2>, point: Point2) {
    let repeats = output.last().is_some_and(|last| {
        (last.x - point.x).abs() <= CLOSURE_TOLERANCE
            && (last.y - point.y).abs() <= CLOSURE_TOLERANCE
    });
    if !repeats {
        output.push(point);
    }
}

/// Clips one shape's outer ring and holes to one side of a line.
#[derive(Debug, Clone, Copy)]
pub struct ClipShape {
    start: Point2,
    end: Point2,
    keep: Side,
    min_area: f64,
}

impl ClipShape {
    /// Creates a new `ClipShape` operation.
    #[must_use]
    pub fn new(start: Point2, end: Point2, keep: Side) -> Self {
        Self {
            start,
            end,
            keep,
            min_area: DEFAULT_MIN_CLIP_AREA,
        }
    }

    /// Sets the area below which a clipped shape is eliminated.
    #[must_use]
    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }

    /// Executes the operation. Reference markers pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns a `ClipError` when the shape is eliminated: the clipped outer
    /// ring has fewer than 3 distinct points or its area is below the
    /// minimum.
    pub fn execute(&self, shape: &Shape) -> std::result::Result<Shape, ClipError> {
        if shape.tag == ShapeTag::Reference {
            return Ok(shape.clone());
        }
        let outer = clip_ring_to_side(&shape.outer_ring, &self.start, &self.end, self.keep);
        let count = distinct_vertex_count(&outer);
        if count < 3 {
            return Err(ClipError::TooFewPoints { count });
        }
        let area = polygon_area(&outer);
        if area < self.min_area {
            return Err(ClipError::AreaBelowMinimum {
                area,
                min: self.min_area,
            });
        }
        let holes = shape
            .holes
            .iter()
            .map(|h| clip_ring_to_side(h, &self.start, &self.end, self.keep))
            .filter(|h| distinct_vertex_count(h) >= 3 && polygon_area(h) >= self.min_area)
            .collect();
        Ok(Shape {
            outer_ring: outer,
            holes,
            tag: shape.tag,
            role: shape.role.clone(),
        })
    }
}

/// Keeps one side of a line cut across a whole store.
///
/// Shapes that the cut eliminates are dropped; survivors keep their ids.
#[derive(Debug, Clone, Copy)]
pub struct HalveShapes {
    clip: ClipShape,
}

impl HalveShapes {
    /// Creates a new `HalveShapes` operation for the line through `start`
    /// and `end`.
    #[must_use]
    pub fn new(start: Point2, end: Point2, keep: Side) -> Self {
        Self {
            clip: ClipShape::new(start, end, keep),
        }
    }

    /// Creates the operation from a cut primitive.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::HalvingRequiresLine` unless `primitive` is a
    /// line.
    pub fn from_primitive(primitive: &CutPrimitive, keep: Side) -> Result<Self> {
        let (start, end) = primitive
            .line_endpoints()
            .ok_or(SessionError::HalvingRequiresLine)?;
        Ok(Self::new(start, end, keep))
    }

    /// Sets the area below which a clipped shape is eliminated.
    #[must_use]
    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.clip = self.clip.with_min_area(min_area);
        self
    }

    /// Executes the operation, returning the reduced store.
    #[must_use]
    pub fn execute(&self, store: &ShapeStore) -> ShapeStore {
        let mut kept = store.clone();
        kept.retain(|id, shape| match self.clip.execute(shape) {
            Ok(clipped) => {
                *shape = clipped;
                true
            }
            Err(reason) => {
                tracing::debug!(?id, %reason, "shape eliminated by cut");
                false
            }
        });
        kept
    }
}
