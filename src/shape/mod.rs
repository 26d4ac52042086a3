mod load;
mod transform;

pub use load::LoadShapes;
pub use transform::RigidTransform;

use slotmap::SlotMap;

use crate::error::ShapeError;
use crate::math::polygon_2d::{close_ring, distinct_vertex_count, polygon_area};
use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a shape in a [`ShapeStore`].
    pub struct ShapeId;
}

/// Role marker that designates the rotation pivot.
pub const ROTATION_CENTER_ROLE: &str = "rotation-center";

/// Whether an entry is renderable geometry or a positional marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeTag {
    /// A polygon region of the puzzle figure.
    Shape,
    /// A marker with a position only (e.g. a rotation center).
    Reference,
}

/// One connected polygon region, or a reference marker.
///
/// Rings are stored closed (first point repeated at the end). Reference
/// entries keep their single position in `outer_ring` and are skipped by
/// rasterization, clipping and rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Outer boundary.
    pub outer_ring: Vec<Point2>,
    /// Excluded interior regions.
    pub holes: Vec<Vec<Point2>>,
    /// Geometry or marker.
    pub tag: ShapeTag,
    /// Optional role from the source, e.g. [`ROTATION_CENTER_ROLE`].
    pub role: Option<String>,
}

impl Shape {
    /// Creates a polygon shape, closing each ring if needed.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::RingTooShort` if the outer ring has fewer than 3
    /// distinct points. Holes that are too short are dropped.
    pub fn polygon(outer_ring: Vec<Point2>, holes: Vec<Vec<Point2>>) -> Result<Self, ShapeError> {
        let len = distinct_vertex_count(&outer_ring);
        if len < 3 {
            return Err(ShapeError::RingTooShort { len });
        }
        let mut outer_ring = outer_ring;
        close_ring(&mut outer_ring);
        let holes = holes
            .into_iter()
            .filter(|h| distinct_vertex_count(h) >= 3)
            .map(|mut h| {
                close_ring(&mut h);
                h
            })
            .collect();
        Ok(Self {
            outer_ring,
            holes,
            tag: ShapeTag::Shape,
            role: None,
        })
    }

    /// Axis-aligned rectangle from its top-left corner and size.
    #[must_use]
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            outer_ring: vec![
                Point2::new(x, y),
                Point2::new(x + width, y),
                Point2::new(x + width, y + height),
                Point2::new(x, y + height),
                Point2::new(x, y),
            ],
            holes: Vec::new(),
            tag: ShapeTag::Shape,
            role: None,
        }
    }

    /// Creates a reference marker at `position`.
    #[must_use]
    pub fn reference(position: Point2, role: Option<String>) -> Self {
        Self {
            outer_ring: vec![position],
            holes: Vec::new(),
            tag: ShapeTag::Reference,
            role,
        }
    }

    /// Returns `true` for renderable polygon shapes.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        self.tag == ShapeTag::Shape && distinct_vertex_count(&self.outer_ring) >= 3
    }

    /// Position of a reference marker.
    #[must_use]
    pub fn position(&self) -> Option<Point2> {
        match self.tag {
            ShapeTag::Reference => self.outer_ring.first().copied(),
            ShapeTag::Shape => None,
        }
    }

    /// Outer area minus hole areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        if self.tag == ShapeTag::Reference {
            return 0.0;
        }
        let holes: f64 = self.holes.iter().map(|h| polygon_area(h)).sum();
        (polygon_area(&self.outer_ring) - holes).max(0.0)
    }
}

/// Arena owning the shapes of one puzzle.
///
/// Ids stay stable across rigid transforms so a renderer can track shapes
/// frame to frame; clipping may remove entries.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: SlotMap<ShapeId, Shape>,
}

impl ShapeStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a shape and returns its ID.
    pub fn insert(&mut self, shape: Shape) -> ShapeId {
        self.shapes.insert(shape)
    }

    /// Returns a reference to the shape, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn get(&self, id: ShapeId) -> Result<&Shape, ShapeError> {
        self.shapes
            .get(id)
            .ok_or_else(|| ShapeError::EntityNotFound(format!("{id:?}")))
    }

    /// Replaces the shape stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn replace(&mut self, id: ShapeId, shape: Shape) -> Result<(), ShapeError> {
        let slot = self
            .shapes
            .get_mut(id)
            .ok_or_else(|| ShapeError::EntityNotFound(format!("{id:?}")))?;
        *slot = shape;
        Ok(())
    }

    /// Removes a shape, returning it if it existed.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        self.shapes.remove(id)
    }

    /// Iterates over all entries, markers included.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter()
    }

    /// Iterates over renderable polygon shapes only.
    pub fn renderable(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().filter(|(_, s)| s.is_renderable())
    }

    /// Iterates over reference markers only.
    pub fn references(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes
            .iter()
            .filter(|(_, s)| s.tag == ShapeTag::Reference)
    }

    /// Position of the rotation-center marker, if the source provided one.
    #[must_use]
    pub fn rotation_center(&self) -> Option<Point2> {
        self.references()
            .find(|(_, s)| s.role.as_deref() == Some(ROTATION_CENTER_ROLE))
            .and_then(|(_, s)| s.position())
    }

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of renderable shapes.
    #[must_use]
    pub fn renderable_count(&self) -> usize {
        self.renderable().count()
    }

    /// Total polygon area of all renderable shapes.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.renderable().map(|(_, s)| s.area()).sum()
    }

    /// Owned copy of every entry, for renderers.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Shape> {
        self.shapes.values().cloned().collect()
    }

    /// Returns a store with each shape mapped through `f`, keeping ids.
    #[must_use]
    pub fn map_shapes(&self, mut f: impl FnMut(&Shape) -> Shape) -> Self {
        let mut shapes = self.shapes.clone();
        for (id, shape) in &self.shapes {
            if let Some(slot) = shapes.get_mut(id) {
                *slot = f(shape);
            }
        }
        Self { shapes }
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(ShapeId, &mut Shape) -> bool) {
        self.shapes.retain(|id, shape| f(id, shape));
    }
}

impl FromIterator<Shape> for ShapeStore {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        let mut store = Self::new();
        for shape in iter {
            store.insert(shape);
        }
        store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn polygon_closes_rings() {
        let shape = Shape::polygon(
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)],
            vec![vec![p(1.0, 1.0), p(2.0, 1.0), p(2.0, 2.0)]],
        )
        .unwrap();
        assert_eq!(shape.outer_ring.len(), 4);
        assert_eq!(shape.holes[0].len(), 4);
        assert!(shape.is_renderable());
    }

    #[test]
    fn polygon_rejects_short_ring() {
        let result = Shape::polygon(vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0)], vec![]);
        assert!(matches!(result, Err(ShapeError::RingTooShort { len: 2 })));
    }

    #[test]
    fn area_subtracts_holes() {
        let shape = Shape::polygon(
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            vec![vec![p(2.0, 2.0), p(4.0, 2.0), p(4.0, 4.0), p(2.0, 4.0)]],
        )
        .unwrap();
        assert_relative_eq!(shape.area(), 96.0);
    }

    #[test]
    fn references_are_not_renderable() {
        let mut store = ShapeStore::new();
        store.insert(Shape::rectangle(0.0, 0.0, 5.0, 5.0));
        store.insert(Shape::reference(
            p(190.0, 190.0),
            Some(ROTATION_CENTER_ROLE.to_owned()),
        ));
        assert_eq!(store.len(), 2);
        assert_eq!(store.renderable_count(), 1);
        assert_eq!(store.references().count(), 1);
        let center = store.rotation_center().unwrap();
        assert_relative_eq!(center.x, 190.0);
        assert_relative_eq!(store.total_area(), 25.0);
    }

    #[test]
    fn get_replace_remove() {
        let mut store = ShapeStore::new();
        let id = store.insert(Shape::rectangle(0.0, 0.0, 1.0, 1.0));
        store.replace(id, Shape::rectangle(0.0, 0.0, 2.0, 2.0)).unwrap();
        assert_relative_eq!(store.get(id).unwrap().area(), 4.0);
        assert!(store.remove(id).is_some());
        assert!(store.get(id).is_err());
        assert!(store.replace(id, Shape::rectangle(0.0, 0.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn clone_is_deep() {
        let mut store = ShapeStore::new();
        let id = store.insert(Shape::rectangle(0.0, 0.0, 1.0, 1.0));
        let baseline = store.clone();
        store.replace(id, Shape::rectangle(0.0, 0.0, 3.0, 3.0)).unwrap();
        assert_relative_eq!(baseline.get(id).unwrap().area(), 1.0);
    }

    #[test]
    fn map_shapes_keeps_ids() {
        let mut store = ShapeStore::new();
        let id = store.insert(Shape::rectangle(0.0, 0.0, 1.0, 1.0));
        let mapped = store.map_shapes(|_| Shape::rectangle(0.0, 0.0, 2.0, 1.0));
        assert_relative_eq!(mapped.get(id).unwrap().area(), 2.0);
        assert_relative_eq!(store.get(id).unwrap().area(), 1.0);
    }
}
