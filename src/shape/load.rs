use serde::Deserialize;

use crate::error::{Result, ShapeError};
use crate::math::Point2;

use super::{Shape, ShapeStore};

/// GeoJSON `FeatureCollection` as delivered by the shape source.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Option<Vec<Feature>>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(rename = "type")]
    kind: Option<String>,
    corner: Option<String>,
    role: Option<String>,
}

impl Properties {
    fn is_reference(&self) -> bool {
        self.kind.as_deref() == Some("reference")
    }

    fn role(&self) -> Option<String> {
        self.role.clone().or_else(|| self.corner.clone())
    }
}

/// GeoJSON positions may carry extra ordinates; only x and y are used.
type Position = Vec<f64>;
type Ring = Vec<Position>;

/// Parses a GeoJSON shape description into a [`ShapeStore`].
///
/// `Polygon` and `MultiPolygon` features become shapes (first ring outer, the
/// rest holes). `Point` features and features tagged `"type": "reference"`
/// become reference markers. Other geometry types are ignored.
pub struct LoadShapes<'a> {
    source: &'a str,
    flip_height: Option<f64>,
}

impl<'a> LoadShapes<'a> {
    /// Creates a new `LoadShapes` operation over a JSON document.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            flip_height: None,
        }
    }

    /// Converts y-up source coordinates into y-down canvas space
    /// (`y' = height - y`).
    #[must_use]
    pub fn with_flip_y(mut self, height: f64) -> Self {
        self.flip_height = Some(height);
        self
    }

    /// Executes the load.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON, has no `features`
    /// array, or contains malformed coordinates.
    pub fn execute(&self) -> Result<ShapeStore> {
        let collection: FeatureCollection =
            serde_json::from_str(self.source).map_err(ShapeError::from)?;
        let features = collection
            .features
            .ok_or_else(|| ShapeError::InvalidSource("missing features".into()))?;

        let mut store = ShapeStore::new();
        for (index, feature) in features.into_iter().enumerate() {
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let properties = feature.properties.unwrap_or_default();
            self.load_feature(&mut store, index, geometry, &properties)?;
        }

        tracing::debug!(
            shapes = store.renderable_count(),
            references = store.references().count(),
            "loaded shape source"
        );
        Ok(store)
    }

    fn load_feature(
        &self,
        store: &mut ShapeStore,
        index: usize,
        geometry: Geometry,
        properties: &Properties,
    ) -> Result<()> {
        match geometry.kind.as_str() {
            "Point" => {
                let position: Position = from_value(geometry.coordinates)?;
                let point = self.point(&position, index)?;
                store.insert(Shape::reference(point, properties.role()));
            }
            "Polygon" => {
                let rings: Vec<Ring> = from_value(geometry.coordinates)?;
                self.insert_polygon(store, index, &rings, properties)?;
            }
            "MultiPolygon" => {
                let polygons: Vec<Vec<Ring>> = from_value(geometry.coordinates)?;
                for rings in &polygons {
                    self.insert_polygon(store, index, rings, properties)?;
                }
            }
            other => {
                tracing::warn!(feature = index, kind = other, "ignoring unsupported geometry");
            }
        }
        Ok(())
    }

    fn insert_polygon(
        &self,
        store: &mut ShapeStore,
        index: usize,
        rings: &[Ring],
        properties: &Properties,
    ) -> Result<()> {
        let Some((outer, holes)) = rings.split_first() else {
            return Ok(());
        };
        let outer = self.ring(outer, index)?;

        if properties.is_reference() {
            // A reference polygon only contributes its first position.
            if let Some(first) = outer.first() {
                store.insert(Shape::reference(*first, properties.role()));
            }
            return Ok(());
        }

        let holes = holes
            .iter()
            .map(|h| self.ring(h, index))
            .collect::<Result<Vec<_>>>()?;
        match Shape::polygon(outer, holes) {
            Ok(mut shape) => {
                shape.role = properties.role();
                store.insert(shape);
            }
            Err(err) => {
                tracing::warn!(feature = index, %err, "skipping degenerate polygon");
            }
        }
        Ok(())
    }

    fn ring(&self, ring: &[Position], index: usize) -> Result<Vec<Point2>> {
        ring.iter().map(|pos| self.point(pos, index)).collect()
    }

    fn point(&self, position: &[f64], index: usize) -> Result<Point2> {
        let (x, y) = match position {
            [x, y, ..] => (*x, *y),
            _ => {
                return Err(ShapeError::InvalidSource(format!(
                    "feature {index}: position needs two ordinates"
                ))
                .into())
            }
        };
        let y = match self.flip_height {
            Some(height) => height - y,
            None => y,
        };
        Ok(Point2::new(x, y))
    }
}

fn from_value<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ShapeError::from(e).into())
}
