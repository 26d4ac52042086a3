use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};
use crate::math::Point2;
use crate::raster::{Rgb, MAX_CANVAS_SIDE};

/// Tunable parameters of the cut engine.
///
/// Any field omitted from a JSON override keeps its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logical canvas width in pixels.
    pub canvas_width: u32,
    /// Logical canvas height in pixels.
    pub canvas_height: u32,
    /// Drags shorter than this are taps, never cuts.
    pub min_drag_distance: f64,
    /// Drag length at which a preview primitive starts being reported.
    pub preview_threshold: f64,
    /// Smallest accepted half-extent for rotated-square cuts.
    pub min_square_half_extent: f64,
    /// Each side of a valid cut must hold at least this percentage.
    pub min_split_percentage: f64,
    /// Clipped shapes with a smaller shoelace area are eliminated.
    pub min_clip_area: f64,
    /// Flat colour marking shape interior pixels.
    pub fill_sentinel: Rgb,
    /// Colour of everything that is not shape.
    pub background: Rgb,
    /// Per-channel slack when matching the sentinel in host-provided buffers.
    pub sentinel_tolerance: u8,
    /// Rotation speed of the rotating mechanic, radians per millisecond.
    pub rotation_speed: f64,
    /// Pivot used when the shape source has no rotation-center marker.
    pub rotation_center: [f64; 2],
    /// Number of cuts in a halving round.
    pub max_halving_cuts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_width: 380,
            canvas_height: 380,
            min_drag_distance: 10.0,
            preview_threshold: 5.0,
            min_square_half_extent: 30.0,
            min_split_percentage: 0.1,
            min_clip_area: 1.0,
            fill_sentinel: Rgb::new(221, 221, 221),
            background: Rgb::new(255, 255, 255),
            sentinel_tolerance: 0,
            rotation_speed: TAU / 12_000.0,
            rotation_center: [190.0, 190.0],
            max_halving_cuts: 3,
        }
    }
}

impl EngineConfig {
    /// Parses a (possibly partial) JSON override on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails
    /// [`EngineConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SessionError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different canvas size.
    #[must_use]
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Checks that the configuration describes a usable engine.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidConfig` on an empty or oversized canvas,
    /// negative thresholds, or a zero cut budget.
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(SessionError::InvalidConfig("canvas must be non-empty".into()).into());
        }
        if self.canvas_width > MAX_CANVAS_SIDE || self.canvas_height > MAX_CANVAS_SIDE {
            return Err(SessionError::InvalidConfig(format!(
                "canvas sides must not exceed {MAX_CANVAS_SIDE}px"
            ))
            .into());
        }
        if self.min_drag_distance < 0.0 || self.min_split_percentage < 0.0 {
            return Err(
                SessionError::InvalidConfig("thresholds must be non-negative".into()).into(),
            );
        }
        if self.max_halving_cuts == 0 {
            return Err(
                SessionError::InvalidConfig("max_halving_cuts must be at least 1".into()).into(),
            );
        }
        Ok(())
    }

    /// Fallback rotation pivot as a point.
    #[must_use]
    pub fn rotation_pivot(&self) -> Point2 {
        Point2::new(self.rotation_center[0], self.rotation_center[1])
    }

    /// Canvas size as floating-point `(width, height)`.
    #[must_use]
    pub fn canvas_size(&self) -> (f64, f64) {
        (f64::from(self.canvas_width), f64::from(self.canvas_height))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn defaults_match_game() {
        let config = EngineConfig::default();
        assert_eq!(config.canvas_width, 380);
        assert_relative_eq!(config.min_drag_distance, 10.0);
        assert_relative_eq!(config.min_split_percentage, 0.1);
        assert_eq!(config.fill_sentinel, Rgb::new(221, 221, 221));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "canvas_width": 200, "max_halving_cuts": 2 }"#)
            .unwrap();
        assert_eq!(config.canvas_width, 200);
        assert_eq!(config.canvas_height, 380);
        assert_eq!(config.max_halving_cuts, 2);
        assert_relative_eq!(config.min_clip_area, 1.0);
    }

    #[test]
    fn sentinel_round_trips_as_array() {
        let config = EngineConfig::from_json(r#"{ "fill_sentinel": [10, 20, 30] }"#).unwrap();
        assert_eq!(config.fill_sentinel, Rgb::new(10, 20, 30));
    }

    #[test]
    fn empty_canvas_rejected() {
        assert!(EngineConfig::from_json(r#"{ "canvas_width": 0 }"#).is_err());
    }

    #[test]
    fn oversized_canvas_rejected() {
        let json = r#"{ "canvas_width": 4294967295, "canvas_height": 4294967295 }"#;
        assert!(EngineConfig::from_json(json).is_err());
        assert!(EngineConfig::default().with_canvas(4097, 380).validate().is_err());
        assert!(EngineConfig::default().with_canvas(4096, 4096).validate().is_ok());
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(EngineConfig::from_json("{ canvas_width: ").is_err());
    }

    #[test]
    fn with_canvas_overrides_size() {
        let config = EngineConfig::default().with_canvas(100, 50);
        let (w, h) = config.canvas_size();
        assert_relative_eq!(w, 100.0);
        assert_relative_eq!(h, 50.0);
    }
}
