use thiserror::Error;

/// Top-level error type for the cut-geometry engine.
#[derive(Debug, Error)]
pub enum ShapecutError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Cut(#[from] CutError),

    #[error(transparent)]
    Clip(#[from] ClipError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors related to the shape model and its sources.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("shape not found: {0}")]
    EntityNotFound(String),

    #[error("invalid shape source: {0}")]
    InvalidSource(String),

    #[error("malformed shape json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ring has {len} points, at least 3 are required")]
    RingTooShort { len: usize },
}

/// Reasons a cut attempt is refused without consuming an attempt.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CutError {
    #[error("cut too short: dragged {distance:.1}px, minimum is {min:.1}px")]
    DegenerateCut { distance: f64, min: f64 },

    #[error("cut does not split the shape: {side_a:.2}% / {side_b:.2}% (floor {floor}%)")]
    InvalidSplit { side_a: f64, side_b: f64, floor: f64 },

    #[error("all {max_cuts} cuts have been made")]
    SessionComplete { max_cuts: u32 },

    #[error("no cut is being drawn")]
    NotDrawing,
}

/// Outcomes of clipping that eliminate a shape.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClipError {
    #[error("clipped ring has {count} distinct points")]
    TooFewPoints { count: usize },

    #[error("clipped area {area:.3} is below the minimum {min}")]
    AreaBelowMinimum { area: f64, min: f64 },
}

/// Errors related to pixel buffers.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("canvas has zero width or height")]
    EmptyCanvas,

    #[error("canvas {width}x{height} exceeds the {max}px limit")]
    CanvasTooLarge { width: u32, height: u32, max: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Errors related to session orchestration.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("rotation animation is not running")]
    RotationNotRunning,

    #[error("halving requires a line-based mechanic")]
    HalvingRequiresLine,

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for results using [`ShapecutError`].
pub type Result<T> = std::result::Result<T, ShapecutError>;
