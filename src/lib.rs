pub mod area;
pub mod clip;
pub mod config;
pub mod cut;
pub mod error;
pub mod math;
pub mod raster;
pub mod scoring;
pub mod session;
pub mod shape;

pub use error::{Result, ShapecutError};
