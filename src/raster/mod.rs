mod rasterize;

pub use rasterize::Rasterize;

use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};

/// Largest canvas side, in pixels, the engine will allocate a buffer for.
pub const MAX_CANVAS_SIDE: u32 = 4096;

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Creates a colour from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Returns `true` if the first three bytes of `rgba` are within
    /// `tolerance` of this colour on every channel.
    #[must_use]
    #[inline]
    pub fn matches(&self, rgba: &[u8], tolerance: u8) -> bool {
        self.0
            .iter()
            .zip(rgba)
            .all(|(want, got)| want.abs_diff(*got) <= tolerance)
    }
}

/// Row-major RGBA8 pixel buffer, the same layout a canvas `getImageData`
/// returns.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a buffer filled with `background`.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::EmptyCanvas` if either dimension is zero, or
    /// `RasterError::CanvasTooLarge` if either exceeds [`MAX_CANVAS_SIDE`].
    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyCanvas.into());
        }
        if width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
            return Err(RasterError::CanvasTooLarge {
                width,
                height,
                max: MAX_CANVAS_SIDE,
            }
            .into());
        }
        let mut buffer = Self {
            width,
            height,
            data: vec![0; byte_len(width, height)?],
        };
        buffer.fill(background);
        Ok(buffer)
    }

    /// Wraps RGBA bytes read back from a host surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas is empty, its byte count overflows
    /// `usize`, or the byte count does not match `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyCanvas.into());
        }
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// Colour of the pixel at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        let i = self.offset(x, y)?;
        Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Paints every pixel with `color`.
    pub fn fill(&mut self, color: Rgb) {
        for px in self.data.chunks_exact_mut(4) {
            px[..3].copy_from_slice(&color.0);
            px[3] = u8::MAX;
        }
    }

    /// Paints pixels `x_start..x_end` of row `y`. Out-of-range parts are
    /// ignored.
    pub fn fill_span(&mut self, y: u32, x_start: u32, x_end: u32, color: Rgb) {
        if y >= self.height {
            return;
        }
        let x_end = x_end.min(self.width);
        if x_start >= x_end {
            return;
        }
        let row = y as usize * self.width as usize;
        let from = (row + x_start as usize) * 4;
        let to = (row + x_end as usize) * 4;
        for px in self.data[from..to].chunks_exact_mut(4) {
            px[..3].copy_from_slice(&color.0);
            px[3] = u8::MAX;
        }
    }

    /// Number of pixels matching `color` within `tolerance`.
    #[must_use]
    pub fn count_matching(&self, color: Rgb, tolerance: u8) -> u64 {
        let count = self
            .data
            .chunks_exact(4)
            .filter(|px| color.matches(px, tolerance))
            .count();
        count as u64
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| RasterError::CanvasTooLarge {
            width,
            height,
            max: MAX_CANVAS_SIDE,
        }
        .into())
}
