use crate::config::EngineConfig;
use crate::error::Result;
use crate::math::polygon_2d::{bounds, open_ring};
use crate::shape::{Shape, ShapeStore};

use super::{PixelBuffer, Rgb};

/// Renders the renderable shapes of a store into a fresh pixel buffer.
///
/// Each shape is filled with the flat sentinel colour using an even-odd
/// scanline fill sampled at pixel centres, so holes stay background and
/// there is no anti-aliasing. Reference markers are skipped.
#[derive(Debug, Clone, Copy)]
pub struct Rasterize {
    width: u32,
    height: u32,
    fill: Rgb,
    background: Rgb,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Rasterize {
    /// Creates a new `Rasterize` operation for a `width x height` canvas with
    /// the default sentinel and background colours.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let defaults = EngineConfig::default();
        Self {
            width,
            height,
            fill: defaults.fill_sentinel,
            background: defaults.background,
        }
    }

    /// Canvas size and colours taken from `config`.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.canvas_width, config.canvas_height)
            .with_fill(config.fill_sentinel)
            .with_background(config.background)
    }

    /// Sets the sentinel colour for shape interiors.
    #[must_use]
    pub fn with_fill(mut self, fill: Rgb) -> Self {
        self.fill = fill;
        self
    }

    /// Sets the background colour.
    #[must_use]
    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    /// Executes the operation, returning the rendered buffer.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::EmptyCanvas` if the canvas has no pixels.
    pub fn execute(&self, store: &ShapeStore) -> Result<PixelBuffer> {
        let mut buffer = PixelBuffer::new(self.width, self.height, self.background)?;
        self.execute_into(store, &mut buffer);
        Ok(buffer)
    }

    /// Clears `buffer` to the background and renders into it, reusing its
    /// allocation.
    pub fn execute_into(&self, store: &ShapeStore, buffer: &mut PixelBuffer) {
        buffer.fill(self.background);
        let mut edges = Vec::new();
        let mut crossings = Vec::new();
        let mut drawn = 0_usize;
        for (_, shape) in store.renderable() {
            let Some(rows) = shape_rows(shape, buffer.height()) else {
                continue;
            };
            collect_edges(shape, &mut edges);
            fill_edges(&edges, rows, &mut crossings, buffer, self.fill);
            drawn += 1;
        }
        tracing::trace!(shapes = drawn, "rasterized shapes");
    }
}

fn collect_edges(shape: &Shape, edges: &mut Vec<Edge>) {
    edges.clear();
    for ring in std::iter::once(&shape.outer_ring).chain(&shape.holes) {
        let ring = open_ring(ring);
        let n = ring.len();
        if n < 3 {
            continue;
        }
        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            edges.push(Edge {
                x0: a.x,
                y0: a.y,
                x1: b.x,
                y1: b.y,
            });
        }
    }
}

fn fill_edges(
    edges: &[Edge],
    (first_row, end_row): (u32, u32),
    crossings: &mut Vec<f64>,
    buffer: &mut PixelBuffer,
    fill: Rgb,
) {
    for row in first_row..end_row {
        let yc = f64::from(row) + 0.5;
        crossings.clear();
        for e in edges {
            // Half-open rule: shared vertices count once, horizontal edges never.
            if (e.y0 <= yc) != (e.y1 <= yc) {
                let t = (yc - e.y0) / (e.y1 - e.y0);
                crossings.push(e.x0 + t * (e.x1 - e.x0));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let from = pixel_bound(pair[0], buffer.width());
            let to = pixel_bound(pair[1], buffer.width());
            buffer.fill_span(row, from, to, fill);
        }
    }
}

/// Rows whose pixel centres may fall inside the shape.
fn shape_rows(shape: &Shape, height: u32) -> Option<(u32, u32)> {
    let (min, max) = bounds(&shape.outer_ring)?;
    let from = pixel_bound(min.y, height);
    let to = pixel_bound(max.y, height);
    (from < to).then_some((from, to))
}

/// First pixel index whose centre lies at or past `coord`, clamped to
/// `0..=limit`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_bound(coord: f64, limit: u32) -> u32 {
    (coord - 0.5).ceil().clamp(0.0, f64::from(limit)) as u32
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    const GREY: Rgb = Rgb::new(221, 221, 221);
    const WHITE: Rgb = Rgb::new(255, 255, 255);

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn render(store: &ShapeStore, w: u32, h: u32) -> PixelBuffer {
        Rasterize::new(w, h).execute(store).unwrap()
    }

    #[test]
    fn axis_aligned_square_fills_exactly() {
        let store: ShapeStore = [Shape::rectangle(10.0, 20.0, 100.0, 100.0)].into_iter().collect();
        let buffer = render(&store, 200, 200);
        assert_eq!(buffer.count_matching(GREY, 0), 10_000);
        assert_eq!(buffer.pixel(10, 20), Some(GREY));
        assert_eq!(buffer.pixel(109, 119), Some(GREY));
        assert_eq!(buffer.pixel(110, 20), Some(WHITE));
        assert_eq!(buffer.pixel(9, 50), Some(WHITE));
    }

    #[test]
    fn holes_stay_background() {
        let shape = Shape::polygon(
            vec![p(0.0, 0.0), p(20.0, 0.0), p(20.0, 20.0), p(0.0, 20.0)],
            vec![vec![p(5.0, 5.0), p(15.0, 5.0), p(15.0, 15.0), p(5.0, 15.0)]],
        )
        .unwrap();
        let store: ShapeStore = [shape].into_iter().collect();
        let buffer = render(&store, 20, 20);
        assert_eq!(buffer.count_matching(GREY, 0), 300);
        assert_eq!(buffer.pixel(10, 10), Some(WHITE));
    }

    #[test]
    fn references_are_not_drawn() {
        let store: ShapeStore = [Shape::reference(p(5.0, 5.0), None)].into_iter().collect();
        let buffer = render(&store, 10, 10);
        assert_eq!(buffer.count_matching(GREY, 0), 0);
    }

    #[test]
    fn shapes_outside_canvas_are_clipped() {
        let store: ShapeStore = [Shape::rectangle(-50.0, -50.0, 60.0, 60.0)].into_iter().collect();
        let buffer = render(&store, 20, 20);
        assert_eq!(buffer.count_matching(GREY, 0), 100);
    }

    #[test]
    fn triangle_area_is_close_to_polygon_area() {
        let shape = Shape::polygon(vec![p(10.0, 10.0), p(190.0, 10.0), p(100.0, 170.0)], vec![])
            .unwrap();
        let expected = shape.area();
        let store: ShapeStore = [shape].into_iter().collect();
        let buffer = render(&store, 200, 200);
        #[allow(clippy::cast_precision_loss)]
        let counted = buffer.count_matching(GREY, 0) as f64;
        assert!((counted - expected).abs() / expected < 0.01);
    }

    #[test]
    fn custom_colors_and_reuse() {
        let store: ShapeStore = [Shape::rectangle(0.0, 0.0, 4.0, 4.0)].into_iter().collect();
        let red = Rgb::new(255, 0, 0);
        let op = Rasterize::new(8, 8).with_fill(red).with_background(Rgb::new(0, 0, 0));
        let mut buffer = op.execute(&store).unwrap();
        assert_eq!(buffer.count_matching(red, 0), 16);
        op.execute_into(&ShapeStore::new(), &mut buffer);
        assert_eq!(buffer.count_matching(red, 0), 0);
    }

    #[test]
    fn empty_canvas_is_an_error() {
        assert!(Rasterize::new(0, 10).execute(&ShapeStore::new()).is_err());
    }
}
