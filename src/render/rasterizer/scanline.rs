//! Scanline-based triangle rasterization.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by descending Y so that `a` is the lowest on screen
//!    and `c` the highest.
//! 2. **Split** the triangle at the middle vertex `b` into a lower and an
//!    upper half.
//! 3. For every row of each half, interpolate X along the long edge (c -> a)
//!    and along the half's short edge, then fill the span between them.
//!
//! ```text
//!        c
//!        /\
//!       /  \      <- upper half: edges c->a and c->b
//!      /----b     <- split at b.y
//!     /   /       <- lower half: edges c->a and b->a
//!    / /
//!   a
//! ```
//!
//! All arithmetic is integer. Spans are half-open: `[min(x1, x2), max(x1, x2))`.
//! This fill has no depth test and paints the triangle's flat color.

use std::ops::Range;

use super::{Rasterizer, Triangle};
use crate::color::Color;
use crate::render::framebuffer::FrameBuffer;

/// Scanline-based triangle rasterizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineRasterizer;

impl ScanlineRasterizer {
    /// Creates a new scanline rasterizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Sorts three (x, y) pairs so that `a.1 >= b.1 >= c.1`.
    fn sort_vertices(a: &mut (i64, i64), b: &mut (i64, i64), c: &mut (i64, i64)) {
        if a.1 < b.1 {
            std::mem::swap(a, b);
        }
        if a.1 < c.1 {
            std::mem::swap(a, c);
        }
        if b.1 < c.1 {
            std::mem::swap(b, c);
        }
    }

    /// Fills rows `ys` between the edge `from -> to` and the edge `c -> a`.
    fn fill_half(
        ys: Range<i64>,
        a: (i64, i64),
        c: (i64, i64),
        from: (i64, i64),
        to: (i64, i64),
        buffer: &mut FrameBuffer,
        color: Color,
    ) {
        let total_height = a.1 - c.1;
        let half_height = to.1 - from.1;
        let width = buffer.width() as i64;
        let height = buffer.height() as i64;

        for y in ys.start.max(0)..ys.end.min(height) {
            let x1 = c.0 + (a.0 - c.0) * (y - c.1) / total_height;
            let x2 = from.0 + (to.0 - from.0) * (y - from.1) / half_height;
            for x in x1.min(x2).max(0)..x1.max(x2).min(width) {
                buffer.set_pixel(x as i32, y as i32, color);
            }
        }
    }
}

impl Rasterizer for ScanlineRasterizer {
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer) {
        let [mut a, mut b, mut c] = triangle
            .points
            .map(|p| (p.x() as i64, p.y() as i64));
        Self::sort_vertices(&mut a, &mut b, &mut c);

        if c.1 != b.1 {
            Self::fill_half(c.1..b.1, a, c, c, b, buffer, triangle.color);
        }
        if a.1 != b.1 {
            Self::fill_half(b.1..a.1, a, c, b, a, buffer, triangle.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{PixelFormat, RED};
    use crate::math::Vector;
    use crate::render::pixel_buffer::PixelBuffer;

    fn fill(points: [(i32, i32); 3]) -> PixelBuffer {
        let mut color = PixelBuffer::new(12, 12, PixelFormat::Rgba32);
        let mut depth = PixelBuffer::new(12, 12, PixelFormat::Rgba32);
        let triangle = Triangle::new(points.map(|(x, y)| Vector::new([x, y, 0])), RED);
        let mut fb = FrameBuffer::new(&mut color, &mut depth);
        ScanlineRasterizer::new().fill_triangle(&triangle, &mut fb);
        color
    }

    fn painted(buffer: &PixelBuffer) -> usize {
        (0..12)
            .flat_map(|y| (0..12).map(move |x| (x, y)))
            .filter(|&(x, y)| buffer.get(x, y) == RED)
            .count()
    }

    #[test]
    fn fills_right_triangle_with_half_open_spans() {
        let buffer = fill([(0, 0), (8, 0), (0, 8)]);
        // Row y spans x in [0, 8 - y).
        for y in 0..8 {
            for x in 0..12 {
                let expected = if x < 8 - y { RED } else { Color::TRANSPARENT };
                assert_eq!(buffer.get(x, y), expected, "({x}, {y})");
            }
        }
        assert_eq!(buffer.get(0, 8), Color::TRANSPARENT);
    }

    #[test]
    fn vertex_order_does_not_matter() {
        let a = fill([(1, 1), (10, 4), (3, 10)]);
        let b = fill([(3, 10), (1, 1), (10, 4)]);
        let c = fill([(10, 4), (3, 10), (1, 1)]);
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(painted(&a) > 0);
    }

    #[test]
    fn flat_and_degenerate_triangles_are_safe() {
        assert_eq!(painted(&fill([(0, 5), (6, 5), (11, 5)])), 0);
        assert_eq!(painted(&fill([(4, 4), (4, 4), (4, 4)])), 0);
        assert_eq!(painted(&fill([(0, 0), (1, 1), (2, 2)])), 0);
    }
}
