//! Bounding-box triangle rasterization with barycentric weights.
//!
//! # Algorithm Overview
//!
//! 1. Compute the signed area of the whole triangle and give up early if it
//!    is (nearly) zero.
//! 2. Walk every pixel of the integer bounding box of the three vertices.
//! 3. For each pixel P, the sub-triangle areas (P,B,C), (P,C,A) and (P,A,B)
//!    divided by the total area give the barycentric weights (alpha, beta,
//!    gamma). P is inside iff all three are non-negative, whichever way the
//!    triangle winds: dividing by the signed total cancels the winding sign.
//! 4. Interpolate the vertex depths with those weights, round to a byte,
//!    and keep the pixel only if it beats the depth already stored there.
//!
//! The winning pixel is painted a gray level equal to its depth.
//!
//! # Parallelism
//!
//! Pixels of one triangle are independent, so rows of the bounding box can
//! be filled in parallel with rayon. Triangles are still rasterized one at
//! a time, which keeps the depth test deterministic.

use std::ops::Range;

use rayon::prelude::*;

use super::{signed_area, Point2, Rasterizer, Triangle};
use crate::color::Color;
use crate::math::Vector;
use crate::render::framebuffer::FrameBuffer;

/// Areas below this are treated as degenerate and skipped.
const DEGENERATE_AREA: f64 = 1e-6;

/// Areas below this are dropped when back-face culling is enabled.
const MIN_FRONT_AREA: f64 = 1.0;

/// Depth-tested triangle rasterizer using barycentric coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarycentricRasterizer {
    depth_test: bool,
    parallel: bool,
    backface_culling: bool,
}

/// Per-triangle values shared by every pixel of the bounding box.
struct Setup {
    a: Point2,
    b: Point2,
    c: Point2,
    depths: [f64; 3],
    area: f64,
    xs: Range<i32>,
    ys: Range<i32>,
}

impl Setup {
    /// Returns `None` for triangles that cannot cover any pixel.
    fn new(triangle: &Triangle, width: u32, height: u32, backface_culling: bool) -> Option<Self> {
        let area = triangle.signed_area();
        if area.abs() < DEGENERATE_AREA || area.is_nan() {
            return None;
        }
        if backface_culling && area < MIN_FRONT_AREA {
            return None;
        }

        let [a, b, c] = triangle.points;
        let min_x = a.x().min(b.x()).min(c.x()).max(0);
        let max_x = a.x().max(b.x()).max(c.x()).min(width as i32);
        let min_y = a.y().min(b.y()).min(c.y()).max(0);
        let max_y = a.y().max(b.y()).max(c.y()).min(height as i32);
        if min_x >= max_x || min_y >= max_y {
            return None;
        }

        Some(Self {
            a: a.xy(),
            b: b.xy(),
            c: c.xy(),
            depths: [a.z() as f64, b.z() as f64, c.z() as f64],
            area,
            xs: min_x..max_x,
            ys: min_y..max_y,
        })
    }

    /// Interpolated depth at (x, y), or `None` when the pixel is outside.
    #[inline]
    fn depth_at(&self, x: i32, y: i32) -> Option<u8> {
        let p = Vector::new([x, y]);
        let alpha = signed_area(p, self.b, self.c) / self.area;
        let beta = signed_area(p, self.c, self.a) / self.area;
        let gamma = signed_area(p, self.a, self.b) / self.area;
        if alpha < 0.0 || beta < 0.0 || gamma < 0.0 {
            return None;
        }
        let [za, zb, zc] = self.depths;
        // Rounded, not truncated: 2/3 of level 100 stores 67, and a flat
        // triangle keeps its level despite accumulated error.
        Some((alpha * za + beta * zb + gamma * zc).round() as u8)
    }
}

impl BarycentricRasterizer {
    pub fn new() -> Self {
        Self {
            depth_test: true,
            parallel: false,
            backface_culling: false,
        }
    }

    /// Disable to overwrite pixels regardless of stored depth.
    pub fn with_depth_test(mut self, enabled: bool) -> Self {
        self.depth_test = enabled;
        self
    }

    /// Fill bounding-box rows on the rayon thread pool.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Skip triangles with a signed area below one pixel, which also drops
    /// every triangle wound the other way.
    pub fn with_backface_culling(mut self, enabled: bool) -> Self {
        self.backface_culling = enabled;
        self
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    fn fill_sequential(&self, setup: &Setup, buffer: &mut FrameBuffer) {
        for x in setup.xs.clone() {
            for y in setup.ys.clone() {
                let Some(z) = setup.depth_at(x, y) else {
                    continue;
                };
                if self.depth_test {
                    buffer.set_pixel_with_depth(x, y, z, Color::gray(z));
                } else {
                    buffer.set_pixel(x, y, Color::gray(z));
                }
            }
        }
    }

    fn fill_parallel(&self, setup: &Setup, buffer: &mut FrameBuffer) {
        let rows = setup.ys.start as usize..setup.ys.end as usize;
        let (color, depth) = buffer.buffers_mut();
        color
            .par_rows_mut(rows.clone())
            .zip(depth.par_rows_mut(rows))
            .for_each(|(mut color_row, mut depth_row)| {
                let y = color_row.y() as i32;
                for x in setup.xs.clone() {
                    let Some(z) = setup.depth_at(x, y) else {
                        continue;
                    };
                    let column = x as usize;
                    if self.depth_test {
                        if z <= depth_row.get(column).r {
                            continue;
                        }
                        depth_row.set(column, Color::gray(z));
                    }
                    color_row.set(column, Color::gray(z));
                }
            });
    }
}

impl Default for BarycentricRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for BarycentricRasterizer {
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer) {
        let Some(setup) = Setup::new(
            triangle,
            buffer.width(),
            buffer.height(),
            self.backface_culling,
        ) else {
            return;
        };

        if self.parallel {
            self.fill_parallel(&setup, buffer);
        } else {
            self.fill_sequential(&setup, buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PixelFormat;
    use crate::render::pixel_buffer::PixelBuffer;
    use crate::render::rasterizer::ScreenPoint;

    const W: u32 = 16;
    const H: u32 = 16;

    fn pt(x: i32, y: i32, z: i32) -> ScreenPoint {
        Vector::new([x, y, z])
    }

    fn tri(a: ScreenPoint, b: ScreenPoint, c: ScreenPoint) -> Triangle {
        Triangle::new([a, b, c], Color::TRANSPARENT)
    }

    fn buffers() -> (PixelBuffer, PixelBuffer) {
        (
            PixelBuffer::new(W, H, PixelFormat::Rgba32),
            PixelBuffer::new(W, H, PixelFormat::Rgba32),
        )
    }

    fn draw(rasterizer: &BarycentricRasterizer, triangles: &[Triangle]) -> (PixelBuffer, PixelBuffer) {
        let (mut color, mut depth) = buffers();
        for triangle in triangles {
            let mut fb = FrameBuffer::new(&mut color, &mut depth);
            rasterizer.fill_triangle(triangle, &mut fb);
        }
        (color, depth)
    }

    /// Pixels whose integer coordinates lie strictly inside x > 0, y > 0, x + y < 4.
    fn strictly_inside_right_triangle(x: i32, y: i32) -> bool {
        x > 0 && y > 0 && x + y < 4
    }

    #[test]
    fn zero_depth_triangle_never_beats_cleared_depth() {
        let t = tri(pt(0, 0, 0), pt(4, 0, 0), pt(0, 4, 0));
        let (mut color, mut depth) = buffers();
        color.clear(77);
        {
            let mut fb = FrameBuffer::new(&mut color, &mut depth);
            BarycentricRasterizer::new().fill_triangle(&t, &mut fb);
        }
        for y in 0..H as i32 {
            for x in 0..W as i32 {
                let pixel = color.get(x, y);
                if strictly_inside_right_triangle(x, y) {
                    // Depth 0 never beats a cleared depth buffer, so the clear value stays.
                    assert_eq!(pixel, Color::splat(77));
                } else if x > 4 || y > 4 || x + y > 4 {
                    assert_eq!(pixel, Color::splat(77), "({x}, {y}) was touched");
                }
            }
        }
    }

    #[test]
    fn zero_depth_triangle_without_depth_test_paints_black() {
        let t = tri(pt(0, 0, 0), pt(4, 0, 0), pt(0, 4, 0));
        let (color, _) = draw(&BarycentricRasterizer::new().with_depth_test(false), &[t]);
        for y in 0..H as i32 {
            for x in 0..W as i32 {
                let pixel = color.get(x, y);
                if strictly_inside_right_triangle(x, y) {
                    assert_eq!((pixel.r, pixel.g, pixel.b), (0, 0, 0));
                    assert_eq!(pixel.a, 255);
                } else if x > 4 || y > 4 || x + y > 4 {
                    assert_eq!(pixel, Color::TRANSPARENT);
                }
            }
        }
    }

    #[test]
    fn covers_pixels_regardless_of_winding() {
        let cw = tri(pt(1, 1, 100), pt(12, 2, 100), pt(3, 13, 100));
        let ccw = tri(pt(1, 1, 100), pt(3, 13, 100), pt(12, 2, 100));
        assert!(cw.signed_area() * ccw.signed_area() < 0.0);

        let (a, _) = draw(&BarycentricRasterizer::new(), &[cw]);
        let (b, _) = draw(&BarycentricRasterizer::new(), &[ccw]);
        assert_eq!(a, b);
        assert_eq!(a.get(4, 4), Color::gray(100));
    }

    #[test]
    fn depth_is_interpolated() {
        let t = tri(pt(0, 0, 0), pt(10, 0, 200), pt(0, 10, 0));
        let (_, depth) = draw(&BarycentricRasterizer::new(), &[t]);
        // Halfway along the x axis the weight of B is one half.
        assert_eq!(depth.get(5, 0).r, 100);
    }

    #[test]
    fn depth_rounds_to_nearest_level() {
        let t = tri(pt(0, 0, 0), pt(3, 0, 100), pt(0, 3, 0));
        let (_, depth) = draw(&BarycentricRasterizer::new(), &[t]);
        assert_eq!(depth.get(1, 0).r, 33);
        assert_eq!(depth.get(2, 0).r, 67);
    }

    #[test]
    fn higher_depth_wins_in_either_order() {
        let far = tri(pt(0, 0, 10), pt(12, 0, 10), pt(0, 12, 10));
        let near = tri(pt(2, 2, 200), pt(14, 2, 200), pt(2, 14, 200));
        let rasterizer = BarycentricRasterizer::new();

        let (color_a, depth_a) = draw(&rasterizer, &[far, near]);
        let (color_b, depth_b) = draw(&rasterizer, &[near, far]);

        assert_eq!(depth_a.get(4, 4).r, 200);
        assert_eq!(depth_b.get(4, 4).r, 200);
        assert_eq!(color_a.get(4, 4), Color::gray(200));
        assert_eq!(color_b.get(4, 4), Color::gray(200));
        // Pixels only the far triangle covers keep its depth.
        assert_eq!(depth_a.get(1, 1).r, 10);
        assert_eq!(depth_b.get(1, 1).r, 10);
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let t = tri(pt(0, 0, 50), pt(1, 1, 50), pt(2, 2, 50));
        for rasterizer in [
            BarycentricRasterizer::new(),
            BarycentricRasterizer::new().with_depth_test(false),
            BarycentricRasterizer::new().with_parallel(true),
        ] {
            let (color, depth) = draw(&rasterizer, &[t]);
            let (empty_color, empty_depth) = buffers();
            assert_eq!(color, empty_color);
            assert_eq!(depth, empty_depth);
        }
    }

    #[test]
    fn off_screen_vertices_are_clamped() {
        let t = tri(pt(-50, -50, 90), pt(100, -50, 90), pt(-50, 100, 90));
        let (color, _) = draw(&BarycentricRasterizer::new(), &[t]);
        for y in 0..H as i32 {
            for x in 0..W as i32 {
                assert_eq!(color.get(x, y), Color::gray(90));
            }
        }
    }

    #[test]
    fn backface_culling_drops_reversed_winding() {
        let front = tri(pt(0, 0, 80), pt(8, 0, 80), pt(0, 8, 80));
        let back = tri(pt(0, 0, 80), pt(0, 8, 80), pt(8, 0, 80));
        let rasterizer = BarycentricRasterizer::new().with_backface_culling(true);
        let (kept, _) = draw(&rasterizer, &[front]);
        let (culled, _) = draw(&rasterizer, &[back]);
        assert_eq!(kept.get(2, 2), Color::gray(80));
        assert_eq!(culled.get(2, 2), Color::TRANSPARENT);
    }

    #[test]
    fn parallel_fill_matches_sequential() {
        let triangles = [
            tri(pt(0, 0, 30), pt(15, 3, 120), pt(4, 15, 60)),
            tri(pt(15, 15, 250), pt(0, 9, 5), pt(9, 0, 140)),
            tri(pt(-3, 7, 200), pt(20, 8, 200), pt(7, 20, 10)),
        ];
        let sequential = draw(&BarycentricRasterizer::new(), &triangles);
        let parallel = draw(&BarycentricRasterizer::new().with_parallel(true), &triangles);
        assert_eq!(sequential, parallel);
    }
}
