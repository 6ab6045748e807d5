//! Line drawing.

use super::pixel_buffer::PixelBuffer;
use super::rasterizer::Point2;
use crate::color::Color;

/// Draws the segment `a -> b`, both endpoints included.
///
/// The major axis is stepped one pixel at a time while the minor axis
/// accumulates the slope. Steep lines are drawn with x and y swapped so the
/// major axis is always iterated as "x". Steps outside the buffer along the
/// major axis are skipped, so any `i32` endpoints are accepted.
pub fn draw_line(buffer: &mut PixelBuffer, a: Point2, b: Point2, color: Color) {
    let (mut ax, mut ay, mut bx, mut by) = (a.x(), a.y(), b.x(), b.y());

    let steep = ax.abs_diff(bx) < ay.abs_diff(by);
    if steep {
        std::mem::swap(&mut ax, &mut ay);
        std::mem::swap(&mut bx, &mut by);
    }
    if ax > bx {
        std::mem::swap(&mut ax, &mut bx);
        std::mem::swap(&mut ay, &mut by);
    }

    let slope = if bx == ax {
        0.0
    } else {
        (by as f32 - ay as f32) / (bx as f32 - ax as f32)
    };

    let major = if steep { buffer.height() } else { buffer.width() };
    let first = ax.max(0);
    let last = bx.min(major as i32 - 1);

    let mut y = if first == ax {
        ay as f32
    } else {
        ay as f32 + slope * (first as f32 - ax as f32)
    };
    for x in first..=last {
        if steep {
            buffer.set(y as i32, x, color);
        } else {
            buffer.set(x, y as i32, color);
        }
        y += slope;
    }
}

/// Draws the outline of a triangle.
pub fn draw_triangle_wireframe(buffer: &mut PixelBuffer, points: [Point2; 3], color: Color) {
    let [a, b, c] = points;
    draw_line(buffer, a, b, color);
    draw_line(buffer, b, c, color);
    draw_line(buffer, c, a, color);
}
