//! Frame buffer abstraction pairing color and depth storage.
//!
//! The depth buffer is a second [`PixelBuffer`] of the same shape whose
//! first channel holds the quantized depth of the nearest surface drawn so
//! far. Depth values grow toward the viewer, so a cleared buffer (all zero)
//! accepts any surface with a positive depth.

use super::pixel_buffer::PixelBuffer;
use crate::color::Color;

/// A view into color and depth buffers.
///
/// This is a borrowed view, not an owning type - it is created for a single
/// draw call and handed to a rasterizer so it never retains the buffers.
pub struct FrameBuffer<'a> {
    color: &'a mut PixelBuffer,
    depth: &'a mut PixelBuffer,
}

impl<'a> FrameBuffer<'a> {
    /// Create a new FrameBuffer view from a color and a depth buffer.
    ///
    /// # Panics
    /// Panics if the two buffers differ in shape or format.
    pub fn new(color: &'a mut PixelBuffer, depth: &'a mut PixelBuffer) -> Self {
        assert_eq!(
            (color.width(), color.height(), color.format()),
            (depth.width(), depth.height(), depth.format()),
            "Depth buffer shape doesn't match color buffer"
        );
        Self { color, depth }
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i32 && y < self.height() as i32
    }

    /// Stored depth at (x, y); zero outside the buffer.
    #[inline]
    pub fn depth_at(&self, x: i32, y: i32) -> u8 {
        self.depth
            .channels(x, y)
            .and_then(|c| c.first().copied())
            .unwrap_or(0)
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// The pixel is only written if `depth` is strictly greater than the
    /// stored depth. Returns whether the pixel was written; coordinates
    /// outside the buffer are never written.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: u8, color: Color) -> bool {
        if !self.contains(x, y) || depth <= self.depth_at(x, y) {
            return false;
        }
        self.depth.set(x, y, Color::gray(depth));
        self.color.set(x, y, color);
        true
    }

    /// Set a pixel without depth testing.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.color.set(x, y, color);
    }

    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        self.color.get(x, y)
    }

    /// Splits the view back into its color and depth buffers.
    pub(crate) fn buffers_mut(&mut self) -> (&mut PixelBuffer, &mut PixelBuffer) {
        (&mut *self.color, &mut *self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PixelFormat;

    fn buffers() -> (PixelBuffer, PixelBuffer) {
        (
            PixelBuffer::new(4, 4, PixelFormat::Rgba32),
            PixelBuffer::new(4, 4, PixelFormat::Rgba32),
        )
    }

    #[test]
    fn higher_depth_wins() {
        let (mut color, mut depth) = buffers();
        let mut fb = FrameBuffer::new(&mut color, &mut depth);

        assert!(fb.set_pixel_with_depth(1, 1, 10, Color::gray(10)));
        assert!(fb.set_pixel_with_depth(1, 1, 200, Color::gray(200)));
        assert!(!fb.set_pixel_with_depth(1, 1, 50, Color::gray(50)));
        assert!(!fb.set_pixel_with_depth(1, 1, 200, Color::gray(1)));

        assert_eq!(fb.depth_at(1, 1), 200);
        assert_eq!(fb.get_pixel(1, 1), Color::gray(200));
    }

    #[test]
    fn zero_depth_never_beats_a_cleared_buffer() {
        let (mut color, mut depth) = buffers();
        let mut fb = FrameBuffer::new(&mut color, &mut depth);
        assert!(!fb.set_pixel_with_depth(0, 0, 0, Color::gray(0)));
        assert_eq!(fb.get_pixel(0, 0), Color::TRANSPARENT);
    }

    #[test]
    #[should_panic(expected = "Depth buffer shape doesn't match color buffer")]
    fn mismatched_depth_buffer_is_rejected() {
        let mut color = PixelBuffer::new(8, 8, PixelFormat::Rgba32);
        let mut depth = PixelBuffer::new(4, 4, PixelFormat::Rgba32);
        FrameBuffer::new(&mut color, &mut depth);
    }

    #[test]
    fn bgr_buffers_keep_depth_in_every_channel() {
        let mut color = PixelBuffer::new(4, 4, PixelFormat::Bgr24);
        let mut depth = PixelBuffer::new(4, 4, PixelFormat::Bgr24);
        let mut fb = FrameBuffer::new(&mut color, &mut depth);
        assert!(fb.set_pixel_with_depth(2, 3, 120, Color::gray(120)));
        assert!(!fb.set_pixel_with_depth(2, 3, 90, Color::gray(90)));
        assert_eq!(fb.depth_at(2, 3), 120);
        assert_eq!(depth.channels(2, 3), Some(&[120u8, 120, 120][..]));
    }

    #[test]
    fn out_of_bounds_depth_write_is_dropped() {
        let (mut color, mut depth) = buffers();
        let mut fb = FrameBuffer::new(&mut color, &mut depth);
        assert!(!fb.set_pixel_with_depth(-1, 9, 255, Color::gray(255)));
        assert_eq!(fb.depth_at(-1, 9), 0);
        assert_eq!(color, PixelBuffer::new(4, 4, PixelFormat::Rgba32));
    }
}
