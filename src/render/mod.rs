//! Software rendering primitives.
//!
//! Everything here draws into a [`PixelBuffer`]: triangles through a
//! [`Rasterizer`] operating on a [`FrameBuffer`] view, and lines through
//! [`draw_line`].

pub mod framebuffer;
pub mod line;
pub mod pixel_buffer;
pub mod rasterizer;

pub use framebuffer::FrameBuffer;
pub use line::{draw_line, draw_triangle_wireframe};
pub use pixel_buffer::PixelBuffer;
pub use rasterizer::{
    signed_area, BarycentricRasterizer, Point2, Rasterizer, RasterizerDispatcher, RasterizerType,
    ScanlineRasterizer, ScreenPoint, Triangle,
};
