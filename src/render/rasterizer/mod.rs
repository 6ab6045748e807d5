//! Triangle rasterization algorithms.
//!
//! This module provides two rasterizer implementations that can be
//! swapped at runtime through [`RasterizerType`].
//!
//! Available algorithms:
//! - [`BarycentricRasterizer`]: Bounding box iteration with barycentric weights and a depth test
//! - [`ScanlineRasterizer`]: Upper/lower half decomposition, flat color, no depth test

mod barycentric;
mod scanline;

pub use barycentric::BarycentricRasterizer;
pub use scanline::ScanlineRasterizer;

use std::fmt;
use std::str::FromStr;

use super::framebuffer::FrameBuffer;
use crate::color::Color;
use crate::math::Vector;

/// Integer pixel position.
pub type Point2 = Vector<i32, 2>;

/// Projected vertex: pixel x and y plus quantized depth.
pub type ScreenPoint = Vector<i32, 3>;

/// Signed area of the triangle (a, b, c) by the shoelace formula.
///
/// The sign encodes the winding order, so swapping any two vertices negates
/// the result.
#[inline]
pub fn signed_area(a: Point2, b: Point2, c: Point2) -> f64 {
    let (ax, ay) = (a.x() as f64, a.y() as f64);
    let (bx, by) = (b.x() as f64, b.y() as f64);
    let (cx, cy) = (c.x() as f64, c.y() as f64);
    0.5 * ((by - ay) * (bx + ax) + (cy - by) * (cx + bx) + (ay - cy) * (ax + cx))
}

/// A triangle ready for rasterization in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub points: [ScreenPoint; 3],
    /// Used by flat fills; the depth-tested fill shades by depth instead.
    pub color: Color,
}

impl Triangle {
    pub fn new(points: [ScreenPoint; 3], color: Color) -> Self {
        Self { points, color }
    }

    pub fn signed_area(&self) -> f64 {
        let [a, b, c] = self.points;
        signed_area(a.xy(), b.xy(), c.xy())
    }
}

/// Trait for triangle rasterization algorithms.
///
/// Implementors define how triangles are filled into a frame buffer. A call
/// must finish the whole triangle before returning; depth-tested output is
/// only well defined when triangles are processed one after another.
pub trait Rasterizer {
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer);
}

/// Available rasterization algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterizerType {
    /// Bounding box with barycentric containment test and depth buffering.
    #[default]
    Barycentric,
    /// Horizontal spans between interpolated edges. Ignores depth.
    Scanline,
}

impl fmt::Display for RasterizerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterizerType::Barycentric => write!(f, "barycentric"),
            RasterizerType::Scanline => write!(f, "scanline"),
        }
    }
}

impl FromStr for RasterizerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "barycentric" => Ok(RasterizerType::Barycentric),
            "scanline" => Ok(RasterizerType::Scanline),
            other => Err(format!("unknown rasterizer '{other}'")),
        }
    }
}

/// Internal dispatcher that holds both rasterizer implementations.
pub struct RasterizerDispatcher {
    barycentric: BarycentricRasterizer,
    scanline: ScanlineRasterizer,
    active: RasterizerType,
}

impl RasterizerDispatcher {
    pub fn new(rasterizer_type: RasterizerType, barycentric: BarycentricRasterizer) -> Self {
        Self {
            barycentric,
            scanline: ScanlineRasterizer::new(),
            active: rasterizer_type,
        }
    }

    pub fn set_type(&mut self, rasterizer_type: RasterizerType) {
        self.active = rasterizer_type;
    }

    pub fn active_type(&self) -> RasterizerType {
        self.active
    }
}

impl Rasterizer for RasterizerDispatcher {
    #[inline]
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer) {
        match self.active {
            RasterizerType::Barycentric => self.barycentric.fill_triangle(triangle, buffer),
            RasterizerType::Scanline => self.scanline.fill_triangle(triangle, buffer),
        }
    }
}
