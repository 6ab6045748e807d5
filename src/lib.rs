//! A minimal CPU software rasterizer.
//!
//! A mesh is projected into screen space under a movable camera and its
//! triangles are filled into a pixel buffer with a per-pixel depth test.
//! SDL2 is used only to show the finished buffer.
//!
//! # Quick Start
//!
//! ```ignore
//! use trr::prelude::*;
//!
//! let config = Config::default();
//! let mut engine = Engine::new(&config);
//! engine.set_mesh(Mesh::load_or_empty(&config.mesh.path));
//! engine.update(&Controls::new());
//! engine.render();
//! engine.frame_buffer().save("frame.png")?;
//! ```

pub mod camera;
pub mod color;
pub mod config;
pub mod engine;
pub mod input;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod window;

pub use config::{Config, ConfigError};
pub use engine::{Engine, RenderMode};
pub use mesh::{LoadError, Mesh};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::camera::{Camera, CameraModel};
    pub use crate::color::{Color, PixelFormat};
    pub use crate::config::Config;
    pub use crate::engine::{Engine, RenderMode};
    pub use crate::input::{Controls, Key};
    pub use crate::math::{Mat4, Matrix, Vec3f, Vector};
    pub use crate::mesh::{Face, Mesh};
    pub use crate::projection::{Projection, Viewport};
    pub use crate::render::{PixelBuffer, RasterizerType};
    pub use crate::window::{FrameLimiter, Window};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{
        draw_line, BarycentricRasterizer, FrameBuffer, PixelBuffer, Point2, Rasterizer,
        ScanlineRasterizer, ScreenPoint, Triangle,
    };
}
