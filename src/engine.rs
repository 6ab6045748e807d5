//! Core rendering engine.
//!
//! The [`Engine`] owns everything one frame needs: the mesh, the camera, the
//! color and depth buffers and the active rasterizer. A frame is two calls:
//!
//! 1. [`Engine::update`] applies held input to the camera and projects every
//!    face into a screen-space [`Triangle`].
//! 2. [`Engine::render`] clears both buffers and draws the triangles in mesh
//!    order, filled and/or as wireframe.
//!
//! Presentation is left to the caller through [`Engine::frame_buffer`].

use std::fmt;
use std::str::FromStr;

use log::{debug, trace};

use crate::camera::Camera;
use crate::color::{palette, WHITE};
use crate::config::Config;
use crate::input::Controls;
use crate::mesh::Mesh;
use crate::projection::{Projection, Viewport};
use crate::render::{
    draw_triangle_wireframe, BarycentricRasterizer, FrameBuffer, PixelBuffer, Rasterizer,
    RasterizerDispatcher, RasterizerType, Triangle,
};

/// What to draw for each face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Rasterized triangles only.
    #[default]
    Filled,
    /// Triangle outlines only, one palette color per face.
    Wireframe,
    /// Rasterized triangles with white outlines on top.
    FilledWireframe,
}

impl RenderMode {
    fn draws_fill(self) -> bool {
        matches!(self, RenderMode::Filled | RenderMode::FilledWireframe)
    }

    fn draws_wireframe(self) -> bool {
        matches!(self, RenderMode::Wireframe | RenderMode::FilledWireframe)
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Filled => write!(f, "filled"),
            RenderMode::Wireframe => write!(f, "wireframe"),
            RenderMode::FilledWireframe => write!(f, "filled_wireframe"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filled" => Ok(RenderMode::Filled),
            "wireframe" => Ok(RenderMode::Wireframe),
            "filled_wireframe" | "filled-wireframe" => Ok(RenderMode::FilledWireframe),
            other => Err(format!("unknown render mode '{other}'")),
        }
    }
}

pub struct Engine {
    viewport: Viewport,
    color: PixelBuffer,
    depth: PixelBuffer,
    rasterizer: RasterizerDispatcher,
    triangles_to_render: Vec<Triangle>,
    mesh: Mesh,
    camera: Camera,
    render_mode: RenderMode,
}

impl Engine {
    /// Builds an engine with an empty mesh from the display, render and
    /// camera sections of `config`.
    pub fn new(config: &Config) -> Self {
        let render = &config.render;
        let viewport = Viewport::new(
            config.display.width,
            config.display.height,
            render.depth_range,
        );
        let barycentric = BarycentricRasterizer::new()
            .with_depth_test(render.depth_test)
            .with_parallel(render.parallel)
            .with_backface_culling(render.backface_culling);
        let camera = Camera::new(render.camera)
            .with_move_step(config.camera.move_step)
            .with_turn_step(config.camera.turn_step);

        debug!(
            "Engine {}x{} depth {} format {} camera {} rasterizer {} mode {}",
            viewport.width,
            viewport.height,
            viewport.depth,
            render.channel_order,
            render.camera,
            render.rasterizer,
            render.mode
        );

        Self {
            viewport,
            color: PixelBuffer::new(viewport.width, viewport.height, render.channel_order),
            depth: PixelBuffer::new(viewport.width, viewport.height, render.channel_order),
            rasterizer: RasterizerDispatcher::new(render.rasterizer, barycentric),
            triangles_to_render: Vec::new(),
            mesh: Mesh::default(),
            camera,
            render_mode: render.mode,
        }
    }

    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.mesh = mesh;
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_rasterizer(&mut self, rasterizer_type: RasterizerType) {
        self.rasterizer.set_type(rasterizer_type);
    }

    pub fn rasterizer(&self) -> RasterizerType {
        self.rasterizer.active_type()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The last rendered frame, in the configured channel order.
    pub fn frame_buffer(&self) -> &PixelBuffer {
        &self.color
    }

    pub fn depth_buffer(&self) -> &PixelBuffer {
        &self.depth
    }

    /// Triangles produced by the last [`Engine::update`].
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles_to_render
    }

    /// Applies one frame of input to the camera, then projects every face.
    pub fn update(&mut self, controls: &Controls) {
        self.camera.update(controls);
        let projection = Projection::new(self.viewport, &self.camera);

        self.triangles_to_render.clear();
        for (i, face) in self.mesh.faces().iter().enumerate() {
            let Some(vertices) = self.mesh.face_vertices(face) else {
                trace!("Face {i} references a missing vertex, skipped");
                continue;
            };
            let points = vertices.map(|v| projection.project(v));
            self.triangles_to_render.push(Triangle::new(points, palette(i)));
        }
    }

    /// Clears both buffers and draws the current triangles.
    pub fn render(&mut self) {
        self.color.clear(0);
        self.depth.clear(0);

        if self.render_mode.draws_fill() {
            let mut fb = FrameBuffer::new(&mut self.color, &mut self.depth);
            for triangle in &self.triangles_to_render {
                self.rasterizer.fill_triangle(triangle, &mut fb);
            }
        }

        if self.render_mode.draws_wireframe() {
            let outline_only = !self.render_mode.draws_fill();
            for triangle in &self.triangles_to_render {
                let color = if outline_only { triangle.color } else { WHITE };
                draw_triangle_wireframe(&mut self.color, triangle.points.map(|p| p.xy()), color);
            }
        }

        trace!("Rendered {} triangles", self.triangles_to_render.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraModel;
    use crate::color::{Color, PixelFormat, RED};
    use crate::input::Key;
    use crate::math::Vector;
    use crate::mesh::Face;

    fn config() -> Config {
        let mut config = Config::default();
        config.display.width = 64;
        config.display.height = 48;
        config
    }

    /// A triangle at depth `z` covering the center of a 64x48 screen.
    fn triangle_mesh(zs: &[f32]) -> Mesh {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for (i, &z) in zs.iter().enumerate() {
            vertices.push(Vector::new([-0.5, -0.5, z]));
            vertices.push(Vector::new([0.5, -0.5, z]));
            vertices.push(Vector::new([0.0, 0.5, z]));
            faces.push(Face::new(3 * i + 1, 3 * i + 2, 3 * i + 3));
        }
        Mesh::new(vertices, faces)
    }

    fn frame(engine: &mut Engine, controls: &Controls) -> (Color, u8) {
        engine.update(controls);
        engine.render();
        (
            engine.frame_buffer().get(32, 30),
            engine.depth_buffer().get(32, 30).r,
        )
    }

    #[test]
    fn renders_depth_as_gray() {
        let mut engine = Engine::new(&config());
        engine.set_mesh(triangle_mesh(&[0.0]));
        let (color, depth) = frame(&mut engine, &Controls::new());
        assert_eq!(depth, 127);
        assert_eq!(color, Color::gray(127));
        assert_eq!(engine.frame_buffer().get(0, 0), Color::TRANSPARENT);
    }

    #[test]
    fn nearer_triangle_wins_in_either_order() {
        for zs in [[0.0, 0.5], [0.5, 0.0]] {
            let mut engine = Engine::new(&config());
            engine.set_mesh(triangle_mesh(&zs));
            let (color, depth) = frame(&mut engine, &Controls::new());
            assert_eq!(depth, 191);
            assert_eq!(color, Color::gray(191));
        }
    }

    #[test]
    fn forward_input_brings_the_mesh_closer() {
        let mut engine = Engine::new(&config());
        engine.set_mesh(triangle_mesh(&[0.0]));
        let mut controls = Controls::new();
        controls.set_key(Key::Forward, true);
        let (_, depth) = frame(&mut engine, &controls);
        assert_eq!(depth, 140);
    }

    #[test]
    fn buffers_are_cleared_every_frame() {
        let mut engine = Engine::new(&config());
        engine.set_mesh(triangle_mesh(&[0.0]));
        frame(&mut engine, &Controls::new());
        engine.set_mesh(Mesh::default());
        let (color, depth) = frame(&mut engine, &Controls::new());
        assert_eq!((color, depth), (Color::TRANSPARENT, 0));
    }

    #[test]
    fn wireframe_draws_outlines_in_palette_colors() {
        let mut engine = Engine::new(&config());
        engine.set_mesh(triangle_mesh(&[0.0]));
        engine.set_render_mode(RenderMode::Wireframe);
        let (color, depth) = frame(&mut engine, &Controls::new());
        assert_eq!((color, depth), (Color::TRANSPARENT, 0));
        // First vertex projects to (16, 36).
        assert_eq!(engine.frame_buffer().get(16, 36), RED);
    }

    #[test]
    fn scanline_fills_flat_palette_color() {
        let mut engine = Engine::new(&config());
        engine.set_mesh(triangle_mesh(&[0.0]));
        engine.set_rasterizer(RasterizerType::Scanline);
        let (color, depth) = frame(&mut engine, &Controls::new());
        assert_eq!(color, RED);
        assert_eq!(depth, 0);
    }

    #[test]
    fn unresolvable_faces_are_skipped() {
        let mut engine = Engine::new(&config());
        let base = triangle_mesh(&[0.0]);
        let faces = vec![Face::new(1, 2, 9), Face::new(1, 2, 3)];
        engine.set_mesh(Mesh::new(base.vertices().to_vec(), faces));
        engine.update(&Controls::new());
        assert_eq!(engine.triangles().len(), 1);
    }

    #[test]
    fn honours_channel_order_and_camera_model() {
        let mut config = config();
        config.render.channel_order = PixelFormat::Bgr24;
        config.render.camera = CameraModel::YawPitch;
        let mut engine = Engine::new(&config);
        assert_eq!(engine.frame_buffer().as_bytes().len(), 64 * 48 * 3);
        assert_eq!(engine.camera().model(), CameraModel::YawPitch);

        engine.set_mesh(triangle_mesh(&[0.0]));
        let (color, depth) = frame(&mut engine, &Controls::new());
        assert_eq!(depth, 127);
        assert_eq!(color, Color::gray(127));
    }

    #[test]
    fn render_mode_parses_names() {
        assert_eq!(
            "filled_wireframe".parse::<RenderMode>(),
            Ok(RenderMode::FilledWireframe)
        );
        assert!("points".parse::<RenderMode>().is_err());
        assert_eq!(RenderMode::Wireframe.to_string(), "wireframe");
    }
}
