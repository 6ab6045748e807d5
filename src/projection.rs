//! Model space to screen space mapping.
//!
//! Model coordinates are expected to lie roughly in `[-1, 1]` on every axis.
//! Two mapping families turn them into integer pixel and depth coordinates:
//!
//! - [`ProjectionKind::DirectClamp`] adds the camera offset and rescales each
//!   axis independently.
//! - [`ProjectionKind::Matrix`] adds the camera offset, rotates by the
//!   camera's yaw and pitch, then applies the [`Viewport::matrix`].
//!
//! Both clamp into `[0, width] x [0, height] x [0, depth]` and truncate to
//! integers. There is no near/far clipping: points out of range collapse
//! onto the border, which can produce zero-area triangles that the
//! rasterizer skips.

use crate::camera::{Camera, CameraModel};
use crate::math::{Mat4, Vec3f, Vector};
use crate::render::ScreenPoint;

/// Screen size plus the quantized depth range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Viewport {
    pub const DEFAULT_DEPTH: u32 = 255;

    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Maps the `[-1, 1]` cube onto the viewport with the vertical axis
    /// flipped, since screen rows grow downward.
    pub fn matrix(&self) -> Mat4 {
        let (w, h, d) = self.half_extents();
        Mat4::from_rows([
            [w, 0.0, 0.0, w],
            [0.0, -h, 0.0, h],
            [0.0, 0.0, d, d],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    fn half_extents(&self) -> (f64, f64, f64) {
        (
            self.width as f64 / 2.0,
            self.height as f64 / 2.0,
            self.depth as f64 / 2.0,
        )
    }

    /// Clamps a mapped point into the viewport and truncates to integers.
    fn quantize(&self, x: f64, y: f64, z: f64) -> ScreenPoint {
        Vector::new([
            x.clamp(0.0, self.width as f64) as i32,
            y.clamp(0.0, self.height as f64) as i32,
            z.clamp(0.0, self.depth as f64) as i32,
        ])
    }
}

/// The two screen mapping families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    DirectClamp,
    Matrix,
}

impl ProjectionKind {
    /// Offset cameras use the direct mapping, yaw-pitch cameras need the
    /// rotation and therefore the matrix mapping.
    pub fn for_camera(model: CameraModel) -> Self {
        match model {
            CameraModel::Offset => ProjectionKind::DirectClamp,
            CameraModel::YawPitch => ProjectionKind::Matrix,
        }
    }
}

/// Per-frame projection state, built once from the camera and reused for
/// every vertex.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    viewport: Viewport,
    kind: ProjectionKind,
    offset: Vector<f64, 3>,
    transform: Mat4,
}

impl Projection {
    pub fn new(viewport: Viewport, camera: &Camera) -> Self {
        Self::with_kind(viewport, camera, ProjectionKind::for_camera(camera.model()))
    }

    pub fn with_kind(viewport: Viewport, camera: &Camera, kind: ProjectionKind) -> Self {
        let transform = match kind {
            ProjectionKind::DirectClamp => Mat4::identity(),
            ProjectionKind::Matrix => viewport.matrix() * camera.rotation_matrix(),
        };
        Self {
            viewport,
            kind,
            offset: camera.offset(),
            transform,
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Projects one model-space vertex.
    pub fn project(&self, vertex: Vec3f) -> ScreenPoint {
        let p = vertex.map(|c| c as f64) + self.offset;
        match self.kind {
            ProjectionKind::DirectClamp => {
                let (w, h, d) = self.viewport.half_extents();
                self.viewport.quantize(
                    (p.x() + 1.0) * w,
                    (1.0 - p.y()) * h,
                    (p.z() + 1.0) * d,
                )
            }
            ProjectionKind::Matrix => {
                let s = self.transform * p.extend(1.0);
                self.viewport.quantize(s.x(), s.y(), s.z())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const VIEWPORT: Viewport = Viewport {
        width: 640,
        height: 480,
        depth: 255,
    };

    fn v(x: f32, y: f32, z: f32) -> Vec3f {
        Vector::new([x, y, z])
    }

    fn direct(camera: &Camera) -> Projection {
        Projection::with_kind(VIEWPORT, camera, ProjectionKind::DirectClamp)
    }

    #[test]
    fn direct_mapping_centers_the_origin() {
        let projection = direct(&Camera::default());
        assert_eq!(projection.project(v(0.0, 0.0, 0.0)), Vector::new([320, 240, 127]));
        assert_eq!(projection.project(v(-1.0, 1.0, -1.0)), Vector::new([0, 0, 0]));
        assert_eq!(projection.project(v(1.0, -1.0, 1.0)), Vector::new([640, 480, 255]));
    }

    #[test]
    fn direct_mapping_clamps_out_of_range_points() {
        let projection = direct(&Camera::default());
        assert_eq!(projection.project(v(-7.0, 9.0, -3.0)), Vector::new([0, 0, 0]));
        assert_eq!(projection.project(v(5.0, -5.0, 40.0)), Vector::new([640, 480, 255]));
    }

    #[test]
    fn camera_offset_shifts_the_mapping() {
        let mut camera = Camera::default();
        camera.set_offset(Vector::new([0.5, 0.0, 0.5]));
        let projection = direct(&camera);
        assert_eq!(projection.project(v(0.0, 0.0, 0.0)), Vector::new([480, 240, 191]));
    }

    #[test]
    fn matrix_mapping_matches_direct_without_rotation() {
        let mut camera = Camera::new(CameraModel::YawPitch);
        camera.set_offset(Vector::new([0.25, -0.5, 0.1]));
        let matrix = Projection::new(VIEWPORT, &camera);
        assert_eq!(matrix.kind(), ProjectionKind::Matrix);
        let direct = direct(&camera);

        for vertex in [v(0.0, 0.0, 0.0), v(0.3, -0.7, 0.9), v(-0.9, 0.2, -0.4), v(3.0, 3.0, 3.0)] {
            assert_eq!(matrix.project(vertex), direct.project(vertex));
        }
    }

    #[test]
    fn yaw_turns_the_scene() {
        let mut camera = Camera::new(CameraModel::YawPitch);
        camera.rotate_yaw(FRAC_PI_2);
        let projection = Projection::new(VIEWPORT, &camera);
        // +x swings round to -z, which sits at the back of the depth range
        // and the horizontal center of the screen.
        let p = projection.project(v(1.0, 0.0, 0.0));
        assert_eq!((p.x(), p.y(), p.z()), (320, 240, 0));
    }

    #[test]
    fn viewport_matrix_maps_cube_corners() {
        let m = VIEWPORT.matrix();
        let corner = m * Vector::new([1.0, 1.0, 1.0, 1.0]);
        assert_eq!(corner.to_array(), [640.0, 0.0, 255.0, 1.0]);
    }
}
