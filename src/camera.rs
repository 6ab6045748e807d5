//! Input-driven virtual camera.
//!
//! # Models
//!
//! - **Offset**: the camera is a plain translation added to every vertex
//!   before the screen mapping. W/S move along z, A/D along x.
//! - **Yaw-pitch**: the translation is followed by a rotation about the
//!   vertical axis (yaw) composed with a rotation about the horizontal axis
//!   (pitch). The arrow keys turn, and W/A/S/D move relative to where the
//!   camera faces.
//!
//! Depth grows toward the viewer, so moving "forward" increases z.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use crate::input::Controls;
use crate::math::{Mat4, Vector};

/// Which camera model drives the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraModel {
    #[default]
    Offset,
    YawPitch,
}

impl fmt::Display for CameraModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraModel::Offset => write!(f, "offset"),
            CameraModel::YawPitch => write!(f, "yaw_pitch"),
        }
    }
}

impl FromStr for CameraModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offset" => Ok(CameraModel::Offset),
            "yaw_pitch" | "yaw-pitch" | "yawpitch" => Ok(CameraModel::YawPitch),
            other => Err(format!("unknown camera model '{other}'")),
        }
    }
}

/// Camera position and orientation.
#[derive(Debug, Clone)]
pub struct Camera {
    model: CameraModel,
    offset: Vector<f64, 3>,
    yaw: f64,
    pitch: f64,
    move_step: f64,
    turn_step: f64,
    pitch_limit: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraModel::Offset)
    }
}

impl Camera {
    pub const DEFAULT_MOVE_STEP: f64 = 0.1;
    pub const DEFAULT_TURN_STEP: f64 = 0.05;

    pub fn new(model: CameraModel) -> Self {
        Self {
            model,
            offset: Vector::zero(),
            yaw: 0.0,
            pitch: 0.0,
            move_step: Self::DEFAULT_MOVE_STEP,
            turn_step: Self::DEFAULT_TURN_STEP,
            pitch_limit: 89.0_f64.to_radians(),
        }
    }

    /// Sets how far one frame of a held movement key travels.
    pub fn with_move_step(mut self, step: f64) -> Self {
        self.move_step = step;
        self
    }

    /// Sets how far one frame of a held arrow key turns, in radians.
    pub fn with_turn_step(mut self, step: f64) -> Self {
        self.turn_step = step;
        self
    }

    pub fn model(&self) -> CameraModel {
        self.model
    }

    pub fn offset(&self) -> Vector<f64, 3> {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vector<f64, 3>) {
        self.offset = offset;
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Rotates horizontally. The angle wraps into `[0, 2π)`.
    pub fn rotate_yaw(&mut self, delta: f64) {
        self.yaw = (self.yaw + delta).rem_euclid(TAU);
    }

    /// Rotates vertically, clamped to ±89°.
    pub fn rotate_pitch(&mut self, delta: f64) {
        self.pitch = (self.pitch + delta).clamp(-self.pitch_limit, self.pitch_limit);
    }

    /// Yaw composed with pitch: `Ry(yaw) * Rx(pitch)`.
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::rotation_y(self.yaw) * Mat4::rotation_x(self.pitch)
    }

    /// Moves by `delta` given in view space.
    ///
    /// The projection applies the rotation after the offset, so the world
    /// space step is `R^T * delta`.
    pub fn move_relative(&mut self, delta: Vector<f64, 3>) {
        let world = self.rotation_matrix().transpose() * delta.extend(0.0);
        self.offset = self.offset + world.truncate();
    }

    /// Applies one frame of held input.
    pub fn update(&mut self, controls: &Controls) {
        let step = self.move_step;
        let mut delta = Vector::<f64, 3>::zero();
        if controls.forward {
            delta[2] += step;
        }
        if controls.back {
            delta[2] -= step;
        }
        if controls.left {
            delta[0] -= step;
        }
        if controls.right {
            delta[0] += step;
        }

        match self.model {
            CameraModel::Offset => self.offset = self.offset + delta,
            CameraModel::YawPitch => {
                let turn = self.turn_step;
                if controls.turn_left {
                    self.rotate_yaw(-turn);
                }
                if controls.turn_right {
                    self.rotate_yaw(turn);
                }
                if controls.look_up {
                    self.rotate_pitch(-turn);
                }
                if controls.look_down {
                    self.rotate_pitch(turn);
                }
                if delta != Vector::zero() {
                    self.move_relative(delta);
                }
            }
        }
    }
}
