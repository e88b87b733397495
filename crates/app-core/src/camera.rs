//! Perspective camera and the orbit controller that drives it.

use crate::constants::*;
use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Orbit around a fixed target: zoom with clamped distance, no panning, and
/// optional constant-speed auto-rotation around the vertical axis.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Angle around +Y, radians.
    pub azimuth: f32,
    /// Angle down from +Y, radians.
    pub polar: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub fovy_radians: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_from(camera_position_vec3(), Vec3::ZERO)
    }
}

impl OrbitCamera {
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            target,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            distance,
            min_distance: ZOOM_MIN_DISTANCE,
            max_distance: ZOOM_MAX_DISTANCE,
            auto_rotate: true,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
        }
    }

    /// Auto-rotation rate in radians per second: one full turn every
    /// `60 / speed` seconds.
    #[inline]
    pub fn angular_speed(&self) -> f32 {
        TAU / 60.0 * self.auto_rotate_speed
    }

    pub fn update(&mut self, dt: f32) {
        if self.auto_rotate {
            self.azimuth = (self.azimuth + self.angular_speed() * dt).rem_euclid(TAU);
        }
    }

    /// Positive steps move closer. Each step scales distance by 0.95.
    pub fn zoom(&mut self, steps: f32) {
        let scale = 0.95_f32.powf(steps);
        self.distance = (self.distance * scale).clamp(self.min_distance, self.max_distance);
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    pub fn to_camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.eye(),
            target: self.target,
            up: Vec3::Y,
            aspect,
            fovy_radians: self.fovy_radians,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}
