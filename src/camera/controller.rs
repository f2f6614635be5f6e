use glam::{Vec2, Vec3};

use super::core::Camera;
use crate::options::CameraOptions;

/// Orbit controls around a target point.
///
/// Autofit seeds the pose once per scene load; after that the pose belongs
/// to user input. Limits only constrain user input, so a seeded pose
/// outside them is kept until the user first rotates or zooms.
#[derive(Debug, Clone)]
pub struct OrbitController {
    target: Vec3,
    distance: f32,
    /// Angle about +Y; zero puts the eye on the target's +Z side.
    azimuth: f32,
    /// Angle down from +Y.
    polar: f32,

    min_distance: f32,
    max_distance: f32,
    min_polar: f32,
    max_polar: f32,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl OrbitController {
    /// Controller looking at the origin from 5 units down +Z.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 5.0,
            azimuth: 0.0,
            polar: std::f32::consts::FRAC_PI_2,
            min_distance: options.min_distance,
            max_distance: options.max_distance,
            min_polar: options.min_polar_deg.to_radians(),
            max_polar: options.max_polar_deg.to_radians(),
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
        }
    }

    /// Orbit target.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Distance from eye to target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Polar angle in radians.
    #[must_use]
    pub fn polar(&self) -> f32 {
        self.polar
    }

    /// Eye position implied by the current orbit.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target
            + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    /// Adopt an explicit pose without applying limits.
    pub fn seed(&mut self, eye: Vec3, target: Vec3) {
        self.target = target;
        let offset = eye - target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            self.distance = self.min_distance;
            return;
        }
        self.distance = distance;
        self.polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        self.azimuth = offset.x.atan2(offset.z);
    }

    /// Orbit by a pointer drag in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.azimuth -= delta.x * self.rotate_speed;
        self.polar = (self.polar - delta.y * self.rotate_speed)
            .clamp(self.min_polar, self.max_polar);
    }

    /// Move the target in the view plane by a pointer drag in pixels.
    pub fn pan(&mut self, delta: Vec2) {
        let forward = (self.target - self.eye()).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        self.target += right * (-delta.x * self.pan_speed)
            + up * (delta.y * self.pan_speed);
    }

    /// Zoom by scroll steps (positive = closer).
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * self.zoom_speed))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Write the orbit pose into `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        camera.eye = self.eye();
        camera.target = self.target;
        camera.up = Vec3::Y;
    }
}
