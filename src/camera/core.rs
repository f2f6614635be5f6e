use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::frustum::Frustum;
use crate::options::CameraOptions;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

/// A half-line from `origin` along unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Distance along the ray to the first intersection with a sphere, if
    /// any lies ahead of the origin.
    #[must_use]
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt = disc.sqrt();
        let near = -b - sqrt;
        let far = -b + sqrt;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // Origin inside the sphere.
            Some(0.0)
        } else {
            None
        }
    }
}

impl Camera {
    /// Camera at the scene's startup pose, before any autofit.
    #[must_use]
    pub fn from_options(options: &CameraOptions, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// View matrix.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix ([0,1] depth range).
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// View frustum for the current pose.
    #[must_use]
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(self.build_matrix())
    }

    /// Unit vector from eye toward target.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }

    /// Heading of the camera about +Y, in radians.
    ///
    /// Zero when looking down -Z; a yaw-only rotation of this angle turns
    /// an object's +Z face toward the eye.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        let back = self.eye - self.target;
        back.x.atan2(back.z)
    }

    /// World-space ray through a point in normalized device coordinates
    /// (x right, y up, both in [-1, 1]).
    #[must_use]
    pub fn ray_from_ndc(&self, x: f32, y: f32) -> Ray {
        let inv = self.build_matrix().inverse();
        let near = inv * Vec4::new(x, y, 0.0, 1.0);
        let far = inv * Vec4::new(x, y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Ray {
            origin: near,
            direction: (far - near).normalize_or(self.forward()),
        }
    }
}
