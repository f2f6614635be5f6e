//! View frustum tests used to check that a fitted scene is fully in view.

use glam::{Mat4, Vec3, Vec4};

use super::bounds::Aabb;

/// A plane `normal · p + distance = 0`, normal pointing into the frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the positive half-space.
    pub normal: Vec3,
    /// Signed offset from the origin.
    pub distance: f32,
}

impl Plane {
    /// Normalize raw plane coefficients `(a, b, c, d)`.
    #[must_use]
    pub fn from_coefficients(v: Vec4) -> Self {
        let len = v.truncate().length();
        if len > 0.0 {
            Self {
                normal: v.truncate() / len,
                distance: v.w / len,
            }
        } else {
            Self {
                normal: Vec3::ZERO,
                distance: 0.0,
            }
        }
    }

    /// Signed distance from point to plane (positive = inside).
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// View frustum consisting of 6 inward-facing planes.
#[derive(Debug, Clone)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract planes from a view-projection matrix with [0,1] depth
    /// (Gribb/Hartmann).
    #[must_use]
    pub fn from_view_projection(vp: Mat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];
        let coefficients = [
            rows[3] + rows[0],
            rows[3] - rows[0],
            rows[3] + rows[1],
            rows[3] - rows[1],
            rows[2],
            rows[3] - rows[2],
        ];
        Self {
            planes: coefficients.map(Plane::from_coefficients),
        }
    }

    /// Test if a point is inside the frustum.
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Test if a sphere intersects or is inside the frustum.
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }

    /// Test if every corner of `bounds` is inside the frustum.
    #[must_use]
    pub fn contains_aabb(&self, bounds: &Aabb) -> bool {
        !bounds.is_empty()
            && bounds.corners().iter().all(|c| self.contains_point(*c))
    }
}
