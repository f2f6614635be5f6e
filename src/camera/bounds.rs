//! Axis-aligned bounding boxes for scene framing.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box. A box with `min > max` on any axis is
/// empty and contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// The empty box: the identity for [`Aabb::union`].
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min: Vec3::INFINITY,
            max: Vec3::NEG_INFINITY,
        }
    }

    /// Box spanning two corners given in any order.
    #[must_use]
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point (empty for no points).
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::empty(), |mut acc, p| {
            acc.extend(p);
            acc
        })
    }

    /// Grow to contain `point`.
    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True when the box contains no points at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// True when the box is empty or has zero extent on every axis.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || self.max_extent() <= f32::EPSILON
    }

    /// Center point; the origin for an empty box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Extent along each axis; zero for an empty box.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Largest extent over the three axes.
    #[must_use]
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }

    /// The eight corners.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Axis-aligned box around this box after transforming all eight
    /// corners by `matrix`.
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::from_points(
            self.corners().iter().map(|c| matrix.transform_point3(*c)),
        )
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    #[test]
    fn empty_box_has_zero_size() {
        let b = Aabb::empty();
        assert!(b.is_empty());
        assert!(b.is_degenerate());
        assert_eq!(b.size(), Vec3::ZERO);
        assert_eq!(b.center(), Vec3::ZERO);
        assert!(Aabb::from_points([]).is_empty());
    }

    #[test]
    fn single_point_is_degenerate_but_not_empty() {
        let b = Aabb::from_points([Vec3::new(1.0, 2.0, 3.0)]);
        assert!(!b.is_empty());
        assert!(b.is_degenerate());
        assert_eq!(b.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn union_with_empty_is_identity() {
        let b = Aabb::from_corners(Vec3::ONE, Vec3::ZERO);
        assert_eq!(b.union(&Aabb::empty()), b);
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.size(), Vec3::ONE);
    }

    #[test]
    fn rotated_box_grows_to_enclose_corners() {
        let b = Aabb::from_corners(Vec3::splat(-1.0), Vec3::splat(1.0));
        let m = Mat4::from_quat(Quat::from_rotation_y(
            std::f32::consts::FRAC_PI_4,
        ));
        let t = b.transformed(&m);
        let half_diag = 2.0_f32.sqrt();
        assert!((t.max.x - half_diag).abs() < 1e-5);
        assert!((t.max.z - half_diag).abs() < 1e-5);
        assert!((t.max.y - 1.0).abs() < 1e-5);
    }
}
