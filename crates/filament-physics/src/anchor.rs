//! Anchor pose: the rigid transform filament roots are pinned to

use glam::{Quat, Vec3};

/// Rigid position + rotation of the attachment surface (e.g. a scalp).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl AnchorPose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Interpolate between two poses: linear on position, normalized
    /// lerp on rotation. Used to spread anchor motion across sub-steps.
    pub fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        Self {
            position: a.position.lerp(b.position, t),
            rotation: a.rotation.lerp(b.rotation, t).normalize(),
        }
    }

    /// Transform a point from anchor-local space to world space.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * p + self.position
    }

    /// Rotate a direction from anchor-local space to world space.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation * v
    }

    /// The anchor's local up axis in world space, used as the stable
    /// reference when building orientation frames.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

impl Default for AnchorPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_transform() {
        let pose = AnchorPose::IDENTITY;
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(pose.transform_point(p), p);
        assert_eq!(pose.transform_vector(p), p);
    }

    #[test]
    fn test_transform_point_rotates_then_translates() {
        let pose = AnchorPose::new(Vec3::new(10.0, 0.0, 0.0), Quat::from_rotation_z(FRAC_PI_2));
        let p = pose.transform_point(Vec3::X);
        assert!((p - Vec3::new(10.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = AnchorPose::IDENTITY;
        let b = AnchorPose::new(Vec3::new(2.0, 0.0, 0.0), Quat::from_rotation_y(1.0));
        let at_start = AnchorPose::lerp(&a, &b, 0.0);
        let at_end = AnchorPose::lerp(&a, &b, 1.0);
        assert!((at_start.position - a.position).length() < 1e-6);
        assert!((at_end.position - b.position).length() < 1e-6);
        assert!(at_end.rotation.dot(b.rotation).abs() > 1.0 - 1e-6);
    }

    #[test]
    fn test_lerp_midpoint_position() {
        let a = AnchorPose::new(Vec3::ZERO, Quat::IDENTITY);
        let b = AnchorPose::new(Vec3::new(4.0, 0.0, 0.0), Quat::IDENTITY);
        let mid = AnchorPose::lerp(&a, &b, 0.5);
        assert_eq!(mid.position, Vec3::new(2.0, 0.0, 0.0));
    }
}
