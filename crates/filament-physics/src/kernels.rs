//! Per-segment simulation kernels
//!
//! CPU counterparts of the original GPU material passes, one named
//! function per pass: reset (positions, velocities, basis) seeds a valid
//! rest configuration, integrate (velocities, positions) advances one
//! sub-step with semi-implicit Euler, and the basis pass derives an
//! orientation frame for ribbon-style consumers.
//!
//! All functions are pure over their arguments; the simulation crate maps
//! them over the `(filament, segment)` grid. There is no cross-filament
//! dependency, so the per-filament map is freely parallelizable.

use glam::{Mat3, Quat, Vec3};

use crate::{filament_random, AnchorPose, SimConfig};

/// Rest distance between adjacent segments of one filament.
///
/// `(length / segment_count) * (1 ± length_randomness * u)` where `u` is
/// the filament's deterministic random value.
pub fn segment_rest_length(config: &SimConfig, segment_count: u32, filament: u32) -> f32 {
    let u = filament_random(config.random_seed, filament);
    let scale = 1.0 + config.length_randomness * (2.0 * u - 1.0);
    (config.length / segment_count as f32) * scale
}

/// Kinematic position of a filament root: the anchor-transformed
/// foundation sample. Roots are never integrated.
pub fn root_position(anchor: &AnchorPose, foundation_root: Vec3) -> Vec3 {
    anchor.transform_point(foundation_root)
}

/// Reset kernel: lay segment `segment` out along the anchor-rotated
/// foundation normal at rest spacing.
pub fn reset_position(
    anchor: &AnchorPose,
    foundation_root: Vec3,
    foundation_normal: Vec3,
    rest_length: f32,
    segment: u32,
) -> Vec3 {
    let direction = anchor
        .transform_vector(foundation_normal)
        .try_normalize()
        .unwrap_or(Vec3::Y);
    root_position(anchor, foundation_root) + direction * (rest_length * segment as f32)
}

/// Reset kernel: filaments start at rest.
pub fn reset_velocity() -> Vec3 {
    Vec3::ZERO
}

/// Reset kernel: initial orientation frame from the growth direction.
pub fn reset_basis(anchor: &AnchorPose, foundation_normal: Vec3) -> Quat {
    let tangent = anchor
        .transform_vector(foundation_normal)
        .try_normalize()
        .unwrap_or(Vec3::Y);
    frame_from_tangent(tangent, anchor.up())
}

/// Integration kernel: spring-damper velocity update (semi-implicit
/// Euler). `parent_position` is the parent segment's position already
/// updated within the current sub-step.
pub fn integrate_velocity(
    position: Vec3,
    velocity: Vec3,
    parent_position: Vec3,
    rest_length: f32,
    config: &SimConfig,
    dt: f32,
) -> Vec3 {
    let offset = position - parent_position;
    let direction = offset
        .try_normalize()
        .unwrap_or_else(|| config.gravity.try_normalize().unwrap_or(Vec3::NEG_Y));
    let target = parent_position + direction * rest_length;

    let accel = config.spring * (target - position) - config.damping * velocity + config.gravity;
    velocity + accel * dt
}

/// Integration kernel: position update from the already-updated velocity.
pub fn integrate_position(position: Vec3, velocity: Vec3, dt: f32) -> Vec3 {
    position + velocity * dt
}

/// Basis kernel: orientation frame for one segment.
///
/// The tangent points toward `neighbor` (the next segment, or the parent
/// negated at the tip). The normal continues the previous frame's normal
/// projected into the new tangent plane, so ribbons do not twist frame to
/// frame; `up_ref` breaks ties when the projection degenerates.
///
/// Packing: X = normal, Y = tangent (along the strand), Z = binormal.
pub fn compute_basis(prev_basis: Quat, position: Vec3, neighbor: Vec3, up_ref: Vec3) -> Quat {
    let tangent = (neighbor - position)
        .try_normalize()
        .unwrap_or_else(|| prev_basis * Vec3::Y);

    let prev_normal = prev_basis * Vec3::X;
    let projected = prev_normal - tangent * prev_normal.dot(tangent);
    match projected.try_normalize() {
        Some(normal) => Quat::from_mat3(&Mat3::from_cols(
            normal,
            tangent,
            normal.cross(tangent),
        )),
        None => frame_from_tangent(tangent, up_ref),
    }
}

/// Build an orthonormal frame around `tangent` using `up_ref` as the
/// normal hint.
pub fn frame_from_tangent(tangent: Vec3, up_ref: Vec3) -> Quat {
    let projected = up_ref - tangent * up_ref.dot(tangent);
    let normal = projected
        .try_normalize()
        .unwrap_or_else(|| tangent.any_orthonormal_vector());
    Quat::from_mat3(&Mat3::from_cols(normal, tangent, normal.cross(tangent)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimConfig {
        SimConfig::default()
    }

    #[test]
    fn test_rest_length_within_randomness_bounds() {
        let config = config();
        let nominal = config.length / 8.0;
        for filament in 0..64 {
            let rest = segment_rest_length(&config, 8, filament);
            let deviation = (rest - nominal).abs();
            assert!(deviation <= config.length_randomness * nominal + 1e-6);
        }
    }

    #[test]
    fn test_rest_length_uniform_without_randomness() {
        let config = SimConfig {
            length_randomness: 0.0,
            ..config()
        };
        for filament in 0..8 {
            assert_eq!(segment_rest_length(&config, 4, filament), 0.25);
        }
    }

    #[test]
    fn test_root_follows_anchor() {
        let anchor = AnchorPose::new(Vec3::new(0.0, 5.0, 0.0), Quat::from_rotation_y(1.2));
        let root = Vec3::new(0.3, 0.0, 0.1);
        assert_eq!(root_position(&anchor, root), anchor.transform_point(root));
    }

    #[test]
    fn test_reset_position_spacing() {
        let anchor = AnchorPose::IDENTITY;
        let p0 = reset_position(&anchor, Vec3::ZERO, Vec3::Y, 0.125, 0);
        let p3 = reset_position(&anchor, Vec3::ZERO, Vec3::Y, 0.125, 3);
        assert_eq!(p0, Vec3::ZERO);
        assert!((p3 - Vec3::new(0.0, 0.375, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_velocity_zero_at_equilibrium_without_gravity() {
        let config = SimConfig {
            gravity: Vec3::ZERO,
            ..config()
        };
        // At exact rest spacing with zero velocity the net force vanishes.
        let parent = Vec3::ZERO;
        let position = Vec3::new(0.0, -0.125, 0.0);
        let v = integrate_velocity(position, Vec3::ZERO, parent, 0.125, &config, 0.005);
        assert!(v.length() < 1e-6);
    }

    #[test]
    fn test_velocity_update_matches_semi_implicit_euler() {
        let config = SimConfig {
            spring: 100.0,
            damping: 10.0,
            gravity: Vec3::new(0.0, -8.0, 0.0),
            ..config()
        };
        let parent = Vec3::ZERO;
        let position = Vec3::new(0.0, -0.2, 0.0);
        let velocity = Vec3::new(0.1, 0.0, 0.0);
        let dt = 0.01;

        // Target sits at rest length along the stretched direction.
        let target = Vec3::new(0.0, -0.1, 0.0);
        let expected = velocity
            + (config.spring * (target - position) - config.damping * velocity + config.gravity)
                * dt;
        let v = integrate_velocity(position, velocity, parent, 0.1, &config, dt);
        assert!((v - expected).length() < 1e-6);
    }

    #[test]
    fn test_position_update() {
        let p = integrate_position(Vec3::ONE, Vec3::new(0.0, 2.0, 0.0), 0.5);
        assert_eq!(p, Vec3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_coincident_segment_falls_along_gravity() {
        let config = SimConfig {
            gravity: Vec3::new(0.0, -8.0, 0.0),
            damping: 0.0,
            ..config()
        };
        // Parent and child coincide; the rest target must pick the
        // gravity direction instead of producing NaN.
        let v = integrate_velocity(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, 0.1, &config, 0.01);
        assert!(v.is_finite());
        assert!(v.y < 0.0);
    }

    #[test]
    fn test_frame_is_orthonormal_and_tangent_aligned() {
        let tangent = Vec3::new(1.0, 1.0, 0.0).normalize();
        let basis = frame_from_tangent(tangent, Vec3::Y);
        let x = basis * Vec3::X;
        let y = basis * Vec3::Y;
        let z = basis * Vec3::Z;
        assert!((y - tangent).length() < 1e-5);
        assert!(x.dot(y).abs() < 1e-5);
        assert!((x.cross(y) - z).length() < 1e-5);
    }

    #[test]
    fn test_frame_degenerate_up_reference() {
        // up_ref parallel to the tangent must still give a valid frame.
        let basis = frame_from_tangent(Vec3::Y, Vec3::Y);
        let y = basis * Vec3::Y;
        assert!((y - Vec3::Y).length() < 1e-5);
        assert!(basis.is_finite());
    }

    #[test]
    fn test_basis_normal_continuity() {
        let prev = frame_from_tangent(Vec3::Y, Vec3::Z);
        // Slightly bent strand: the new normal should stay close to the
        // previous one rather than snapping to the up reference.
        let next = compute_basis(
            prev,
            Vec3::ZERO,
            Vec3::new(0.05, 1.0, 0.0).normalize(),
            Vec3::X,
        );
        let prev_normal = prev * Vec3::X;
        let new_normal = next * Vec3::X;
        assert!(prev_normal.dot(new_normal) > 0.99);
    }
}
