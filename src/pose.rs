//! Face-to-object pose estimation.
//!
//! Derives the rigid transform for the eyewear model from three world-space
//! anchor points: the two eye outer corners and the nose bridge. Only the
//! in-plane tilt of the eye line is matched; pitch/yaw correction from full
//! 3D head pose is out of scope.

use glam::Vec3;

/// Base multiplier calibrating the model's reference width against
/// horizontal eye separation.
pub const BASE_SCALE_FACTOR: f32 = 0.8;

/// Converts the user-facing `height_offset` knob (detector-normalized
/// units) into world-space y displacement.
pub const HEIGHT_OFFSET_UNIT: f32 = 0.001;

/// Per-frame rigid transform for the active eyewear instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World-space position; z is fixed at 0 (overlay plane)
    pub translation: Vec3,
    /// In-plane tilt in radians
    pub rotation_z: f32,
    /// Uniform scale
    pub scale: f32,
}

/// User-tunable multipliers applied on top of the derived transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitModifiers {
    /// Uniform size multiplier
    pub scale: f32,
    /// Width multiplier. Reserved for anisotropic width-only adjustment;
    /// currently applied uniformly, matching observed behavior.
    pub width: f32,
    /// Vertical nudge in detector-normalized units
    pub height_offset: f32,
}

impl Default for FitModifiers {
    fn default() -> Self {
        Self {
            scale: 1.0,
            width: 1.0,
            height_offset: 0.0,
        }
    }
}

/// Estimate the eyewear pose from the three anchor points.
///
/// Translation is the eye midpoint plus the vertical nudge. Scale is the
/// horizontal eye separation (not the full Euclidean distance; the model's
/// reference width is calibrated against horizontal separation) times the
/// base factor and both multipliers. Rotation matches the eye-line tilt.
///
/// The nose bridge is accepted but unused by the baseline math; it is
/// reserved for depth-aware placement.
///
/// Degenerate input where both eyes coincide yields `scale == 0`; callers
/// must skip applying such a pose to keep the previous frame's transform.
pub fn estimate(
    left_eye: Vec3,
    right_eye: Vec3,
    _nose_bridge: Vec3,
    modifiers: &FitModifiers,
) -> Pose {
    let center_x = (left_eye.x + right_eye.x) / 2.0;
    let center_y =
        (left_eye.y + right_eye.y) / 2.0 + modifiers.height_offset * HEIGHT_OFFSET_UNIT;

    let eye_distance = (right_eye.x - left_eye.x).abs();
    let scale = eye_distance * BASE_SCALE_FACTOR * modifiers.scale * modifiers.width;

    let rotation_z = (right_eye.y - left_eye.y).atan2(right_eye.x - left_eye.x);

    Pose {
        translation: Vec3::new(center_x, center_y, 0.0),
        rotation_z,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    const EPS: f32 = 1e-6;

    fn default_mods() -> FitModifiers {
        FitModifiers::default()
    }

    #[test]
    fn test_level_eyes_center_translation() {
        let pose = estimate(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
            &default_mods(),
        );
        assert!(pose.translation.x.abs() < EPS);
        assert!(pose.translation.y.abs() < EPS);
        assert!(pose.translation.z.abs() < EPS);
        assert!(pose.rotation_z.abs() < EPS);
    }

    #[test]
    fn test_rotation_sign_convention() {
        // Right eye above-right of left eye tilts by +pi/4
        let pose = estimate(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::ZERO,
            &default_mods(),
        );
        assert!((pose.rotation_z - FRAC_PI_4).abs() < EPS);
    }

    #[test]
    fn test_scale_uses_horizontal_separation_only() {
        // Vertical offset between the eyes must not affect scale
        let level = estimate(
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::ZERO,
            &default_mods(),
        );
        let tilted = estimate(
            Vec3::new(-0.5, -0.3, 0.0),
            Vec3::new(0.5, 0.3, 0.0),
            Vec3::ZERO,
            &default_mods(),
        );
        assert!((level.scale - tilted.scale).abs() < EPS);
        assert!((level.scale - 1.0 * BASE_SCALE_FACTOR).abs() < EPS);
    }

    #[test]
    fn test_zero_eye_distance_degenerates_to_zero_scale() {
        let p = Vec3::new(0.2, -0.1, 0.0);
        let pose = estimate(p, p, Vec3::ZERO, &default_mods());
        assert_eq!(pose.scale, 0.0);
    }

    #[test]
    fn test_modifiers_multiply() {
        let mods = FitModifiers {
            scale: 2.0,
            width: 1.5,
            height_offset: 0.0,
        };
        let pose = estimate(
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::ZERO,
            &mods,
        );
        assert!((pose.scale - 1.0 * BASE_SCALE_FACTOR * 2.0 * 1.5).abs() < EPS);
    }

    #[test]
    fn test_height_offset_nudges_y_only() {
        let mods = FitModifiers {
            scale: 1.0,
            width: 1.0,
            height_offset: 10.0,
        };
        let pose = estimate(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
            &mods,
        );
        assert!(pose.translation.x.abs() < EPS);
        assert!((pose.translation.y - 10.0 * HEIGHT_OFFSET_UNIT).abs() < EPS);
    }

    #[test]
    fn test_nose_bridge_does_not_affect_baseline() {
        let a = estimate(
            Vec3::new(-0.4, 0.1, 0.0),
            Vec3::new(0.4, 0.2, 0.0),
            Vec3::new(0.0, 0.3, -0.5),
            &default_mods(),
        );
        let b = estimate(
            Vec3::new(-0.4, 0.1, 0.0),
            Vec3::new(0.4, 0.2, 0.0),
            Vec3::new(9.0, -9.0, 9.0),
            &default_mods(),
        );
        assert_eq!(a, b);
    }
}
