//! Conversions between Euler angles, quaternions and rotation matrices.
//!
//! All angles are in radians. None of these functions fail on finite input:
//! unknown orders fall back to identity, unknown axis characters are skipped
//! and the `asin` argument is clamped into its domain at the gimbal-lock
//! boundary.

use crate::types::{Axis, EulerAngles, RotationOrder};
use glam::{DMat3, DQuat};
use thiserror::Error;

/// Norm below which a quaternion cannot be normalized.
pub const MIN_QUATERNION_NORM: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RotationError {
    #[error("Quaternion norm {norm:e} is too small to normalize")]
    DegenerateQuaternion { norm: f64 },
}

/// Euler angles to quaternion using the yaw-pitch-roll half-angle products.
///
/// Only the "XYZ" and "ZYX" orders reach the formula, and both produce the
/// same result. Every other order string yields the identity quaternion.
/// The result is not normalized.
pub fn euler_to_quaternion(angles: EulerAngles, order: &str) -> DQuat {
    if !matches!(order, "XYZ" | "ZYX") {
        return DQuat::IDENTITY;
    }

    let (sr, cr) = (angles.roll * 0.5).sin_cos();
    let (sp, cp) = (angles.pitch * 0.5).sin_cos();
    let (sy, cy) = (angles.yaw * 0.5).sin_cos();

    let w = cr * cp * cy + sr * sp * sy;
    let x = sr * cp * cy - cr * sp * sy;
    let y = cr * sp * cy + sr * cp * sy;
    let z = cr * cp * sy - sr * sp * cy;

    DQuat::from_xyzw(x, y, z, w)
}

/// Quaternion to roll/pitch/yaw with atan2/asin extraction.
///
/// The pitch argument is clamped to [-1, 1], so floating-point overshoot at
/// ±90° saturates to ±π/2 instead of producing NaN. The input is not checked
/// for unit length.
pub fn quaternion_to_euler(q: DQuat) -> EulerAngles {
    let DQuat { x, y, z, w } = q;

    let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
    let pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin();
    let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));

    EulerAngles::new(roll, pitch, yaw)
}

/// Compose Rx(roll), Ry(pitch), Rz(yaw) by right-multiplication in the
/// order the axis letters appear in `order`.
///
/// Characters other than 'X', 'Y' and 'Z' leave the accumulator unchanged.
pub fn euler_to_matrix(angles: EulerAngles, order: &str) -> DMat3 {
    order
        .chars()
        .filter_map(Axis::from_char)
        .fold(DMat3::IDENTITY, |acc, axis| acc * axis_matrix(axis, angles.get(axis)))
}

/// Euler angles to quaternion, composed in `order` the same way
/// [`euler_to_matrix`] composes matrices.
///
/// For [`RotationOrder::ZYX`] this is identical to [`euler_to_quaternion`].
pub fn euler_to_quaternion_ordered(angles: EulerAngles, order: RotationOrder) -> DQuat {
    order
        .axes()
        .into_iter()
        .fold(DQuat::IDENTITY, |acc, axis| acc * axis_quaternion(axis, angles.get(axis)))
}

/// Inverse of [`euler_to_quaternion_ordered`].
///
/// The middle angle of the sequence comes from a clamped `asin`; the outer two
/// from atan2. For [`RotationOrder::ZYX`] this matches [`quaternion_to_euler`].
pub fn quaternion_to_euler_ordered(q: DQuat, order: RotationOrder) -> EulerAngles {
    let m = rotation_elements(q);
    let asin = |v: f64| v.clamp(-1.0, 1.0).asin();

    match order {
        RotationOrder::XYZ => EulerAngles::new(
            (-m[1][2]).atan2(m[2][2]),
            asin(m[0][2]),
            (-m[0][1]).atan2(m[0][0]),
        ),
        RotationOrder::ZYX => EulerAngles::new(
            m[2][1].atan2(m[2][2]),
            asin(-m[2][0]),
            m[1][0].atan2(m[0][0]),
        ),
        RotationOrder::YXZ => EulerAngles::new(
            asin(-m[1][2]),
            m[0][2].atan2(m[2][2]),
            m[1][0].atan2(m[1][1]),
        ),
        RotationOrder::ZXY => EulerAngles::new(
            asin(m[2][1]),
            (-m[2][0]).atan2(m[2][2]),
            (-m[0][1]).atan2(m[1][1]),
        ),
    }
}

/// Scale a quaternion to unit length.
pub fn normalize_quaternion(q: DQuat) -> Result<DQuat, RotationError> {
    let norm = q.length();
    if !(norm >= MIN_QUATERNION_NORM) {
        return Err(RotationError::DegenerateQuaternion { norm });
    }
    Ok(q / norm)
}

/// Most decimal places an f64 can carry meaningfully.
pub const MAX_DECIMALS: u32 = 15;

/// Round to a fixed number of decimal places, at most [`MAX_DECIMALS`].
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
    (value * factor).round() / factor
}

fn axis_matrix(axis: Axis, angle: f64) -> DMat3 {
    match axis {
        Axis::X => DMat3::from_rotation_x(angle),
        Axis::Y => DMat3::from_rotation_y(angle),
        Axis::Z => DMat3::from_rotation_z(angle),
    }
}

fn axis_quaternion(axis: Axis, angle: f64) -> DQuat {
    match axis {
        Axis::X => DQuat::from_rotation_x(angle),
        Axis::Y => DQuat::from_rotation_y(angle),
        Axis::Z => DQuat::from_rotation_z(angle),
    }
}

/// Row-major rotation matrix of `q`, written in the `1 - 2(..)` form so that
/// non-unit input degrades the same way as [`quaternion_to_euler`].
fn rotation_elements(q: DQuat) -> [[f64; 3]; 3] {
    let DQuat { x, y, z, w } = q;
    [
        [
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - w * z),
            2.0 * (x * z + w * y),
        ],
        [
            2.0 * (x * y + w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - w * x),
        ],
        [
            2.0 * (x * z - w * y),
            2.0 * (y * z + w * x),
            1.0 - 2.0 * (x * x + y * y),
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-6;

    fn assert_angles_close(actual: EulerAngles, expected: EulerAngles) {
        assert!(
            (actual.roll - expected.roll).abs() < EPS
                && (actual.pitch - expected.pitch).abs() < EPS
                && (actual.yaw - expected.yaw).abs() < EPS,
            "{actual:?} != {expected:?}"
        );
    }

    fn assert_matrix_close(a: DMat3, b: DMat3) {
        assert!(a.abs_diff_eq(b, EPS), "{a:?} != {b:?}");
    }

    fn deg(roll: f64, pitch: f64, yaw: f64) -> EulerAngles {
        EulerAngles::new(roll, pitch, yaw).map(f64::to_radians)
    }

    #[test]
    fn zero_angles_give_identity() {
        assert_eq!(euler_to_quaternion(EulerAngles::ZERO, "XYZ"), DQuat::IDENTITY);
    }

    #[test]
    fn unknown_order_gives_identity() {
        let angles = EulerAngles::new(0.4, -1.2, 2.5);
        assert_eq!(euler_to_quaternion(angles, "BOGUS"), DQuat::IDENTITY);
        assert_eq!(euler_to_quaternion(angles, ""), DQuat::IDENTITY);
        // Valid selector values outside the formula branch also fall through.
        assert_eq!(euler_to_quaternion(angles, "YXZ"), DQuat::IDENTITY);
        assert_eq!(euler_to_quaternion(angles, "ZXY"), DQuat::IDENTITY);
    }

    #[test]
    fn xyz_and_zyx_share_one_formula() {
        let angles = deg(30.0, 45.0, 60.0);
        assert_eq!(euler_to_quaternion(angles, "XYZ"), euler_to_quaternion(angles, "ZYX"));
    }

    #[test]
    fn roll_of_ninety_degrees() {
        let q = euler_to_quaternion(deg(90.0, 0.0, 0.0), "XYZ");
        assert!((q.x - 0.70710678).abs() < 1e-8);
        assert!(q.y.abs() < 1e-12);
        assert!(q.z.abs() < 1e-12);
        assert!((q.w - 0.70710678).abs() < 1e-8);

        let back = quaternion_to_euler(q).map(f64::to_degrees);
        assert!((back.roll - 90.0).abs() < 1e-6);
        assert!(back.pitch.abs() < 1e-6);
        assert!(back.yaw.abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped_at_gimbal_lock() {
        // sqrt(0.5)^2 rounds up, so 2(wy - zx) lands just above 1.
        let h = 0.7071067811865476;
        let q = DQuat::from_xyzw(0.0, h, 0.0, h);
        assert!(2.0 * (q.w * q.y - q.z * q.x) > 1.0);
        let e = quaternion_to_euler(q);
        assert!((e.pitch - FRAC_PI_2).abs() < 1e-12);

        // Non-unit input far outside the domain saturates too.
        let e = quaternion_to_euler(DQuat::from_xyzw(0.0, -1.0, 0.0, 1.0));
        assert!((e.pitch + FRAC_PI_2).abs() < 1e-12);
        assert!(!e.roll.is_nan() && !e.yaw.is_nan());
    }

    #[test]
    fn composition_order_matters_for_matrices_only() {
        let angles = deg(30.0, 45.0, 60.0);
        let xyz = euler_to_matrix(angles, "XYZ");
        let zyx = euler_to_matrix(angles, "ZYX");
        assert!(!xyz.abs_diff_eq(zyx, 1e-3));

        // The legacy quaternion ignores the order.
        assert_eq!(euler_to_quaternion(angles, "XYZ"), euler_to_quaternion(angles, "ZYX"));
    }

    #[test]
    fn unknown_axis_characters_are_skipped() {
        let angles = deg(30.0, 45.0, 60.0);
        assert_matrix_close(euler_to_matrix(angles, "X-Y?Z"), euler_to_matrix(angles, "XYZ"));
        assert_eq!(euler_to_matrix(angles, "BOGUS"), DMat3::IDENTITY);
        assert_eq!(euler_to_matrix(angles, "xyz"), DMat3::IDENTITY);
    }

    #[test]
    fn single_axis_matrix_rotates_basis() {
        let r = euler_to_matrix(deg(0.0, 0.0, 90.0), "XYZ");
        let x = r * glam::DVec3::X;
        assert!(x.abs_diff_eq(glam::DVec3::Y, EPS));
    }

    #[test]
    fn ordered_quaternion_matches_matrix_for_every_order() {
        let angles = EulerAngles::new(0.3, -0.4, 1.1);
        for order in RotationOrder::ALL {
            let q = euler_to_quaternion_ordered(angles, order);
            assert_matrix_close(DMat3::from_quat(q), euler_to_matrix(angles, order.as_str()));
            assert_angles_close(quaternion_to_euler_ordered(q, order), angles);
        }
    }

    #[test]
    fn ordered_zyx_matches_legacy_formula() {
        let angles = deg(30.0, 45.0, 60.0);
        let ordered = euler_to_quaternion_ordered(angles, RotationOrder::ZYX);
        assert!(ordered.abs_diff_eq(euler_to_quaternion(angles, "ZYX"), 1e-12));
        assert_angles_close(
            quaternion_to_euler_ordered(ordered, RotationOrder::ZYX),
            quaternion_to_euler(ordered),
        );
    }

    #[test]
    fn ordered_xyz_differs_from_legacy() {
        let angles = deg(30.0, 45.0, 60.0);
        let ordered = euler_to_quaternion_ordered(angles, RotationOrder::XYZ);
        assert!((ordered.x - 0.3919038373291199).abs() < 1e-9);
        assert!((ordered.w - 0.7233174113647118).abs() < 1e-9);
        assert!(!ordered.abs_diff_eq(euler_to_quaternion(angles, "XYZ"), 1e-3));
    }

    #[test]
    fn normalize_scales_to_unit_length() {
        let q = normalize_quaternion(DQuat::from_xyzw(0.0, 0.0, 2.0, 2.0)).unwrap();
        assert!((q.length() - 1.0).abs() < 1e-12);
        assert!((q.z - q.w).abs() < 1e-12);
    }

    #[test]
    fn normalize_rejects_zero_quaternion() {
        let err = normalize_quaternion(DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, RotationError::DegenerateQuaternion { norm: 0.0 });
    }

    #[test]
    fn rounding_to_six_places() {
        assert_eq!(round_to(0.7071067811865476, 6), 0.707107);
        assert_eq!(round_to(-1.23456749, 6), -1.234567);
        assert_eq!(round_to(2.0, 6), 2.0);
    }

    #[test]
    fn rounding_caps_decimal_places() {
        assert_eq!(round_to(0.5, u32::MAX), 0.5);
        assert_eq!(round_to(0.0, 400), 0.0);
        assert_eq!(round_to(0.7071067811865476, 40), round_to(0.7071067811865476, MAX_DECIMALS));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const SAFE_PITCH: f64 = FRAC_PI_2 - 1e-3;

        fn any_order() -> impl Strategy<Value = RotationOrder> {
            prop::sample::select(RotationOrder::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn round_trip_away_from_gimbal_lock(
                roll in -PI + 1e-6..PI - 1e-6,
                pitch in -SAFE_PITCH..SAFE_PITCH,
                yaw in -PI + 1e-6..PI - 1e-6,
            ) {
                let angles = EulerAngles::new(roll, pitch, yaw);
                let back = quaternion_to_euler(euler_to_quaternion(angles, "XYZ"));
                prop_assert!((back.roll - roll).abs() < EPS, "{back:?} != {angles:?}");
                prop_assert!((back.pitch - pitch).abs() < EPS, "{back:?} != {angles:?}");
                prop_assert!((back.yaw - yaw).abs() < EPS, "{back:?} != {angles:?}");
            }

            #[test]
            fn matrices_are_proper_rotations(
                roll in -1e3f64..1e3,
                pitch in -1e3f64..1e3,
                yaw in -1e3f64..1e3,
                order in any_order(),
            ) {
                let r = euler_to_matrix(EulerAngles::new(roll, pitch, yaw), order.as_str());
                prop_assert!((r.transpose() * r).abs_diff_eq(DMat3::IDENTITY, EPS));
                prop_assert!((r.determinant() - 1.0).abs() < EPS);
            }

            #[test]
            fn ordered_round_trip_for_every_order(
                first in -PI + 1e-6..PI - 1e-6,
                middle in -SAFE_PITCH..SAFE_PITCH,
                last in -PI + 1e-6..PI - 1e-6,
                order in any_order(),
            ) {
                // The middle axis of the sequence carries the gimbal-lock limit.
                let [a, b, c] = order.axes();
                let mut angles = EulerAngles::ZERO;
                angles.set(a, first);
                angles.set(b, middle);
                angles.set(c, last);

                let q = euler_to_quaternion_ordered(angles, order);
                prop_assert!(DMat3::from_quat(q).abs_diff_eq(euler_to_matrix(angles, order.as_str()), EPS));

                let back = quaternion_to_euler_ordered(q, order);
                for axis in Axis::ALL {
                    prop_assert!(
                        (back.get(axis) - angles.get(axis)).abs() < EPS,
                        "{order}: {back:?} != {angles:?}"
                    );
                }
            }
        }
    }
}
