//! Facing-cone checks on the horizontal plane.
//!
//! Headings are radians counter-clockwise from +X; cone half-angles are in
//! degrees, matching the host's combat hit cone setting.

use glam::{Vec2, Vec3};

/// Signed angle in degrees from a subject's facing to a target point.
///
/// Positive when the target is counter-clockwise (to the left) of the facing
/// direction, negative to the right, in `[-180, 180]`. A target at the
/// subject's own position yields `0.0`.
///
/// # Example
///
/// ```
/// use riposte_core::geometry::heading_angle;
/// use glam::Vec3;
///
/// // Facing +X, target straight ahead.
/// let angle = heading_angle(0.0, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
/// assert!(angle.abs() < 1e-4);
///
/// // Facing +X, target on +Y (to the left).
/// let angle = heading_angle(0.0, Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0));
/// assert!((angle - 90.0).abs() < 1e-3);
/// ```
#[must_use]
pub fn heading_angle(subject_heading: f32, subject_position: Vec3, target_position: Vec3) -> f32 {
    let facing = Vec2::from_angle(subject_heading);
    let to_target = (target_position - subject_position).truncate();
    facing
        .perp_dot(to_target)
        .atan2(facing.dot(to_target))
        .to_degrees()
}

/// Returns true if `target_position` lies within `half_angle` degrees of the
/// subject's facing, bounds inclusive.
#[must_use]
pub fn within_facing_cone(
    subject_heading: f32,
    subject_position: Vec3,
    target_position: Vec3,
    half_angle: f32,
) -> bool {
    let angle = heading_angle(subject_heading, subject_position, target_position);
    (-half_angle..=half_angle).contains(&angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn target_behind_is_outside() {
        assert!(!within_facing_cone(0.0, Vec3::ZERO, Vec3::new(-5.0, 0.0, 0.0), 35.0));
    }

    #[test]
    fn target_ahead_is_inside() {
        assert!(within_facing_cone(0.0, Vec3::ZERO, Vec3::new(5.0, 1.0, 0.0), 35.0));
    }

    #[test]
    fn vertical_offset_is_ignored() {
        assert!(within_facing_cone(0.0, Vec3::ZERO, Vec3::new(5.0, 0.0, 300.0), 1.0));
    }

    #[test]
    fn heading_rotates_the_cone() {
        let target = Vec3::new(0.0, 10.0, 0.0);
        assert!(within_facing_cone(FRAC_PI_2, Vec3::ZERO, target, 10.0));
        assert!(!within_facing_cone(0.0, Vec3::ZERO, target, 10.0));
    }

    #[test]
    fn right_side_is_negative() {
        let angle = heading_angle(0.0, Vec3::ZERO, Vec3::new(0.0, -10.0, 0.0));
        assert!((angle + 90.0).abs() < 1e-3);
    }

    #[test]
    fn coincident_target_is_inside() {
        assert!(within_facing_cone(1.0, Vec3::ONE, Vec3::ONE, 0.0));
    }

    #[test]
    fn zero_half_angle_admits_only_dead_ahead() {
        assert!(within_facing_cone(0.0, Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), 0.0));
        assert!(!within_facing_cone(0.0, Vec3::ZERO, Vec3::new(3.0, 0.1, 0.0), 0.0));
    }

    proptest! {
        #[test]
        fn cone_is_symmetric(
            heading in -PI..PI,
            offset in 0.5f32..170.0,
            distance in 1.0f32..1000.0,
        ) {
            let half_angle = 35.0;
            let left = Vec2::from_angle(heading + offset.to_radians()) * distance;
            let right = Vec2::from_angle(heading - offset.to_radians()) * distance;

            let inside_left = within_facing_cone(heading, Vec3::ZERO, left.extend(0.0), half_angle);
            let inside_right =
                within_facing_cone(heading, Vec3::ZERO, right.extend(0.0), half_angle);

            // Stay clear of the boundary where rounding decides.
            prop_assume!((offset - half_angle).abs() > 0.01);
            prop_assert_eq!(inside_left, inside_right);
            prop_assert_eq!(inside_left, offset < half_angle);
        }
    }
}
