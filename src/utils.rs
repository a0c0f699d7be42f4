//! Scalar and angle helpers shared by the estimator, smoother and animator.

use std::f64::consts::{PI, TAU};

/// Linear interpolation from `a` toward `b` by `t`
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    t.mul_add(b - a, a)
}

/// Wrap an angle in radians into (-π, π]
///
/// Non-finite input is returned unchanged.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Shortest signed rotation taking `from` onto `to`, in [-π, π]
#[must_use]
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    let delta = to - from;
    delta.sin().atan2(delta.cos())
}

/// Clamp to [0, 1], mapping NaN to 0
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
        assert_eq!(lerp(10.0, 20.0, 0.25), 12.5);
    }

    #[test]
    fn test_wrap_angle_boundaries() {
        assert!((wrap_angle(PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
        assert!(wrap_angle(TAU).abs() < 1e-12);
        assert!((wrap_angle(PI + 0.1) - (-PI + 0.1)).abs() < 1e-12);
        assert!(wrap_angle(f64::NAN).is_nan());
    }

    #[test]
    fn test_shortest_angle_delta_across_seam() {
        let delta = shortest_angle_delta(PI - 0.01, -PI + 0.01);
        assert!((delta - 0.02).abs() < 1e-9);

        let delta = shortest_angle_delta(-PI + 0.01, PI - 0.01);
        assert!((delta + 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(0.3), 0.3);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn prop_wrap_angle_in_half_open_range(angle in -1000.0f64..1000.0) {
            let wrapped = wrap_angle(angle);
            prop_assert!(wrapped > -PI);
            prop_assert!(wrapped <= PI);
            // Same direction as the input
            prop_assert!((wrapped.sin() - angle.sin()).abs() < 1e-6);
            prop_assert!((wrapped.cos() - angle.cos()).abs() < 1e-6);
        }

        #[test]
        fn prop_shortest_delta_bounded(from in -10.0f64..10.0, to in -10.0f64..10.0) {
            let delta = shortest_angle_delta(from, to);
            prop_assert!(delta.abs() <= PI + 1e-12);
            let landed = from + delta;
            prop_assert!((landed.sin() - to.sin()).abs() < 1e-6);
            prop_assert!((landed.cos() - to.cos()).abs() < 1e-6);
        }
    }
}
