use num_complex::Complex32;

use crate::constants::{FULL_TURN_DEGREES, HALF_TURN_DEGREES};

/// Signed shortest distance from angle `from` to angle `to`, in degrees
///
/// The result lies in (-180, 180], so stepping from `from` by the result
/// always follows the shorter arc. Inputs may be any finite angle.
pub fn shortest_angular_delta(from: f32, to: f32) -> f32 {
    let diff = (to - from).rem_euclid(FULL_TURN_DEGREES);
    if diff > HALF_TURN_DEGREES {
        diff - FULL_TURN_DEGREES
    } else {
        diff
    }
}

/// Normalize an unwrapped angle into [0, 360)
pub fn normalize_degrees(degrees: f32) -> f32 {
    let normalized = degrees.rem_euclid(FULL_TURN_DEGREES);
    if normalized >= FULL_TURN_DEGREES {
        0.0
    } else {
        normalized
    }
}

/// Project a polar coordinate onto the plane
///
/// Screen convention: angle 0 points along +x and positive angles turn
/// towards +y. Returns `(x, y)` relative to the pole.
pub fn polar_to_cartesian(radius: f32, angle_degrees: f32) -> (f32, f32) {
    let z = Complex32::from_polar(radius, angle_degrees.to_radians());
    (z.re, z.im)
}

/// Circular mean of a set of angles in degrees, in [0, 360)
///
/// Returns `None` for an empty input or when the angles cancel out.
pub fn circular_mean_degrees(angles: impl IntoIterator<Item = f32>) -> Option<f32> {
    let sum: Complex32 = angles
        .into_iter()
        .map(|a| Complex32::from_polar(1.0, a.to_radians()))
        .sum();
    if sum.norm() < 1e-6 {
        return None;
    }
    Some(normalize_degrees(sum.arg().to_degrees()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_shortest_delta_identity() {
        for a in [-720.0, -359.0, -1.0, 0.0, 1.0, 90.0, 359.0, 1234.5] {
            assert_abs_diff_eq!(shortest_angular_delta(a, a), 0.0);
        }
    }

    #[test]
    fn test_shortest_delta_wraps() {
        assert_abs_diff_eq!(shortest_angular_delta(359.0, 1.0), 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(shortest_angular_delta(1.0, 359.0), -2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(shortest_angular_delta(0.0, 90.0), 90.0, epsilon = 1e-4);
        assert_abs_diff_eq!(shortest_angular_delta(0.0, 270.0), -90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_shortest_delta_half_turn_is_positive() {
        assert_abs_diff_eq!(shortest_angular_delta(0.0, 180.0), 180.0, epsilon = 1e-4);
        assert_abs_diff_eq!(shortest_angular_delta(180.0, 0.0), 180.0, epsilon = 1e-4);
    }

    #[test]
    fn test_shortest_delta_unwrapped_inputs() {
        // Smoothed angles drift past 360; the delta still uses the short arc
        assert_abs_diff_eq!(shortest_angular_delta(721.0, 359.0), -2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(shortest_angular_delta(-350.0, 5.0), -5.0, epsilon = 1e-3);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_abs_diff_eq!(normalize_degrees(370.0), 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(normalize_degrees(-10.0), 350.0, epsilon = 1e-4);
        assert_abs_diff_eq!(normalize_degrees(0.0), 0.0);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let (x, y) = polar_to_cartesian(10.0, 0.0);
        assert_abs_diff_eq!(x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-4);

        let (x, y) = polar_to_cartesian(10.0, -90.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(y, -10.0, epsilon = 1e-4);

        let (x, y) = polar_to_cartesian(0.0, 123.0);
        assert_abs_diff_eq!(x, 0.0);
        assert_abs_diff_eq!(y, 0.0);
    }

    #[test]
    fn test_circular_mean() {
        let mean = circular_mean_degrees([350.0, 10.0]).unwrap();
        assert!(mean < 0.01 || mean > 359.99, "mean {} should be north", mean);

        let mean = circular_mean_degrees([80.0, 100.0]).unwrap();
        assert_abs_diff_eq!(mean, 90.0, epsilon = 1e-3);

        assert!(circular_mean_degrees([0.0, 180.0]).is_none());
        assert!(circular_mean_degrees(std::iter::empty()).is_none());
    }
}
