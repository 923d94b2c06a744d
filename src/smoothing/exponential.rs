use super::math::shortest_angular_delta;

/// Exponential smoothing filter for scalar readings
///
/// Each update moves the smoothed value a fixed fraction of the way towards
/// the new input: `value' = weight * input + (1 - weight) * value`. The result
/// is always a convex combination of the previous value and the input, so a
/// single step never overshoots either of them.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialSmoother {
    weight: f32,
    value: f32,
}

impl ExponentialSmoother {
    /// Create a new smoother starting at zero
    ///
    /// # Arguments
    /// * `weight` - Fraction of the input taken per update, in (0, 1)
    ///   (larger = faster response, less smoothing)
    pub fn new(weight: f32) -> Self {
        Self::with_initial(weight, 0.0)
    }

    pub fn with_initial(weight: f32, value: f32) -> Self {
        Self { weight, value }
    }

    /// Fold a new input into the smoothed value and return it
    pub fn update(&mut self, input: f32) -> f32 {
        self.value = self.weight * input + (1.0 - self.weight) * self.value;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Exponential smoothing for angles in degrees
///
/// The smoothed angle advances by `weight` times the shortest signed arc to
/// the input, so an input that wraps from 359° to 1° moves the output by a
/// fraction of 2° instead of swinging back through 358°. The output is left
/// unwrapped and may drift outside [0, 360).
#[derive(Debug, Clone, Copy)]
pub struct AngularSmoother {
    weight: f32,
    value: f32,
}

impl AngularSmoother {
    pub fn new(weight: f32) -> Self {
        Self::with_initial(weight, 0.0)
    }

    pub fn with_initial(weight: f32, value: f32) -> Self {
        Self { weight, value }
    }

    pub fn update(&mut self, input: f32) -> f32 {
        self.value += shortest_angular_delta(self.value, input) * self.weight;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_exponential_sequence() {
        let mut smoother = ExponentialSmoother::new(0.1);

        assert_abs_diff_eq!(smoother.update(10.0), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(smoother.update(10.0), 1.9, epsilon = 1e-5);
        assert_abs_diff_eq!(smoother.update(10.0), 2.71, epsilon = 1e-5);
    }

    #[test]
    fn test_exponential_is_convex_step() {
        let inputs = [3.0, -1.0, 42.0, 0.0, 7.5, 7.5, 100.0, 0.25];
        for weight in [0.01, 0.1, 0.5, 0.9, 0.99] {
            let mut smoother = ExponentialSmoother::with_initial(weight, 5.0);
            for &input in &inputs {
                let previous = smoother.value();
                let next = smoother.update(input);
                let lo = previous.min(input) - 1e-4;
                let hi = previous.max(input) + 1e-4;
                assert!(
                    next >= lo && next <= hi,
                    "weight {}: {} escaped [{}, {}]",
                    weight,
                    next,
                    lo,
                    hi
                );
            }
        }
    }

    #[test]
    fn test_angular_wraps_forward() {
        let mut smoother = AngularSmoother::with_initial(0.5, 359.0);
        let value = smoother.update(1.0);
        assert_abs_diff_eq!(value, 360.0, epsilon = 1e-4);
    }

    #[test]
    fn test_angular_stays_continuous_across_wrap() {
        let mut smoother = AngularSmoother::with_initial(0.1, 350.0);
        let mut previous = smoother.value();
        for input in [355.0, 0.0, 5.0, 10.0, 15.0, 20.0] {
            let value = smoother.update(input);
            // Each step moves at most weight * 180 degrees
            assert!((value - previous).abs() <= 18.0 + 1e-4);
            previous = value;
        }
        assert!(previous > 350.0, "expected forward motion past 360, got {}", previous);
    }
}
