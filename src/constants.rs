//! Numeric constants shared by the session and the gauge.

/// Degrees in a full turn.
pub const FULL_TURN_DEGREES: f32 = 360.0;

/// Degrees in half a turn; the bound of the shortest angular delta.
pub const HALF_TURN_DEGREES: f32 = 180.0;

/// Screen angle 0 points along +x. Subtracting this offset puts compass
/// north at the top of the dial.
pub const NORTH_UP_OFFSET_DEGREES: f32 = 90.0;

/// Tolerance for countdown comparisons, in seconds.
/// A countdown within this distance of zero counts as expired, so a run of
/// frame deltas that sums to exactly the countdown length does not need an
/// extra frame to trigger the transition. Bounded by the f32 rounding of a
/// few hundred summed frame deltas, and far below one frame.
pub const COUNTDOWN_EPSILON_SECS: f32 = 1e-4;
