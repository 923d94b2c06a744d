use std::fmt;

use serde::Serialize;

use crate::constants::COUNTDOWN_EPSILON_SECS;

/// Phase of a live measurement
///
/// A session starts in `CountingDown`. When the countdown expires it moves to
/// `Stoppable` (runs until the user stops it) or to `Cancellable` (runs a
/// fixed time, then holds at zero until the user ends it). `Finished` is only
/// reached through an external stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MeasurementState {
    CountingDown { seconds_left: f32, stoppable: bool },
    Stoppable,
    Cancellable { seconds_left: f32 },
    Finished,
}

impl MeasurementState {
    pub fn initial(countdown_secs: f32, stoppable: bool) -> Self {
        MeasurementState::CountingDown {
            seconds_left: countdown_secs,
            stoppable,
        }
    }

    /// Advance the timer by `delta_secs`
    ///
    /// `cancellable_secs` is the length of the cancellable phase entered
    /// when a non-stoppable countdown expires. The caller validates
    /// `delta_secs`.
    pub fn advance(self, delta_secs: f32, cancellable_secs: f32) -> Self {
        match self {
            MeasurementState::CountingDown {
                seconds_left,
                stoppable,
            } => {
                let remaining = seconds_left - delta_secs;
                if remaining >= COUNTDOWN_EPSILON_SECS {
                    MeasurementState::CountingDown {
                        seconds_left: remaining,
                        stoppable,
                    }
                } else if stoppable {
                    MeasurementState::Stoppable
                } else {
                    MeasurementState::Cancellable {
                        seconds_left: cancellable_secs,
                    }
                }
            }
            MeasurementState::Cancellable { seconds_left } => {
                let remaining = seconds_left - delta_secs;
                MeasurementState::Cancellable {
                    seconds_left: if remaining >= COUNTDOWN_EPSILON_SECS {
                        remaining
                    } else {
                        0.0
                    },
                }
            }
            MeasurementState::Stoppable | MeasurementState::Finished => self,
        }
    }

    /// Seconds left on the visible timer; 0 when no timer runs
    pub fn seconds_left(&self) -> f32 {
        match self {
            MeasurementState::CountingDown { seconds_left, .. }
            | MeasurementState::Cancellable { seconds_left } => *seconds_left,
            MeasurementState::Stoppable | MeasurementState::Finished => 0.0,
        }
    }

    /// True once the countdown is over and readings count towards the result
    pub fn is_measuring(&self) -> bool {
        matches!(
            self,
            MeasurementState::Stoppable | MeasurementState::Cancellable { .. }
        )
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, MeasurementState::Finished)
    }

    /// Fraction of the current timed phase that has elapsed, 0 to 1
    ///
    /// `total_secs` is the full length of the current phase. Phases without
    /// a timer report 1.
    pub fn progress(&self, total_secs: f32) -> f32 {
        match self {
            MeasurementState::CountingDown { seconds_left, .. }
            | MeasurementState::Cancellable { seconds_left } => {
                if total_secs <= 0.0 {
                    1.0
                } else {
                    (1.0 - seconds_left / total_secs).clamp(0.0, 1.0)
                }
            }
            MeasurementState::Stoppable | MeasurementState::Finished => 1.0,
        }
    }
}

/// Caption for the countdown / stop button
impl fmt::Display for MeasurementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementState::CountingDown { seconds_left, .. } => {
                write!(f, "{}", seconds_left.max(0.0).ceil() as u32)
            }
            MeasurementState::Stoppable => f.write_str("Stop"),
            MeasurementState::Cancellable { seconds_left } => {
                write!(f, "Cancel {}", seconds_left.max(0.0).ceil() as u32)
            }
            MeasurementState::Finished => f.write_str("Done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_countdown_decrements() {
        let state = MeasurementState::initial(5.0, true).advance(1.5, 30.0);
        match state {
            MeasurementState::CountingDown {
                seconds_left,
                stoppable,
            } => {
                assert_abs_diff_eq!(seconds_left, 3.5, epsilon = 1e-6);
                assert!(stoppable);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_countdown_overshoot_transitions() {
        let state = MeasurementState::initial(1.0, true).advance(2.0, 30.0);
        assert_eq!(state, MeasurementState::Stoppable);

        let state = MeasurementState::initial(1.0, false).advance(2.0, 30.0);
        assert_eq!(
            state,
            MeasurementState::Cancellable { seconds_left: 30.0 }
        );
    }

    #[test]
    fn test_cancellable_floors_at_zero() {
        let state = MeasurementState::Cancellable { seconds_left: 0.5 }.advance(2.0, 30.0);
        assert_eq!(state, MeasurementState::Cancellable { seconds_left: 0.0 });
        let state = state.advance(1.0, 30.0);
        assert_eq!(state, MeasurementState::Cancellable { seconds_left: 0.0 });
    }

    #[test]
    fn test_terminal_states_hold() {
        assert_eq!(
            MeasurementState::Stoppable.advance(10.0, 30.0),
            MeasurementState::Stoppable
        );
        assert_eq!(
            MeasurementState::Finished.advance(10.0, 30.0),
            MeasurementState::Finished
        );
    }

    #[test]
    fn test_captions() {
        assert_eq!(MeasurementState::initial(5.0, true).to_string(), "5");
        assert_eq!(
            MeasurementState::CountingDown {
                seconds_left: 4.2,
                stoppable: true
            }
            .to_string(),
            "5"
        );
        assert_eq!(MeasurementState::Stoppable.to_string(), "Stop");
        assert_eq!(
            MeasurementState::Cancellable { seconds_left: 11.3 }.to_string(),
            "Cancel 12"
        );
        assert_eq!(MeasurementState::Finished.to_string(), "Done");
    }

    #[test]
    fn test_progress() {
        let state = MeasurementState::Cancellable { seconds_left: 7.5 };
        assert_abs_diff_eq!(state.progress(30.0), 0.75, epsilon = 1e-6);
        assert_abs_diff_eq!(MeasurementState::Stoppable.progress(30.0), 1.0);
        assert_abs_diff_eq!(MeasurementState::initial(0.0, true).progress(0.0), 1.0);
    }
}
