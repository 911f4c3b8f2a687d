//! Timer and Easing Primitives
//!
//! Wall-clock timing for the boot choreography and the warp overlay.
//! Time never flows on its own here: the host advances every timer by the
//! delta it measured since the previous frame, which keeps the schedule
//! exact at any tick granularity and fully deterministic under test.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Easing functions for fades
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EasingFunction {
    /// No easing (constant speed)
    #[default]
    Linear,

    /// Slow start and end
    EaseInOut,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Lifecycle of a [`PhaseTimer`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    /// Counting down
    Armed,
    /// Expired; the expiry was reported exactly once
    Fired,
    /// Cancelled before expiry; will never fire
    Cancelled,
}

/// A one-shot, cancellable countdown
///
/// Scheduled once, fires once, and never fires after [`PhaseTimer::cancel`].
#[derive(Clone, Debug)]
pub struct PhaseTimer {
    duration: Duration,
    elapsed: Duration,
    state: TimerState,
}

impl PhaseTimer {
    /// Arm a timer that expires after `duration`
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            state: TimerState::Armed,
        }
    }

    /// Advance the timer
    ///
    /// Returns `Some(leftover)` on the call during which the timer expires,
    /// where `leftover` is the part of `delta` not consumed by the countdown.
    /// Every other call returns `None`.
    pub fn advance(&mut self, delta: Duration) -> Option<Duration> {
        if self.state != TimerState::Armed {
            return None;
        }

        self.elapsed += delta;
        if self.elapsed >= self.duration {
            self.state = TimerState::Fired;
            let leftover = self.elapsed - self.duration;
            self.elapsed = self.duration;
            Some(leftover)
        } else {
            None
        }
    }

    /// Cancel the timer. Idempotent; a fired timer stays fired.
    pub fn cancel(&mut self) {
        if self.state == TimerState::Armed {
            self.state = TimerState::Cancelled;
        }
    }

    /// Progress towards expiry (0.0 to 1.0)
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Configured duration
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }
}
