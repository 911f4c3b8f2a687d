//! Animation System - Surface-Agnostic Timing
//!
//! Timers and fades that describe WHEN something happens on screen,
//! never HOW it is drawn. Surfaces read progress values from here and
//! translate them to their own rendering.

mod timing;

use std::time::Duration;

pub use timing::{EasingFunction, PhaseTimer, TimerState};

/// An eased opacity ramp driven by a [`PhaseTimer`]
#[derive(Clone, Debug)]
pub struct Fade {
    timer: PhaseTimer,
    easing: EasingFunction,
    from: f32,
    to: f32,
}

impl Fade {
    /// Fade from fully opaque to fully transparent
    #[must_use]
    pub fn out(duration: Duration) -> Self {
        Self {
            timer: PhaseTimer::new(duration),
            easing: EasingFunction::EaseInOut,
            from: 1.0,
            to: 0.0,
        }
    }

    /// Advance the fade; returns the leftover time once it completes
    pub fn advance(&mut self, delta: Duration) -> Option<Duration> {
        self.timer.advance(delta)
    }

    /// Stop the fade where it is
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    /// Current opacity (0.0 = invisible, 1.0 = solid)
    #[must_use]
    pub fn opacity(&self) -> f32 {
        let t = self.easing.apply(self.timer.progress());
        self.from + (self.to - self.from) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_out_endpoints() {
        let mut fade = Fade::out(Duration::from_millis(550));
        assert!((fade.opacity() - 1.0).abs() < f32::EPSILON);

        assert_eq!(fade.advance(Duration::from_millis(550)), Some(Duration::ZERO));
        assert!(fade.opacity().abs() < f32::EPSILON);
        assert_eq!(fade.advance(Duration::from_millis(16)), None);
    }

    #[test]
    fn test_fade_is_monotonic() {
        let mut fade = Fade::out(Duration::from_millis(500));
        let mut last = fade.opacity();
        for _ in 0..10 {
            fade.advance(Duration::from_millis(50));
            let now = fade.opacity();
            assert!(now <= last);
            last = now;
        }
    }
}
