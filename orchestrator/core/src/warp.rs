//! Warp Effect - Fixed-Duration Transition Overlay
//!
//! Wraps the accelerating [`FrameAnimator`] in a bounded run with an
//! exactly-once completion signal.
//!
//! # Lifecycle
//!
//! ```text
//! Inactive --activate()--> Running --timer expiry--> Holding
//!    ^                        |                         |
//!    +-------deactivate()-----+-------deactivate()------+
//! ```
//!
//! Each activation hands out a `oneshot` receiver. On expiry the animator
//! is stopped and its particles cleared, then the completion is sent
//! (consuming the sender, so it cannot be sent twice), then the run ends.
//! The overlay stays mounted in `Holding` until its owner deactivates it,
//! but draws nothing there; a surface that wants the final picture keeps
//! its own pixels. Deactivation drops the sender without sending, which
//! the receiver observes as `Closed`.

use std::time::Duration;

use tokio::sync::oneshot;

use crate::animation::PhaseTimer;
use crate::starfield::{FrameAnimator, StarfieldConfig};
use crate::surface::{DrawSurface, SurfaceSize};

/// Identifies one activation of the warp effect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WarpRunId(pub u64);

/// Sent once when a run's timer expires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarpCompletion {
    /// The run that completed
    pub run: WarpRunId,
    /// Time the run was on screen
    pub elapsed: Duration,
}

/// Handle returned by a fresh activation
#[derive(Debug)]
pub struct WarpActivation {
    /// The run that was started
    pub run: WarpRunId,
    /// Receives the completion for this run only
    pub completion: oneshot::Receiver<WarpCompletion>,
}

#[derive(Debug)]
enum WarpState {
    Inactive,
    Running {
        run: WarpRunId,
        timer: PhaseTimer,
        notify: Option<oneshot::Sender<WarpCompletion>>,
    },
    Holding {
        run: WarpRunId,
    },
}

/// The full-screen accelerating-particle overlay
#[derive(Debug)]
pub struct WarpEffect {
    animator: FrameAnimator,
    duration: Duration,
    size: SurfaceSize,
    state: WarpState,
    next_run: u64,
}

impl WarpEffect {
    /// Create an inactive warp effect
    #[must_use]
    pub fn new(config: StarfieldConfig, duration: Duration, seed: Option<u64>) -> Self {
        Self {
            animator: FrameAnimator::new(config, seed),
            duration,
            size: SurfaceSize::default(),
            state: WarpState::Inactive,
            next_run: 1,
        }
    }

    /// Start a run. Returns `None` (and changes nothing) if already active.
    pub fn activate(&mut self) -> Option<WarpActivation> {
        if self.is_active() {
            tracing::trace!("Warp already active, activation ignored");
            return None;
        }

        let run = WarpRunId(self.next_run);
        self.next_run += 1;

        let (tx, rx) = oneshot::channel();
        self.animator.start(self.size);
        self.state = WarpState::Running {
            run,
            timer: PhaseTimer::new(self.duration),
            notify: Some(tx),
        };

        tracing::debug!(run = run.0, duration_ms = self.duration.as_millis() as u64, "Warp activated");

        Some(WarpActivation {
            run,
            completion: rx,
        })
    }

    /// Advance the running animation and its timer
    pub fn update(&mut self, delta: Duration) {
        let WarpState::Running { run, timer, notify } = &mut self.state else {
            return;
        };

        if timer.advance(delta).is_none() {
            self.animator.step(delta);
            return;
        }

        let run = *run;
        let elapsed = timer.duration();
        let notify = notify.take();

        self.animator.stop();
        if let Some(tx) = notify {
            // Boot drops its receiver
            let _ = tx.send(WarpCompletion { run, elapsed });
        }
        self.state = WarpState::Holding { run };

        tracing::debug!(run = run.0, "Warp run complete");
    }

    /// Unmount the overlay, cancelling the timer and the animator without
    /// signalling completion. Idempotent.
    pub fn deactivate(&mut self) {
        match std::mem::replace(&mut self.state, WarpState::Inactive) {
            WarpState::Inactive => {}
            WarpState::Running { run, mut timer, .. } => {
                timer.cancel();
                self.animator.stop();
                tracing::debug!(run = run.0, "Warp cancelled before completion");
            }
            WarpState::Holding { run } => {
                self.animator.stop();
                tracing::trace!(run = run.0, "Warp overlay unmounted");
            }
        }
    }

    /// Draw the current frame. No-op unless a run is animating.
    pub fn draw(&self, surface: Option<&mut dyn DrawSurface>) {
        if self.is_running() {
            self.animator.draw(surface);
        }
    }

    /// Apply a new surface size. Running particles are kept.
    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.animator.resize(size);
    }

    /// Whether the overlay is mounted (running or holding)
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, WarpState::Inactive)
    }

    /// Whether the particle loop is still animating
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, WarpState::Running { .. })
    }

    /// The current or most recent run, while mounted
    #[must_use]
    pub fn current_run(&self) -> Option<WarpRunId> {
        match &self.state {
            WarpState::Inactive => None,
            WarpState::Running { run, .. } | WarpState::Holding { run } => Some(*run),
        }
    }

    /// Current streak speed
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.animator.speed()
    }

    /// Fixed run duration
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The underlying animator
    #[must_use]
    pub fn animator(&self) -> &FrameAnimator {
        &self.animator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use tokio::sync::oneshot::error::TryRecvError;

    fn warp() -> WarpEffect {
        let mut warp = WarpEffect::new(StarfieldConfig::warp(50), Duration::from_millis(1500), Some(9));
        warp.resize(SurfaceSize::new(80, 24));
        warp
    }

    #[test]
    fn test_completion_fires_once() {
        let mut warp = warp();
        let mut activation = warp.activate().expect("fresh activation");

        warp.update(Duration::from_millis(1000));
        assert_eq!(activation.completion.try_recv(), Err(TryRecvError::Empty));

        warp.update(Duration::from_millis(500));
        let done = activation.completion.try_recv().expect("completion sent");
        assert_eq!(done.run, activation.run);
        assert_eq!(done.elapsed, Duration::from_millis(1500));

        warp.update(Duration::from_secs(5));
        assert_eq!(activation.completion.try_recv(), Err(TryRecvError::Closed));
    }

    #[test]
    fn test_activate_is_idempotent_while_active() {
        let mut warp = warp();
        let mut first = warp.activate().expect("fresh activation");
        assert!(warp.activate().is_none());
        assert!(warp.activate().is_none());

        warp.update(Duration::from_millis(1500));
        assert!(first.completion.try_recv().is_ok());

        // Holding still counts as active
        assert!(warp.is_active());
        assert!(warp.activate().is_none());
    }

    #[test]
    fn test_expiry_stops_animator_and_holds() {
        let mut warp = warp();
        let _activation = warp.activate();
        warp.update(Duration::from_millis(1600));

        assert!(warp.is_active());
        assert!(!warp.is_running());
        assert!(warp.animator().particles().is_empty());

        let mut surface = RecordingSurface::new(80, 24);
        warp.draw(Some(&mut surface));
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_deactivate_cancels_without_completion() {
        let mut warp = warp();
        let mut activation = warp.activate().expect("fresh activation");
        warp.update(Duration::from_millis(700));

        warp.deactivate();
        warp.deactivate();
        warp.update(Duration::from_secs(2));

        assert!(!warp.is_active());
        assert_eq!(activation.completion.try_recv(), Err(TryRecvError::Closed));
    }

    #[test]
    fn test_runs_have_distinct_ids() {
        let mut warp = warp();
        let first = warp.activate().expect("first").run;
        warp.deactivate();
        let second = warp.activate().expect("second").run;
        assert_ne!(first, second);
        assert_eq!(warp.current_run(), Some(second));
    }

    #[test]
    fn test_dropped_receiver_does_not_panic() {
        let mut warp = warp();
        drop(warp.activate());
        warp.update(Duration::from_secs(2));
        assert!(warp.is_active());
    }

    #[test]
    fn test_running_warp_draws_streaks() {
        let mut warp = warp();
        let _activation = warp.activate();
        warp.update(Duration::from_millis(100));

        let mut surface = RecordingSurface::new(80, 24);
        warp.draw(Some(&mut surface));
        assert!(!surface.ops().is_empty());
    }
}
