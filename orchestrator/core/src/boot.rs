//! Boot Sequencer - One-Time Entry Choreography
//!
//! An explicit state machine with one cancellable timer per phase:
//!
//! ```text
//! Booting ──D1──▶ BootWarping ──D2──▶ BootFading ──D3──▶ Idle
//! (text + stars)  (warp overlay)      (overlay fades)    (handoff)
//! ```
//!
//! The delays are wall-clock timers owned here, layered on top of the
//! warp's own completion timer rather than replaced by it: D2 outlasts the
//! warp run and the boot ignores the warp's completion signal.

use std::time::Duration;

use crate::animation::{Fade, PhaseTimer};
use crate::events::TransitionPhase;
use crate::warp::WarpEffect;

/// Delays of the boot choreography
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootTimings {
    /// Boot text on screen before the warp starts (D1)
    pub idle: Duration,
    /// Warp on screen before the overlay starts fading (D2)
    pub warp: Duration,
    /// Overlay cross-fade (D3)
    pub fade: Duration,
}

impl Default for BootTimings {
    fn default() -> Self {
        Self {
            idle: Duration::from_millis(3500),
            warp: Duration::from_millis(2000),
            fade: Duration::from_millis(550),
        }
    }
}

/// Drives `Booting → BootWarping → BootFading → Idle` exactly once
#[derive(Debug)]
pub struct BootSequencer {
    timings: BootTimings,
    phase: TransitionPhase,
    timer: PhaseTimer,
    fade: Option<Fade>,
}

impl BootSequencer {
    /// Begin the sequence in `Booting`
    #[must_use]
    pub fn new(timings: BootTimings) -> Self {
        Self {
            timings,
            phase: TransitionPhase::Booting,
            timer: PhaseTimer::new(timings.idle),
            fade: None,
        }
    }

    /// Advance the choreography
    ///
    /// Returns the phases entered during this call, in order. Time left over
    /// after a phase ends flows into the next one, so a single large delta
    /// can cross several boundaries.
    pub fn update(&mut self, delta: Duration, warp: &mut WarpEffect) -> Vec<TransitionPhase> {
        let mut entered = Vec::new();
        let mut remaining = delta;

        loop {
            let fired = match self.phase {
                TransitionPhase::BootFading => self
                    .fade
                    .as_mut()
                    .and_then(|fade| fade.advance(remaining)),
                TransitionPhase::Booting | TransitionPhase::BootWarping => {
                    self.timer.advance(remaining)
                }
                TransitionPhase::Idle | TransitionPhase::Navigating => None,
            };

            let Some(leftover) = fired else {
                break;
            };

            remaining = leftover;
            let next = self.advance_phase(warp, leftover);
            entered.push(next);

            if next == TransitionPhase::Idle {
                break;
            }
        }

        entered
    }

    fn advance_phase(&mut self, warp: &mut WarpEffect, leftover: Duration) -> TransitionPhase {
        match self.phase {
            TransitionPhase::Booting => {
                // Completion is not listened to; the D2 timer drives the handoff.
                drop(warp.activate());
                warp.update(leftover);
                self.timer = PhaseTimer::new(self.timings.warp);
                self.phase = TransitionPhase::BootWarping;
            }
            TransitionPhase::BootWarping => {
                self.fade = Some(Fade::out(self.timings.fade));
                self.phase = TransitionPhase::BootFading;
            }
            TransitionPhase::BootFading => {
                warp.deactivate();
                self.fade = None;
                self.phase = TransitionPhase::Idle;
            }
            TransitionPhase::Idle | TransitionPhase::Navigating => {}
        }

        tracing::info!(phase = ?self.phase, "Boot sequence advanced");
        self.phase
    }

    /// Cancel every pending timer. Idempotent; the sequencer never resumes.
    pub fn cancel(&mut self) {
        self.timer.cancel();
        if let Some(fade) = self.fade.as_mut() {
            fade.cancel();
        }
    }

    /// Current boot phase (`Idle` once finished)
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Whether the handoff to `Idle` has happened
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == TransitionPhase::Idle
    }

    /// Whether the "INITIALIZING SEQUENCE" text is on screen
    #[must_use]
    pub fn text_visible(&self) -> bool {
        self.phase == TransitionPhase::Booting
    }

    /// Opacity of the whole boot overlay
    #[must_use]
    pub fn overlay_opacity(&self) -> f32 {
        match self.phase {
            TransitionPhase::Booting | TransitionPhase::BootWarping => 1.0,
            TransitionPhase::BootFading => self.fade.as_ref().map_or(0.0, Fade::opacity),
            TransitionPhase::Idle | TransitionPhase::Navigating => 0.0,
        }
    }
}
