//! Transition Orchestrator - Single Writer of Phase and Route
//!
//! Owns the boot sequencer, the warp overlay, the ambient starfield and the
//! host router. Every route change goes through here, so no view switch is
//! ever observed without the warp in front of it.
//!
//! # Frame Contract
//!
//! The host calls [`TransitionOrchestrator::update`] once per frame with
//! the elapsed time, then draws with the `render_*` methods. Input handlers
//! call [`TransitionOrchestrator::request_navigate`] between frames.
//!
//! ```text
//! update(delta):
//!   1. warp.update      (may send the run's completion)
//!   2. boot.update      (D1 / D2 / D3 timers, discarded once Idle)
//!   3. ambient.step
//!   4. poll completion  (commit intent, deactivate warp, Idle)
//!   5. watchdog         (force completion if Navigating too long)
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::oneshot::error::TryRecvError;

use crate::boot::BootSequencer;
use crate::config::CosmosConfig;
use crate::events::{
    NavigateOutcome, NavigationIntent, OrchestratorSnapshot, TransitionEvent, TransitionPhase,
};
use crate::route::{MemoryRouter, Route, RouteHost};
use crate::starfield::FrameAnimator;
use crate::surface::{DrawSurface, SurfaceSize};
use crate::warp::{WarpActivation, WarpEffect};

/// Coordinates boot, warp and routing
pub struct TransitionOrchestrator<R: RouteHost = MemoryRouter> {
    phase: TransitionPhase,
    router: R,
    warp: WarpEffect,
    ambient: FrameAnimator,
    boot: Option<BootSequencer>,
    intent: Option<NavigationIntent>,
    completion: Option<WarpActivation>,
    clock: Duration,
    nav_elapsed: Duration,
    watchdog_grace: Duration,
    events: mpsc::UnboundedSender<TransitionEvent>,
    shut_down: bool,
}

impl<R: RouteHost> TransitionOrchestrator<R> {
    /// Start the process-lifetime state machine
    ///
    /// The router is reset to the hub, the ambient starfield starts and the
    /// boot sequence is armed. Events are sent on `events`; a dropped
    /// receiver is tolerated.
    pub fn new(
        config: &CosmosConfig,
        size: SurfaceSize,
        mut router: R,
        events: mpsc::UnboundedSender<TransitionEvent>,
    ) -> Self {
        router.reset(Route::Hub);

        let mut ambient = FrameAnimator::new(config.ambient.clone(), config.seed);
        ambient.start(size);

        let mut warp = WarpEffect::new(
            config.warp.clone(),
            config.timing.warp,
            config.seed.map(|seed| seed.wrapping_add(1)),
        );
        warp.resize(size);

        tracing::info!(
            width = size.width,
            height = size.height,
            "Orchestrator started, boot sequence armed"
        );

        Self {
            phase: TransitionPhase::Booting,
            router,
            warp,
            ambient,
            boot: Some(BootSequencer::new(config.timing.boot)),
            intent: None,
            completion: None,
            clock: Duration::ZERO,
            nav_elapsed: Duration::ZERO,
            watchdog_grace: config.timing.watchdog_grace,
            events,
            shut_down: false,
        }
    }

    /// Advance every timer and animation by `delta`
    pub fn update(&mut self, delta: Duration) {
        if self.shut_down {
            return;
        }
        self.clock += delta;

        self.warp.update(delta);

        let entered = match self.boot.as_mut() {
            Some(boot) => boot.update(delta, &mut self.warp),
            None => Vec::new(),
        };
        for phase in entered {
            self.set_phase(phase);
        }
        if self.boot.as_ref().is_some_and(BootSequencer::is_finished) {
            self.boot = None;
            tracing::info!("Boot sequence finished, navigation enabled");
        }

        self.ambient.step(delta);

        if self.phase == TransitionPhase::Navigating {
            self.poll_completion();
        }
        if self.phase == TransitionPhase::Navigating {
            self.check_watchdog(delta);
        }
    }

    /// Ask to switch to `target`
    ///
    /// Only accepted while `Idle` and when `target` differs from the
    /// committed route. Rejected requests change nothing.
    pub fn request_navigate(&mut self, target: Route) -> NavigateOutcome {
        let outcome = match self.phase {
            _ if self.shut_down => NavigateOutcome::Busy,
            TransitionPhase::Booting
            | TransitionPhase::BootWarping
            | TransitionPhase::BootFading => NavigateOutcome::Booting,
            TransitionPhase::Navigating => NavigateOutcome::Busy,
            TransitionPhase::Idle if target == self.router.current() => {
                NavigateOutcome::AlreadyThere
            }
            TransitionPhase::Idle => NavigateOutcome::Accepted,
        };

        if !outcome.is_accepted() {
            return self.reject(Some(target), outcome);
        }

        let Some(activation) = self.warp.activate() else {
            tracing::warn!(%target, "Warp still mounted while idle, request dropped");
            return self.reject(Some(target), NavigateOutcome::Busy);
        };

        self.intent = Some(NavigationIntent {
            target,
            requested_at: self.clock,
        });
        self.completion = Some(activation);
        self.nav_elapsed = Duration::ZERO;
        self.set_phase(TransitionPhase::Navigating);

        tracing::info!(from = %self.router.current(), to = %target, "Navigation accepted");
        NavigateOutcome::Accepted
    }

    /// Ask to switch to the route at `path`; unknown paths are dropped
    pub fn navigate_path(&mut self, path: &str) -> NavigateOutcome {
        match path.parse::<Route>() {
            Ok(route) => self.request_navigate(route),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring navigation to unknown path");
                self.reject(None, NavigateOutcome::InvalidTarget)
            }
        }
    }

    /// Apply a new surface size to both particle fields
    pub fn resize(&mut self, size: SurfaceSize) {
        self.ambient.resize(size);
        self.warp.resize(size);
    }

    /// Draw the ambient starfield
    pub fn render_ambient(&self, surface: Option<&mut dyn DrawSurface>) {
        self.ambient.draw(surface);
    }

    /// Draw the warp overlay (no-op while inactive)
    pub fn render_warp(&self, surface: Option<&mut dyn DrawSurface>) {
        self.warp.draw(surface);
    }

    /// Read-only projection for views
    #[must_use]
    pub fn snapshot(&self) -> OrchestratorSnapshot {
        OrchestratorSnapshot {
            phase: self.phase,
            route: self.router.current(),
            warp_active: self.warp.is_active(),
            boot_text_visible: self.boot.as_ref().is_some_and(BootSequencer::text_visible),
            boot_overlay_opacity: self
                .boot
                .as_ref()
                .map_or(0.0, BootSequencer::overlay_opacity),
            pending_target: self.intent.map(|intent| intent.target),
        }
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Committed route
    #[must_use]
    pub fn current_route(&self) -> Route {
        self.router.current()
    }

    /// Whether the warp overlay is mounted
    #[must_use]
    pub fn warp_active(&self) -> bool {
        self.warp.is_active()
    }

    /// The warp overlay
    #[must_use]
    pub fn warp(&self) -> &WarpEffect {
        &self.warp
    }

    /// The host router
    #[must_use]
    pub fn router(&self) -> &R {
        &self.router
    }

    /// Total time advanced so far
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Tear everything down: cancel timers, stop both loops, drop any
    /// pending intent. Idempotent; later updates and requests are no-ops.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        if let Some(boot) = self.boot.as_mut() {
            boot.cancel();
        }
        self.boot = None;
        self.warp.deactivate();
        self.ambient.stop();
        self.completion = None;
        self.intent = None;

        tracing::info!(phase = ?self.phase, "Orchestrator shut down");
    }

    fn poll_completion(&mut self) {
        let Some(activation) = self.completion.as_mut() else {
            return;
        };

        match activation.completion.try_recv() {
            Ok(done) if done.run == activation.run => {
                tracing::debug!(
                    run = done.run.0,
                    elapsed_ms = done.elapsed.as_millis() as u64,
                    "Warp completion received"
                );
                self.completion = None;
                self.finish_navigation();
            }
            Ok(done) => {
                tracing::trace!(run = done.run.0, "Ignoring completion from a stale run");
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                tracing::warn!("Warp ended without completing, navigation abandoned");
                self.completion = None;
                self.intent = None;
                self.warp.deactivate();
                self.set_phase(TransitionPhase::Idle);
            }
        }
    }

    fn check_watchdog(&mut self, delta: Duration) {
        self.nav_elapsed += delta;
        let limit = self.warp.duration() + self.watchdog_grace;
        if self.nav_elapsed <= limit {
            return;
        }

        tracing::warn!(
            elapsed_ms = self.nav_elapsed.as_millis() as u64,
            limit_ms = limit.as_millis() as u64,
            "Navigation outlived the warp, forcing completion"
        );
        self.completion = None;
        self.finish_navigation();
    }

    /// Commit the pending intent (if any), unmount the warp, return to Idle
    fn finish_navigation(&mut self) {
        if let Some(intent) = self.intent.take() {
            let from = self.router.current();
            self.router.commit(intent.target);
            self.emit(TransitionEvent::RouteCommitted {
                from,
                to: intent.target,
            });
            tracing::info!(
                %from,
                to = %intent.target,
                waited_ms = (self.clock.saturating_sub(intent.requested_at)).as_millis() as u64,
                "Route committed"
            );
        } else {
            tracing::debug!(
                run = ?self.warp.current_run(),
                "Warp completed with no pending intent"
            );
        }

        self.warp.deactivate();
        self.set_phase(TransitionPhase::Idle);
    }

    fn reject(&self, target: Option<Route>, outcome: NavigateOutcome) -> NavigateOutcome {
        tracing::debug!(?target, ?outcome, phase = ?self.phase, "Navigation request dropped");
        self.emit(TransitionEvent::NavigationRejected { target, outcome });
        outcome
    }

    fn set_phase(&mut self, to: TransitionPhase) {
        if self.phase == to {
            return;
        }
        let from = self.phase;
        self.phase = to;
        tracing::info!(?from, ?to, "Phase changed");
        self.emit(TransitionEvent::PhaseChanged {
            from,
            to,
            at: self.clock,
        });
    }

    fn emit(&self, event: TransitionEvent) {
        // A surface that stopped listening is not an error
        let _ = self.events.send(event);
    }
}

impl<R: RouteHost> Drop for TransitionOrchestrator<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
