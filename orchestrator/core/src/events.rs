//! Phases, Outcomes and Transition Events
//!
//! Everything the orchestrator reports outward. Surfaces receive
//! [`TransitionEvent`]s over a channel and read an
//! [`OrchestratorSnapshot`] each frame; neither lets them mutate state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::route::Route;

/// The orchestrator's current discrete state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionPhase {
    /// Boot text over the ambient starfield
    #[default]
    Booting,
    /// Boot warp overlay accelerating
    BootWarping,
    /// Boot overlay cross-fading out
    BootFading,
    /// Ready for navigation
    Idle,
    /// Warp overlay running ahead of a route change
    Navigating,
}

impl TransitionPhase {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Booting => "Initializing sequence...",
            Self::BootWarping => "Engaging warp...",
            Self::BootFading => "Arriving...",
            Self::Idle => "Ready",
            Self::Navigating => "Travelling...",
        }
    }

    /// Whether this phase belongs to the one-time boot sequence
    #[must_use]
    pub fn is_boot(&self) -> bool {
        matches!(self, Self::Booting | Self::BootWarping | Self::BootFading)
    }

    /// Whether the warp overlay must be active in this phase
    #[must_use]
    pub fn requires_warp(&self) -> bool {
        matches!(self, Self::BootWarping | Self::Navigating)
    }
}

/// A pending route switch, held until the running warp completes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationIntent {
    /// Where to go once the warp finishes
    pub target: Route,
    /// Orchestrator clock reading when the request was accepted
    pub requested_at: Duration,
}

/// Result of a navigation request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigateOutcome {
    /// Intent recorded; the warp is running
    Accepted,
    /// Target is the committed route; nothing happened
    AlreadyThere,
    /// A transition is already in flight; request dropped
    Busy,
    /// Boot sequence still running; request dropped
    Booting,
    /// Path outside the closed route set; request dropped
    InvalidTarget,
}

impl NavigateOutcome {
    /// Whether the request started a transition
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Events emitted by the orchestrator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionEvent {
    /// The phase changed
    PhaseChanged {
        /// Previous phase
        from: TransitionPhase,
        /// New phase
        to: TransitionPhase,
        /// Orchestrator clock at the change
        at: Duration,
    },
    /// A route change was committed to the router
    RouteCommitted {
        /// Route left
        from: Route,
        /// Route entered
        to: Route,
    },
    /// A navigation request was dropped
    NavigationRejected {
        /// Requested target, if it parsed
        target: Option<Route>,
        /// Why it was dropped
        outcome: NavigateOutcome,
    },
}

/// Read-only projection of orchestrator state for views
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorSnapshot {
    /// Current phase
    pub phase: TransitionPhase,
    /// Committed route
    pub route: Route,
    /// Whether the warp overlay is mounted
    pub warp_active: bool,
    /// Whether the boot text is on screen
    pub boot_text_visible: bool,
    /// Opacity of the boot overlay (0.0 once boot is over)
    pub boot_overlay_opacity: f32,
    /// Target of the in-flight navigation
    pub pending_target: Option<Route>,
}

impl OrchestratorSnapshot {
    /// Whether the boot overlay is still mounted
    #[must_use]
    pub fn is_booting(&self) -> bool {
        self.phase.is_boot()
    }
}
