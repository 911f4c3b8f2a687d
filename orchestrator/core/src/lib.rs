//! Orchestrator Core - Headless Transition Engine for cosmos
//!
//! This crate holds the state machines behind the cosmos portfolio: the
//! boot choreography, the warp overlay that hides every view switch, and
//! the orchestrator that owns the current phase and route. It knows
//! nothing about terminals; a surface drives it by advancing time and
//! handing it something to draw on.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Surface (TUI)                          │
//! │   input ──▶ request_navigate()      update(delta) ◀── tick   │
//! │   views ◀── snapshot()              render_*(DrawSurface)    │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼───────────────────────────────┐
//! │                  TransitionOrchestrator                      │
//! │  ┌──────────────┐  ┌────────────┐  ┌──────────┐  ┌────────┐  │
//! │  │BootSequencer │─▶│ WarpEffect │  │ ambient  │  │ Route  │  │
//! │  │ D1 / D2 / D3 │  │ (oneshot)  │  │ starfield│  │  Host  │  │
//! │  └──────────────┘  └─────┬──────┘  └────┬─────┘  └────────┘  │
//! │                          └──FrameAnimator┘                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`TransitionOrchestrator`]: single writer of phase and route
//! - [`BootSequencer`]: one-time entry choreography
//! - [`WarpEffect`]: fixed-duration overlay with exactly-once completion
//! - [`FrameAnimator`]: perspective particle field
//! - [`Catalog`]: read-only gallery content
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use orchestrator_core::{
//!     CosmosConfig, MemoryRouter, Route, SurfaceSize, TransitionOrchestrator, TransitionPhase,
//! };
//! use tokio::sync::mpsc;
//!
//! let (tx, _rx) = mpsc::unbounded_channel();
//! let config = CosmosConfig::default();
//! let mut orchestrator =
//!     TransitionOrchestrator::new(&config, SurfaceSize::new(160, 96), MemoryRouter::new(), tx);
//!
//! // Boot: 3.5s + 2.0s + 0.55s
//! orchestrator.update(Duration::from_millis(6050));
//! assert_eq!(orchestrator.phase(), TransitionPhase::Idle);
//!
//! orchestrator.request_navigate(Route::Coding);
//! orchestrator.update(Duration::from_millis(1500));
//! assert_eq!(orchestrator.current_route(), Route::Coding);
//! ```
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod boot;
pub mod catalog;
pub mod config;
pub mod events;
pub mod orchestrator;
pub mod route;
pub mod starfield;
pub mod surface;
pub mod warp;

// Re-exports for convenience
pub use animation::{EasingFunction, Fade, PhaseTimer, TimerState};
pub use boot::{BootSequencer, BootTimings};
pub use events::{
    NavigateOutcome, NavigationIntent, OrchestratorSnapshot, TransitionEvent, TransitionPhase,
};
pub use orchestrator::TransitionOrchestrator;
pub use route::{MemoryRouter, Route, RouteError, RouteHost};
pub use starfield::{FrameAnimator, Particle, RenderStyle, StarfieldConfig};
pub use surface::{DrawOp, DrawSurface, RecordingSurface, Rgba, SurfaceSize};
pub use warp::{WarpActivation, WarpCompletion, WarpEffect, WarpRunId};

// Catalog exports
pub use catalog::{
    Artwork, Catalog, CatalogError, Profile, Project, ProjectCategory, WritingCategory,
    WritingWork,
};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, CosmosConfig, CosmosToml, TimingConfig,
};
