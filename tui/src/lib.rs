//! Cosmos TUI - Terminal portfolio with warp transitions
//!
//! This crate renders the hub and the three galleries in a full-screen
//! terminal UI, driven by the headless transition engine in
//! `orchestrator-core`.
//!
//! # Architecture
//!
//! - **App**: Event loop and frame tick around one `TransitionOrchestrator`
//! - **Compositor**: Layered rendering with z-ordering and dithered fades
//! - **Canvas**: Braille dot grid the starfields draw into
//! - **Views**: Hub, artworks, coding and writing pages
//! - **Widgets**: Clipped text helpers and a borderless scrollable text block

pub mod app;
pub mod canvas;
pub mod compositor;
pub mod theme;
pub mod views;
pub mod widgets;

pub use app::App;
