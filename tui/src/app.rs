//! Main Application
//!
//! The App struct drives one [`TransitionOrchestrator`] from the terminal:
//! - Event loop (keyboard, mouse, resize) on a crossterm `EventStream`
//! - Frame tick: `update(delta)` on the orchestrator, then render
//! - Layered compositor for the starfield, view, warp and boot overlays
//!
//! Views never touch routing. A [`ViewAction::Navigate`] is forwarded to
//! the orchestrator, and the matching view is mounted once the
//! orchestrator reports the route as committed.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use orchestrator_core::{
    Catalog, CosmosConfig, MemoryRouter, OrchestratorSnapshot, Route, SurfaceSize,
    TransitionEvent, TransitionOrchestrator, TransitionPhase,
};

use crate::canvas::{CellCanvas, DOTS_X, DOTS_Y};
use crate::compositor::{Compositor, LayerId};
use crate::theme;
use crate::views::{ViewAction, ViewRegistry};
use crate::widgets::{centered_line, put_line};

/// Lines moved per mouse wheel notch
const SCROLL_LINES: isize = 3;

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Transition Engine ===
    /// Phase, warp and routing state machine
    orchestrator: TransitionOrchestrator,
    /// Phase changes and route commits from the orchestrator
    events: mpsc::UnboundedReceiver<TransitionEvent>,

    // === UI Components ===
    /// Hub and gallery views
    views: ViewRegistry,
    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: AppLayers,
    /// Ambient starfield pixels
    ambient: CellCanvas,
    /// Warp overlay pixels; the last drawn frame stays here once the run stops
    warp: CellCanvas,

    // === Misc State ===
    /// Time between frame ticks
    frame_duration: Duration,
    /// Terminal size
    size: (u16, u16),
}

/// Layer IDs for UI regions
struct AppLayers {
    starfield: LayerId,
    view: LayerId,
    status: LayerId,
    warp: LayerId,
    boot: LayerId,
}

impl App {
    /// Create an App sized to the current terminal
    pub fn new(config: &CosmosConfig, catalog: Catalog) -> anyhow::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::with_size(config, catalog, width, height))
    }

    /// Create an App for a terminal of `width` x `height` cells
    pub fn with_size(config: &CosmosConfig, catalog: Catalog, width: u16, height: u16) -> Self {
        let area = Rect::new(0, 0, width, height);
        let mut compositor = Compositor::new(area);

        let layers = AppLayers {
            starfield: compositor.create_layer(area, 0),
            view: compositor.create_layer(Rect::new(0, 0, width, height.saturating_sub(1)), 10),
            status: compositor.create_layer(
                Rect::new(0, height.saturating_sub(1), width, 1),
                20,
            ),
            warp: compositor.create_opaque_layer(area, 30),
            boot: compositor.create_opaque_layer(area, 40),
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let orchestrator = TransitionOrchestrator::new(
            config,
            surface_size(width, height),
            MemoryRouter::new(),
            tx,
        );

        tracing::info!(width, height, fps = config.fps, "App created");

        Self {
            running: true,
            orchestrator,
            events: rx,
            views: ViewRegistry::new(catalog),
            compositor,
            layers,
            ambient: CellCanvas::new(width, height),
            warp: CellCanvas::new(width, height),
            frame_duration: config.frame_duration(),
            size: (width, height),
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut ticker = tokio::time::interval(self.frame_duration);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = Instant::now();

        // Initial frame
        self.draw(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                // Frame tick - advance timers and render
                _ = ticker.tick() => {
                    let now = Instant::now();
                    self.tick(now - last_frame);
                    last_frame = now;
                    self.draw(terminal)?;
                }
            }
        }

        self.orchestrator.shutdown();
        Ok(())
    }

    /// Dispatch one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    /// Advance the orchestrator by `delta` and apply what it reports
    pub fn tick(&mut self, delta: Duration) {
        self.orchestrator.update(delta);

        while let Ok(event) = self.events.try_recv() {
            match event {
                TransitionEvent::RouteCommitted { to, .. } => self.views.mount(to),
                TransitionEvent::PhaseChanged { from, to, .. } => {
                    tracing::debug!(?from, ?to, "Phase changed");
                }
                TransitionEvent::NavigationRejected { .. } => {}
            }
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
                return;
            }
            KeyCode::Char('q') => {
                self.running = false;
                return;
            }
            _ => {}
        }

        // Views only take input while no transition is in flight
        if self.orchestrator.phase() != TransitionPhase::Idle {
            return;
        }
        let route = self.orchestrator.current_route();
        let action = self.views.handle_key(route, key);
        self.apply(action);
    }

    /// Handle mouse input
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.orchestrator.phase() != TransitionPhase::Idle {
            return;
        }
        let route = self.orchestrator.current_route();

        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.compositor.layer_at(mouse.column, mouse.row) != Some(self.layers.view) {
                    return;
                }
                self.views.handle_click(route, mouse.column, mouse.row)
            }
            MouseEventKind::ScrollDown => self.views.handle_scroll(route, SCROLL_LINES),
            MouseEventKind::ScrollUp => self.views.handle_scroll(route, -SCROLL_LINES),
            _ => return,
        };
        self.apply(action);
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        tracing::debug!(width, height, "Terminal resized");
        self.size = (width, height);
        self.compositor.resize(Rect::new(0, 0, width, height));

        for layer in [self.layers.starfield, self.layers.warp, self.layers.boot] {
            self.compositor.move_layer(layer, 0, 0);
            self.compositor.resize_layer(layer, width, height);
        }
        self.compositor
            .resize_layer(self.layers.view, width, height.saturating_sub(1));
        self.compositor
            .move_layer(self.layers.status, 0, height.saturating_sub(1));
        self.compositor.resize_layer(self.layers.status, width, 1);

        self.ambient.resize(width, height);
        self.warp.resize(width, height);
        self.orchestrator.resize(surface_size(width, height));
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Committed route
    pub fn current_route(&self) -> Route {
        self.orchestrator.current_route()
    }

    /// Read-only orchestrator state
    pub fn snapshot(&self) -> OrchestratorSnapshot {
        self.orchestrator.snapshot()
    }

    /// Terminal size in cells
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Render every layer and return the composited frame
    pub fn render_to_buffer(&mut self) -> &Buffer {
        let snapshot = self.orchestrator.snapshot();

        self.render_starfield(&snapshot);
        self.render_view(&snapshot);
        self.render_status(&snapshot);
        self.render_warp(&snapshot);
        self.render_boot(&snapshot);

        self.compositor.composite()
    }

    fn apply(&mut self, action: ViewAction) {
        if let ViewAction::Navigate(target) = action {
            let outcome = self.orchestrator.request_navigate(target);
            tracing::debug!(%target, ?outcome, "Navigation requested");
        }
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            let output = self.render_to_buffer();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    buf[(x, y)] = output[(x, y)].clone();
                }
            }
        })?;
        Ok(())
    }

    /// Ambient stars behind the hub
    fn render_starfield(&mut self, snapshot: &OrchestratorSnapshot) {
        self.orchestrator.render_ambient(Some(&mut self.ambient));

        let visible = snapshot.route == Route::Hub;
        self.compositor.set_visible(self.layers.starfield, visible);
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.starfield) {
            buf.reset();
            if visible {
                let area = buf.area;
                self.ambient.render(area, buf);
            }
        }
    }

    /// The committed route's view
    fn render_view(&mut self, snapshot: &OrchestratorSnapshot) {
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.view) {
            buf.reset();
            let area = buf.area;
            self.views.render(snapshot.route, area, buf);
        }
    }

    /// Phase description and key hints
    fn render_status(&mut self, snapshot: &OrchestratorSnapshot) {
        self.compositor
            .set_visible(self.layers.status, !snapshot.is_booting());

        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) else {
            return;
        };
        buf.reset();
        let area = buf.area;

        let phase = format!(" {} ", snapshot.phase.description());
        let phase_style = match snapshot.phase {
            TransitionPhase::Navigating => Style::default().fg(theme::NEBULA_VIOLET),
            _ => Style::default().fg(theme::COSMIC_CYAN),
        };
        put_line(buf, area, area.x, area.y, &phase, phase_style);

        let hints = match (snapshot.phase, snapshot.route) {
            (TransitionPhase::Navigating, _) => String::new(),
            (_, Route::Hub) => "│ ←→ select  Enter open  1-3 jump  q quit".to_string(),
            (_, route) => format!("│ {}  ·  Esc hub  q quit", route.path()),
        };
        let x = area.x + phase.chars().count() as u16;
        put_line(buf, area, x, area.y, &hints, theme::muted_style());
    }

    /// Full-screen warp overlay during navigation
    fn render_warp(&mut self, snapshot: &OrchestratorSnapshot) {
        let warp = self.orchestrator.warp();
        if warp.is_running() {
            self.orchestrator.render_warp(Some(&mut self.warp));
        } else if !warp.is_active() {
            self.warp.clear();
        }

        let visible = snapshot.phase == TransitionPhase::Navigating;
        self.compositor.set_visible(self.layers.warp, visible);
        if !visible {
            return;
        }

        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.warp) else {
            return;
        };
        buf.reset();
        let area = buf.area;
        self.warp.render(area, buf);

        let middle = area.y + area.height / 2;
        centered_line(
            buf,
            area,
            middle,
            " TRAVELLING... ",
            theme::title_style().add_modifier(Modifier::BOLD),
        );
        if let Some(target) = snapshot.pending_target {
            centered_line(buf, area, middle + 1, target.title(), theme::muted_style());
        }
    }

    /// Boot text, then the boot warp, cross-fading out over the hub
    fn render_boot(&mut self, snapshot: &OrchestratorSnapshot) {
        let visible = snapshot.is_booting();
        self.compositor.set_visible(self.layers.boot, visible);
        if !visible {
            return;
        }
        self.compositor
            .set_opacity(self.layers.boot, snapshot.boot_overlay_opacity);

        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.boot) else {
            return;
        };
        buf.reset();
        let area = buf.area;

        if snapshot.boot_text_visible {
            self.ambient.render(area, buf);
            let middle = area.y + area.height / 2;
            centered_line(
                buf,
                area,
                middle.saturating_sub(1),
                "INITIALIZING SEQUENCE",
                theme::title_style(),
            );
            centered_line(
                buf,
                area,
                middle + 1,
                "LOADING ASSETS...",
                Style::default().fg(theme::SOLAR_GOLD),
            );
        } else {
            self.warp.render(area, buf);
        }
    }
}

/// Surface size in braille dots for a grid of terminal cells
fn surface_size(cols: u16, rows: u16) -> SurfaceSize {
    SurfaceSize::new(
        u32::from(cols) * u32::from(DOTS_X),
        u32::from(rows) * u32::from(DOTS_Y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_size_in_dots() {
        assert_eq!(surface_size(80, 24), SurfaceSize::new(160, 96));
        assert!(surface_size(0, 10).is_empty());
    }
}
