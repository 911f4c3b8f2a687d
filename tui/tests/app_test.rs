//! App Integration Tests
//!
//! Drive the full TUI (orchestrator, views and compositor) with synthetic
//! terminal events and fixed frame deltas, and inspect the composited
//! frame. No terminal is needed.

use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use pretty_assertions::assert_eq;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use cosmos_tui::App;
use orchestrator_core::{Catalog, CosmosConfig, Route, TransitionPhase};

const FRAME: Duration = Duration::from_millis(16);

/// Boot takes 3.5 s + 2.0 s + 0.55 s with default timings
const BOOT_TOTAL: Duration = Duration::from_millis(6050);

// ============================================================================
// Helpers
// ============================================================================

fn app(width: u16, height: u16) -> App {
    let mut config = CosmosConfig::default();
    config.seed = Some(42);
    let catalog = Catalog::builtin().expect("bundled catalog");
    App::with_size(&config, catalog, width, height)
}

/// Tick and render frame by frame until `total` has elapsed
fn advance(app: &mut App, total: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        let step = FRAME.min(total - elapsed);
        app.tick(step);
        app.render_to_buffer();
        elapsed += step;
    }
}

fn booted(width: u16, height: u16) -> App {
    let mut app = app(width, height);
    advance(&mut app, BOOT_TOTAL + FRAME);
    assert_eq!(app.snapshot().phase, TransitionPhase::Idle);
    app
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}

fn click(app: &mut App, column: u16, row: u16) {
    app.handle_event(Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }));
}

/// Screen position of the first occurrence of `text`
fn find_text(buf: &Buffer, text: &str) -> Option<(u16, u16)> {
    let chars: Vec<String> = text.chars().map(String::from).collect();
    let area = buf.area;
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let fits = usize::from(area.right() - x) >= chars.len();
            if fits
                && chars
                    .iter()
                    .enumerate()
                    .all(|(i, c)| buf[(x + i as u16, y)].symbol() == c)
            {
                return Some((x, y));
            }
        }
    }
    None
}

fn screen_has(app: &mut App, text: &str) -> bool {
    find_text(app.render_to_buffer(), text).is_some()
}

// ============================================================================
// Boot
// ============================================================================

#[test]
fn test_boot_screen_hides_hub() {
    let mut app = app(100, 30);
    advance(&mut app, Duration::from_secs(1));

    assert_eq!(app.snapshot().phase, TransitionPhase::Booting);
    assert!(screen_has(&mut app, "INITIALIZING SEQUENCE"));
    assert!(screen_has(&mut app, "LOADING ASSETS..."));
    assert!(!screen_has(&mut app, "JAGGANNATHAN"));
}

#[test]
fn test_boot_ends_on_hub() {
    let mut app = booted(100, 30);

    assert_eq!(app.current_route(), Route::Hub);
    assert!(!app.snapshot().warp_active);
    assert!(screen_has(&mut app, "JAGGANNATHAN"));
    assert!(screen_has(&mut app, "Ready"));
    assert!(!screen_has(&mut app, "INITIALIZING"));
}

#[test]
fn test_input_ignored_during_boot() {
    let mut app = app(100, 30);
    advance(&mut app, Duration::from_secs(1));
    press(&mut app, KeyCode::Char('2'));
    assert_eq!(app.snapshot().phase, TransitionPhase::Booting);

    advance(&mut app, BOOT_TOTAL);
    assert_eq!(app.snapshot().phase, TransitionPhase::Idle);
    assert_eq!(app.current_route(), Route::Hub);
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_digit_key_warps_to_gallery() {
    let mut app = booted(100, 30);
    press(&mut app, KeyCode::Char('2'));

    let snapshot = app.snapshot();
    assert_eq!(snapshot.phase, TransitionPhase::Navigating);
    assert_eq!(snapshot.pending_target, Some(Route::Coding));
    assert!(screen_has(&mut app, "TRAVELLING..."));

    advance(&mut app, Duration::from_millis(1500) + FRAME);
    assert_eq!(app.current_route(), Route::Coding);
    assert_eq!(app.snapshot().phase, TransitionPhase::Idle);
    assert!(!app.snapshot().warp_active);
    assert!(screen_has(&mut app, "RETURN TO HUB"));
    assert!(!screen_has(&mut app, "TRAVELLING"));
}

#[test]
fn test_escape_returns_to_hub() {
    let mut app = booted(100, 30);
    press(&mut app, KeyCode::Char('3'));
    advance(&mut app, Duration::from_millis(1600));
    assert_eq!(app.current_route(), Route::Writing);

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.snapshot().pending_target, Some(Route::Hub));
    advance(&mut app, Duration::from_millis(1600));

    assert_eq!(app.current_route(), Route::Hub);
    assert!(screen_has(&mut app, "JAGGANNATHAN"));
}

#[test]
fn test_keys_during_warp_are_dropped() {
    let mut app = booted(100, 30);
    press(&mut app, KeyCode::Char('1'));
    advance(&mut app, Duration::from_millis(500));
    press(&mut app, KeyCode::Char('3'));
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.snapshot().pending_target, Some(Route::Artworks));
    advance(&mut app, Duration::from_millis(1100));
    assert_eq!(app.current_route(), Route::Artworks);
}

#[test]
fn test_click_on_hub_card() {
    let mut app = booted(100, 30);
    let (x, y) = find_text(app.render_to_buffer(), "NEURAL").expect("coding card on screen");

    click(&mut app, x, y);
    assert_eq!(app.snapshot().pending_target, Some(Route::Coding));
}

#[test]
fn test_click_on_return_link() {
    let mut app = booted(100, 30);
    press(&mut app, KeyCode::Char('1'));
    advance(&mut app, Duration::from_millis(1600));

    let (x, y) = find_text(app.render_to_buffer(), "RETURN").expect("navbar on screen");
    click(&mut app, x, y);
    assert_eq!(app.snapshot().pending_target, Some(Route::Hub));
}

// ============================================================================
// Resize & Quit
// ============================================================================

#[test]
fn test_resize_keeps_rendering() {
    let mut app = booted(100, 30);
    app.handle_event(Event::Resize(60, 20));

    assert_eq!(app.size(), (60, 20));
    assert_eq!(app.render_to_buffer().area, Rect::new(0, 0, 60, 20));
    assert!(screen_has(&mut app, "JAGGANNATHAN"));
}

#[test]
fn test_resize_mid_warp() {
    let mut app = booted(100, 30);
    press(&mut app, KeyCode::Char('1'));
    advance(&mut app, Duration::from_millis(500));

    app.handle_event(Event::Resize(40, 12));
    advance(&mut app, Duration::from_millis(1100));

    assert_eq!(app.current_route(), Route::Artworks);
    assert_eq!(app.render_to_buffer().area, Rect::new(0, 0, 40, 12));
}

#[test]
fn test_tiny_terminal_does_not_panic() {
    let mut app = app(3, 2);
    advance(&mut app, BOOT_TOTAL + FRAME);
    press(&mut app, KeyCode::Char('2'));
    advance(&mut app, Duration::from_millis(1600));
    assert_eq!(app.current_route(), Route::Coding);
}

#[test]
fn test_quit_keys() {
    let mut quit = app(80, 24);
    assert!(quit.is_running());
    press(&mut quit, KeyCode::Char('q'));
    assert!(!quit.is_running());

    let mut interrupted = app(80, 24);
    interrupted.handle_event(Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    )));
    assert!(!interrupted.is_running());
}
