//! View Registry
//!
//! The four top-level views, one per [`Route`]. Views only read the
//! catalog and their own selection state; a navigation wish is returned
//! as [`ViewAction::Navigate`] and handed to the orchestrator by the app,
//! never applied here.
//!
//! Gallery views share a two-row navbar with the page title and a
//! "RETURN TO HUB" affordance (Esc, Backspace or click).

mod artworks;
mod coding;
mod hub;
mod writing;

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use orchestrator_core::{Catalog, Route};

use crate::theme;
use crate::widgets::{fit_width, put_line};

pub use artworks::ArtworksView;
pub use coding::CodingView;
pub use hub::HubView;
pub use writing::WritingView;

/// Rows taken by the gallery navbar
pub const NAVBAR_HEIGHT: u16 = 2;

const RETURN_LABEL: &str = "◂ RETURN TO HUB";

/// What a view did with an input event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewAction {
    /// Not interested
    Ignored,
    /// Consumed, state may have changed
    Handled,
    /// Wants the orchestrator to switch routes
    Navigate(Route),
}

/// A top-level view
pub trait View {
    /// Route this view is mounted on
    fn route(&self) -> Route;

    /// Called when the route is committed; resets transient state
    fn on_mount(&mut self) {}

    /// Draw into `area`
    fn render(&mut self, area: Rect, buf: &mut Buffer);

    /// Handle a key press
    fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

    /// Handle a left click at screen position `(x, y)`
    fn handle_click(&mut self, _x: u16, _y: u16) -> ViewAction {
        ViewAction::Ignored
    }

    /// Handle a wheel scroll (positive = down)
    fn handle_scroll(&mut self, _lines: isize) -> ViewAction {
        ViewAction::Ignored
    }
}

/// Owns every view and picks one by route
pub struct ViewRegistry {
    catalog: Arc<Catalog>,
    hub: HubView,
    artworks: ArtworksView,
    coding: CodingView,
    writing: WritingView,
    return_area: Option<Rect>,
}

impl ViewRegistry {
    /// Build all views over `catalog`
    pub fn new(catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            hub: HubView::new(Arc::clone(&catalog)),
            artworks: ArtworksView::new(Arc::clone(&catalog)),
            coding: CodingView::new(Arc::clone(&catalog)),
            writing: WritingView::new(Arc::clone(&catalog)),
            catalog,
            return_area: None,
        }
    }

    /// The shared catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The view for `route`
    pub fn view_mut(&mut self, route: Route) -> &mut dyn View {
        match route {
            Route::Hub => &mut self.hub,
            Route::Artworks => &mut self.artworks,
            Route::Coding => &mut self.coding,
            Route::Writing => &mut self.writing,
        }
    }

    /// Reset the view that was just committed
    pub fn mount(&mut self, route: Route) {
        tracing::debug!(%route, "Mounting view");
        self.view_mut(route).on_mount();
    }

    /// Draw the view for `route`, with the navbar on gallery pages
    pub fn render(&mut self, route: Route, area: Rect, buf: &mut Buffer) {
        if route == Route::Hub {
            self.return_area = None;
            self.hub.render(area, buf);
            return;
        }

        self.return_area = render_navbar(route, area, buf);
        let body = Rect {
            y: area.y + NAVBAR_HEIGHT.min(area.height),
            height: area.height.saturating_sub(NAVBAR_HEIGHT),
            ..area
        };
        self.view_mut(route).render(body, buf);
    }

    /// Route a key press to the current view
    pub fn handle_key(&mut self, route: Route, key: KeyEvent) -> ViewAction {
        let action = self.view_mut(route).handle_key(key);
        if action != ViewAction::Ignored || route == Route::Hub {
            return action;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => ViewAction::Navigate(Route::Hub),
            _ => ViewAction::Ignored,
        }
    }

    /// Route a click to the navbar or the current view
    pub fn handle_click(&mut self, route: Route, x: u16, y: u16) -> ViewAction {
        if route != Route::Hub
            && self
                .return_area
                .is_some_and(|area| area.contains((x, y).into()))
        {
            return ViewAction::Navigate(Route::Hub);
        }
        self.view_mut(route).handle_click(x, y)
    }

    /// Route a wheel scroll to the current view
    pub fn handle_scroll(&mut self, route: Route, lines: isize) -> ViewAction {
        self.view_mut(route).handle_scroll(lines)
    }
}

/// Title on the left, return affordance on the right, rule beneath
fn render_navbar(route: Route, area: Rect, buf: &mut Buffer) -> Option<Rect> {
    if area.height < NAVBAR_HEIGHT || area.width < 4 {
        return None;
    }

    let title = fit_width(route.title(), usize::from(area.width.saturating_sub(2)));
    put_line(buf, area, area.x + 1, area.y, &title, theme::title_style());

    let label_width = RETURN_LABEL.chars().count() as u16;
    let mut return_area = None;
    if area.width > label_width + title.chars().count() as u16 + 4 {
        let x = area.x + area.width - label_width - 1;
        put_line(buf, area, x, area.y, RETURN_LABEL, theme::muted_style());
        return_area = Some(Rect::new(x, area.y, label_width, 1));
    }

    let rule = "─".repeat(usize::from(area.width));
    put_line(
        buf,
        area,
        area.x,
        area.y + 1,
        &rule,
        Style::default().fg(theme::COSMIC_CYAN_DIM),
    );

    return_area
}

/// Move `index` by `delta` within `len` items, wrapping around
pub(crate) fn wrap_index(index: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    ((index as isize + delta).rem_euclid(len)) as usize
}

/// Move `index` by `delta` within `len` items, stopping at the ends
pub(crate) fn clamp_index(index: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}

/// First row to show so that `selected` stays inside `visible` rows
pub(crate) fn scroll_to_show(offset: usize, selected: usize, visible: usize) -> usize {
    let visible = visible.max(1);
    if selected < offset {
        selected
    } else if selected >= offset + visible {
        selected + 1 - visible
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn registry() -> ViewRegistry {
        ViewRegistry::new(Catalog::builtin().expect("bundled catalog"))
    }

    #[test]
    fn test_index_helpers() {
        assert_eq!(wrap_index(0, 4, -1), 3);
        assert_eq!(wrap_index(3, 4, 1), 0);
        assert_eq!(wrap_index(0, 0, 1), 0);
        assert_eq!(clamp_index(0, 4, -1), 0);
        assert_eq!(clamp_index(2, 4, 5), 3);
        assert_eq!(scroll_to_show(0, 7, 5), 3);
        assert_eq!(scroll_to_show(4, 2, 5), 2);
        assert_eq!(scroll_to_show(1, 3, 5), 1);
    }

    #[test]
    fn test_escape_returns_to_hub_from_gallery() {
        let mut registry = registry();
        assert_eq!(
            registry.handle_key(Route::Coding, key(KeyCode::Esc)),
            ViewAction::Navigate(Route::Hub)
        );
        assert_eq!(
            registry.handle_key(Route::Hub, key(KeyCode::Esc)),
            ViewAction::Ignored
        );
    }

    #[test]
    fn test_navbar_click_returns_to_hub() {
        let mut registry = registry();
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        registry.render(Route::Writing, area, &mut buf);

        let x = 100 - 2;
        assert_eq!(
            registry.handle_click(Route::Writing, x, 0),
            ViewAction::Navigate(Route::Hub)
        );
    }

    #[test]
    fn test_every_route_renders_in_tiny_area() {
        let mut registry = registry();
        for route in Route::ALL {
            for (w, h) in [(0, 0), (1, 1), (12, 3), (30, 8)] {
                let area = Rect::new(0, 0, w, h);
                let mut buf = Buffer::empty(area);
                registry.render(route, area, &mut buf);
            }
        }
    }
}
