//! Artworks View
//!
//! A grid of titled tiles with a lightbox. The lightbox browses with
//! wrap-around and closes on Esc; the grid itself stops at its edges.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Clear, Widget};

use orchestrator_core::{Catalog, Route};

use super::{clamp_index, scroll_to_show, wrap_index, View, ViewAction};
use crate::theme;
use crate::widgets::{centered_line, fit_width, put_line};

const TILE_WIDTH: u16 = 26;
const TILE_HEIGHT: u16 = 3;

/// Gallery of visual works
pub struct ArtworksView {
    catalog: Arc<Catalog>,
    selected: usize,
    /// Index of the artwork shown in the lightbox
    lightbox: Option<usize>,
    columns: usize,
    row_offset: usize,
    tiles: Vec<(usize, Rect)>,
}

impl ArtworksView {
    /// Gallery over `catalog`
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            selected: 0,
            lightbox: None,
            columns: 1,
            row_offset: 0,
            tiles: Vec::new(),
        }
    }

    /// Highlighted tile
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Artwork open in the lightbox
    pub fn lightbox(&self) -> Option<usize> {
        self.lightbox
    }

    fn len(&self) -> usize {
        self.catalog.artworks.len()
    }

    fn render_grid(&mut self, area: Rect, buf: &mut Buffer) {
        self.tiles.clear();
        if area.width < 8 || area.height < TILE_HEIGHT {
            return;
        }

        let tile_width = TILE_WIDTH.min(area.width);
        self.columns = usize::from((area.width / tile_width).max(1));
        let visible_rows = usize::from(area.height / TILE_HEIGHT);
        self.row_offset = scroll_to_show(self.row_offset, self.selected / self.columns, visible_rows);

        let first = self.row_offset * self.columns;
        let last = (first + visible_rows * self.columns).min(self.len());
        for index in first..last {
            let slot = index - first;
            let col = (slot % self.columns) as u16;
            let row = (slot / self.columns) as u16;
            let rect = Rect::new(
                area.x + col * tile_width,
                area.y + row * TILE_HEIGHT,
                tile_width.saturating_sub(1),
                TILE_HEIGHT,
            )
            .intersection(area);

            let border = if index == self.selected {
                theme::selected_style()
            } else {
                Style::default().fg(theme::COSMIC_CYAN_DIM)
            };
            let block = Block::bordered().border_style(border);
            let inner = block.inner(rect);
            block.render(rect, buf);

            let artwork = &self.catalog.artworks[index];
            let label = fit_width(&artwork.title, usize::from(inner.width));
            put_line(buf, inner, inner.x, inner.y, &label, theme::body_style());

            self.tiles.push((index, rect));
        }

        if last < self.len() {
            let more = format!("▾ {} more", self.len() - last);
            put_line(
                buf,
                area,
                area.right().saturating_sub(more.chars().count() as u16 + 1),
                area.bottom().saturating_sub(1),
                &more,
                theme::muted_style(),
            );
        }
    }

    fn render_lightbox(&self, index: usize, area: Rect, buf: &mut Buffer) {
        let Some(artwork) = self.catalog.artworks.get(index) else {
            return;
        };

        let width = area.width.saturating_sub(8).clamp(10, 70).min(area.width);
        let height = 9.min(area.height);
        let rect = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        Clear.render(rect, buf);
        let block = Block::bordered()
            .border_style(Style::default().fg(theme::COSMIC_CYAN))
            .title(format!(" {} / {} ", index + 1, self.len()));
        let inner = block.inner(rect);
        block.render(rect, buf);

        centered_line(buf, inner, inner.y + 1, &artwork.title, theme::title_style());
        centered_line(buf, inner, inner.y + 3, &artwork.image_url, theme::muted_style());
        centered_line(
            buf,
            inner,
            inner.bottom().saturating_sub(1),
            "← prev   → next   Esc close",
            Style::default().fg(theme::DIM_GRAY),
        );
    }
}

impl View for ArtworksView {
    fn route(&self) -> Route {
        Route::Artworks
    }

    fn on_mount(&mut self) {
        self.selected = 0;
        self.lightbox = None;
        self.row_offset = 0;
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if self.catalog.artworks.is_empty() {
            centered_line(buf, area, area.y + 1, "No artworks yet", theme::muted_style());
            return;
        }

        self.render_grid(area, buf);
        if let Some(index) = self.lightbox {
            self.render_lightbox(index, area, buf);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        let len = self.len();
        if len == 0 {
            return ViewAction::Ignored;
        }

        if let Some(index) = self.lightbox {
            return match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.lightbox = Some(wrap_index(index, len, -1));
                    ViewAction::Handled
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.lightbox = Some(wrap_index(index, len, 1));
                    ViewAction::Handled
                }
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => {
                    self.selected = index;
                    self.lightbox = None;
                    ViewAction::Handled
                }
                _ => ViewAction::Ignored,
            };
        }

        let columns = self.columns.max(1) as isize;
        let delta = match key.code {
            KeyCode::Left => -1,
            KeyCode::Right => 1,
            KeyCode::Up => -columns,
            KeyCode::Down => columns,
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.lightbox = Some(self.selected);
                return ViewAction::Handled;
            }
            _ => return ViewAction::Ignored,
        };
        self.selected = clamp_index(self.selected, len, delta);
        ViewAction::Handled
    }

    fn handle_click(&mut self, x: u16, y: u16) -> ViewAction {
        if self.lightbox.is_some() {
            self.lightbox = None;
            return ViewAction::Handled;
        }

        match self
            .tiles
            .iter()
            .find(|(_, rect)| rect.contains((x, y).into()))
        {
            Some(&(index, _)) => {
                self.selected = index;
                self.lightbox = Some(index);
                ViewAction::Handled
            }
            None => ViewAction::Ignored,
        }
    }

    fn handle_scroll(&mut self, lines: isize) -> ViewAction {
        if self.lightbox.is_some() {
            return ViewAction::Ignored;
        }
        let step = self.columns.max(1) as isize * lines.signum();
        self.selected = clamp_index(self.selected, self.len(), step);
        ViewAction::Handled
    }
}
