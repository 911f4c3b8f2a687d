//! Writing View
//!
//! Books and poems with excerpts, and a reader for the full text.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;

use orchestrator_core::{Catalog, Route, WritingCategory, WritingWork};

use super::{clamp_index, scroll_to_show, wrap_index, View, ViewAction};
use crate::theme;
use crate::widgets::{chips, fit_width, put_line, wrap_lines, TextBlock, TextBlockState};

/// Title row plus two excerpt rows plus a gap
const ROW_HEIGHT: u16 = 4;

/// Written works gallery
pub struct WritingView {
    catalog: Arc<Catalog>,
    filter: usize,
    selected: usize,
    offset: usize,
    reading: Option<String>,
    reader: TextBlockState,
    tabs: Vec<Rect>,
    rows: Vec<(usize, Rect)>,
}

impl WritingView {
    /// Gallery over `catalog`
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            filter: 0,
            selected: 0,
            offset: 0,
            reading: None,
            reader: TextBlockState::default(),
            tabs: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Active category filter
    pub fn category(&self) -> Option<WritingCategory> {
        self.filter
            .checked_sub(1)
            .and_then(|i| WritingCategory::ALL.get(i).copied())
    }

    /// Works passing the filter
    pub fn visible(&self) -> Vec<&WritingWork> {
        self.catalog.writings_in(self.category()).collect()
    }

    /// Work open in the reader
    pub fn reading(&self) -> Option<&WritingWork> {
        self.reading.as_deref().and_then(|id| self.catalog.writing(id))
    }

    /// Reader scroll position
    pub fn reader_offset(&self) -> usize {
        self.reader.scroll_offset
    }

    fn set_filter(&mut self, filter: usize) {
        self.filter = filter;
        self.selected = 0;
        self.offset = 0;
    }

    fn open(&mut self, index: usize) {
        let id = self.visible().get(index).map(|w| w.id.clone());
        if let Some(id) = id {
            tracing::debug!(%id, "Opening reader");
            self.selected = index;
            self.reading = Some(id);
            self.reader.scroll_to_top();
        }
    }

    fn tab_labels() -> Vec<&'static str> {
        std::iter::once("ALL")
            .chain(WritingCategory::ALL.iter().map(|c| c.label()))
            .collect()
    }

    fn render_list(&mut self, area: Rect, buf: &mut Buffer) {
        self.rows.clear();
        let works: Vec<WritingWork> = self.visible().into_iter().cloned().collect();
        let visible_rows = usize::from(area.height / ROW_HEIGHT);
        if works.is_empty() || visible_rows == 0 {
            return;
        }
        self.offset = scroll_to_show(self.offset, self.selected, visible_rows);

        for (slot, (index, work)) in works
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(visible_rows)
            .enumerate()
        {
            let y = area.y + slot as u16 * ROW_HEIGHT;
            let row = Rect::new(area.x, y, area.width, ROW_HEIGHT - 1).intersection(area);

            let (marker, style) = if index == self.selected {
                ("▸ ", theme::selected_style())
            } else {
                ("  ", theme::body_style())
            };
            let heading = format!("{marker}{}", work.title);
            let heading = fit_width(&heading, usize::from(area.width).saturating_sub(16));
            put_line(buf, row, area.x, y, &heading, style);

            let tag = format!("{} · {}", work.category.label(), work.year);
            put_line(
                buf,
                row,
                area.right().saturating_sub(tag.chars().count() as u16 + 1),
                y,
                &tag,
                theme::chip_style(),
            );

            let excerpt_width = usize::from(area.width.saturating_sub(6));
            for (line_no, line) in wrap_lines(work.excerpt.trim(), excerpt_width)
                .iter()
                .take(2)
                .enumerate()
            {
                put_line(
                    buf,
                    row,
                    area.x + 4,
                    y + 1 + line_no as u16,
                    line,
                    theme::muted_style(),
                );
            }

            self.rows.push((index, row));
        }
    }

    fn render_reader(&mut self, work: &WritingWork, area: Rect, buf: &mut Buffer) {
        put_line(buf, area, area.x + 2, area.y, &work.title, theme::title_style());
        let meta = format!("{} · {}", work.category.label(), work.year);
        put_line(buf, area, area.x + 2, area.y + 1, &meta, theme::muted_style());

        let measure = area.width.saturating_sub(4).min(88);
        let text_area = Rect {
            x: area.x + 2,
            y: area.y + 3,
            width: measure,
            height: area.height.saturating_sub(4),
        }
        .intersection(area);
        TextBlock::new(&work.full_text)
            .style(theme::body_style())
            .render(text_area, buf, &mut self.reader);

        let progress = if self.reader.total_lines == 0 {
            String::new()
        } else {
            let end = (self.reader.scroll_offset + self.reader.viewport).min(self.reader.total_lines);
            format!("{end}/{} lines   ↑↓ PgUp PgDn   Esc back", self.reader.total_lines)
        };
        put_line(
            buf,
            area,
            area.x + 2,
            area.bottom().saturating_sub(1),
            &progress,
            Style::default().fg(theme::DIM_GRAY),
        );
    }
}

impl View for WritingView {
    fn route(&self) -> Route {
        Route::Writing
    }

    fn on_mount(&mut self) {
        self.set_filter(0);
        self.reading = None;
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 {
            return;
        }

        match self.reading().cloned() {
            Some(work) => {
                self.tabs.clear();
                self.rows.clear();
                self.render_reader(&work, area, buf);
            }
            None => {
                let labels = Self::tab_labels();
                let tab_row = Rect {
                    x: area.x + 1,
                    height: 1,
                    width: area.width.saturating_sub(2),
                    ..area
                };
                self.tabs = chips(buf, tab_row, &labels, Some(self.filter));
                let body = Rect {
                    y: area.y + 2,
                    height: area.height - 2,
                    ..area
                };
                self.render_list(body, buf);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        if self.reading.is_some() {
            let handled = match key.code {
                KeyCode::Esc | KeyCode::Backspace => {
                    self.reading = None;
                    true
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.reader.scroll(-1);
                    true
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.reader.scroll(1);
                    true
                }
                KeyCode::PageUp => {
                    self.reader.page(-1);
                    true
                }
                KeyCode::PageDown | KeyCode::Char(' ') => {
                    self.reader.page(1);
                    true
                }
                KeyCode::Home => {
                    self.reader.scroll_to_top();
                    true
                }
                _ => false,
            };
            return if handled {
                ViewAction::Handled
            } else {
                ViewAction::Ignored
            };
        }

        let tabs = WritingCategory::ALL.len() + 1;
        match key.code {
            KeyCode::Tab => self.set_filter(wrap_index(self.filter, tabs, 1)),
            KeyCode::BackTab => self.set_filter(wrap_index(self.filter, tabs, -1)),
            KeyCode::Up => self.selected = clamp_index(self.selected, self.visible().len(), -1),
            KeyCode::Down => self.selected = clamp_index(self.selected, self.visible().len(), 1),
            KeyCode::Enter => self.open(self.selected),
            _ => return ViewAction::Ignored,
        }
        ViewAction::Handled
    }

    fn handle_click(&mut self, x: u16, y: u16) -> ViewAction {
        let point = (x, y).into();
        if let Some(tab) = self.tabs.iter().position(|r| r.contains(point)) {
            self.set_filter(tab);
            return ViewAction::Handled;
        }
        if let Some(&(index, _)) = self.rows.iter().find(|(_, r)| r.contains(point)) {
            self.open(index);
            return ViewAction::Handled;
        }
        ViewAction::Ignored
    }

    fn handle_scroll(&mut self, lines: isize) -> ViewAction {
        if self.reading.is_some() {
            self.reader.scroll(lines);
            ViewAction::Handled
        } else {
            ViewAction::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn view() -> WritingView {
        WritingView::new(Arc::new(Catalog::builtin().expect("bundled catalog")))
    }

    #[test]
    fn test_poetry_filter() {
        let mut view = view();
        view.handle_key(key(KeyCode::BackTab));
        assert_eq!(view.category(), Some(WritingCategory::Poetry));
        let ids: Vec<&str> = view.visible().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["w3", "w4"]);
    }

    #[test]
    fn test_reader_scrolls_and_closes() {
        let mut view = view();
        view.handle_key(key(KeyCode::Enter));
        assert_eq!(view.reading().map(|w| w.id.as_str()), Some("w1"));

        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);

        view.handle_key(key(KeyCode::PageDown));
        assert!(view.reader_offset() > 0);
        view.handle_key(key(KeyCode::Home));
        assert_eq!(view.reader_offset(), 0);

        assert_eq!(view.handle_key(key(KeyCode::Esc)), ViewAction::Handled);
        assert!(view.reading().is_none());
    }

    #[test]
    fn test_mount_resets_state() {
        let mut view = view();
        view.handle_key(key(KeyCode::Tab));
        view.handle_key(key(KeyCode::Enter));
        view.on_mount();

        assert!(view.reading().is_none());
        assert_eq!(view.category(), None);
    }
}
