//! Coding View
//!
//! Projects filtered by category, with a detail pane for the selected one.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;

use orchestrator_core::{Catalog, Project, ProjectCategory, Route};

use super::{clamp_index, scroll_to_show, wrap_index, View, ViewAction};
use crate::theme;
use crate::widgets::{chips, fit_width, put_line, TextBlock, TextBlockState};

/// Rows per project in the list
const ROW_HEIGHT: u16 = 2;

/// Software projects gallery
pub struct CodingView {
    catalog: Arc<Catalog>,
    /// 0 = all, then one tab per category
    filter: usize,
    selected: usize,
    offset: usize,
    /// Id of the project open in the detail pane
    detail: Option<String>,
    description: TextBlockState,
    tabs: Vec<Rect>,
    rows: Vec<(usize, Rect)>,
}

impl CodingView {
    /// Gallery over `catalog`
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            filter: 0,
            selected: 0,
            offset: 0,
            detail: None,
            description: TextBlockState::default(),
            tabs: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Active category filter
    pub fn category(&self) -> Option<ProjectCategory> {
        self.filter
            .checked_sub(1)
            .and_then(|i| ProjectCategory::ALL.get(i).copied())
    }

    /// Projects passing the filter
    pub fn visible(&self) -> Vec<&Project> {
        self.catalog.projects_in(self.category()).collect()
    }

    /// Project in the detail pane
    pub fn detail(&self) -> Option<&Project> {
        self.detail.as_deref().and_then(|id| self.catalog.project(id))
    }

    fn set_filter(&mut self, filter: usize) {
        self.filter = filter;
        self.selected = 0;
        self.offset = 0;
    }

    fn open(&mut self, index: usize) {
        let id = self.visible().get(index).map(|p| p.id.clone());
        if let Some(id) = id {
            self.selected = index;
            self.detail = Some(id);
            self.description.scroll_to_top();
        }
    }

    fn tab_labels() -> Vec<&'static str> {
        std::iter::once("ALL")
            .chain(ProjectCategory::ALL.iter().map(|c| c.label()))
            .collect()
    }

    fn render_list(&mut self, area: Rect, buf: &mut Buffer) {
        self.rows.clear();
        let projects: Vec<Project> = self.visible().into_iter().cloned().collect();
        if projects.is_empty() {
            put_line(buf, area, area.x + 2, area.y, "Nothing here yet", theme::muted_style());
            return;
        }

        let visible_rows = usize::from(area.height / ROW_HEIGHT);
        if visible_rows == 0 {
            return;
        }
        self.offset = scroll_to_show(self.offset, self.selected, visible_rows);

        for (slot, (index, project)) in projects
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(visible_rows)
            .enumerate()
        {
            let y = area.y + slot as u16 * ROW_HEIGHT;
            let row = Rect::new(area.x, y, area.width, ROW_HEIGHT).intersection(area);
            let is_selected = index == self.selected;

            let (marker, title_style) = if is_selected {
                ("▸ ", theme::selected_style())
            } else {
                ("  ", theme::body_style())
            };
            let year = project.start_year.as_deref().unwrap_or("");
            let title_width = usize::from(area.width).saturating_sub(year.len() + 4);
            let title = format!("{marker}{}", fit_width(&project.title, title_width));
            put_line(buf, row, area.x, y, &title, title_style);
            put_line(
                buf,
                row,
                area.right().saturating_sub(year.len() as u16 + 1),
                y,
                year,
                theme::chip_style(),
            );

            let summary = fit_width(
                &project.short_description,
                usize::from(area.width.saturating_sub(4)),
            );
            put_line(buf, row, area.x + 4, y + 1, &summary, theme::muted_style());

            self.rows.push((index, row));
        }
    }

    fn render_detail(&mut self, project: &Project, area: Rect, buf: &mut Buffer) {
        let mut y = area.y;
        put_line(buf, area, area.x + 1, y, &project.title, theme::title_style());
        y += 1;

        let mut meta = project.category.label().to_string();
        if let Some(year) = &project.start_year {
            meta = format!("{meta}  ·  since {year}");
        }
        if project.gallery_len() > 0 {
            meta = format!("{meta}  ·  {} images", project.gallery_len());
        }
        put_line(buf, area, area.x + 1, y, &meta, theme::muted_style());
        y += 1;

        if let Some(link) = &project.external_link {
            put_line(buf, area, area.x + 1, y, link, Style::default().fg(theme::COSMIC_CYAN));
            y += 1;
        }

        if !project.tech_tags.is_empty() {
            let tags: Vec<&str> = project.tech_tags.iter().map(String::as_str).collect();
            let row = Rect {
                y,
                height: 1,
                ..area
            }
            .intersection(area);
            chips(buf, row, &tags, None);
            y += 1;
        }

        let text_area = Rect {
            x: area.x + 1,
            y: y + 1,
            width: area.width.saturating_sub(2),
            height: area.bottom().saturating_sub(y + 2),
        };
        TextBlock::new(project.description())
            .style(theme::body_style())
            .render(text_area, buf, &mut self.description);

        let hint = if self.description.has_more_below() {
            "↑↓ scroll   PgUp/PgDn page   Esc back"
        } else {
            "Esc back"
        };
        put_line(
            buf,
            area,
            area.x + 1,
            area.bottom().saturating_sub(1),
            hint,
            Style::default().fg(theme::DIM_GRAY),
        );
    }
}

impl View for CodingView {
    fn route(&self) -> Route {
        Route::Coding
    }

    fn on_mount(&mut self) {
        self.set_filter(0);
        self.detail = None;
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 {
            return;
        }

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
        match self.detail().cloned() {
            Some(project) => {
                self.rows.clear();
                self.render_detail(&project, body, buf);
            }
            None => self.render_list(body, buf),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        if self.detail.is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Backspace => {
                    self.detail = None;
                    ViewAction::Handled
                }
                KeyCode::Up => {
                    self.description.scroll(-1);
                    ViewAction::Handled
                }
                KeyCode::Down => {
                    self.description.scroll(1);
                    ViewAction::Handled
                }
                KeyCode::PageUp => {
                    self.description.page(-1);
                    ViewAction::Handled
                }
                KeyCode::PageDown | KeyCode::Char(' ') => {
                    self.description.page(1);
                    ViewAction::Handled
                }
                _ => ViewAction::Ignored,
            };
        }

        let tabs = ProjectCategory::ALL.len() + 1;
        match key.code {
            KeyCode::Tab => {
                self.set_filter(wrap_index(self.filter, tabs, 1));
                ViewAction::Handled
            }
            KeyCode::BackTab => {
                self.set_filter(wrap_index(self.filter, tabs, -1));
                ViewAction::Handled
            }
            KeyCode::Up => {
                self.selected = clamp_index(self.selected, self.visible().len(), -1);
                ViewAction::Handled
            }
            KeyCode::Down => {
                self.selected = clamp_index(self.selected, self.visible().len(), 1);
                ViewAction::Handled
            }
            KeyCode::Enter => {
                self.open(self.selected);
                ViewAction::Handled
            }
            _ => ViewAction::Ignored,
        }
    }

    fn handle_click(&mut self, x: u16, y: u16) -> ViewAction {
        let point = (x, y).into();
        if let Some(tab) = self.tabs.iter().position(|r| r.contains(point)) {
            self.detail = None;
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
        if self.detail.is_some() {
            self.description.scroll(lines);
        } else {
            self.selected = clamp_index(self.selected, self.visible().len(), lines.signum());
        }
        ViewAction::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn view() -> CodingView {
        CodingView::new(Arc::new(Catalog::builtin().expect("bundled catalog")))
    }

    #[test]
    fn test_filter_tabs_cycle() {
        let mut view = view();
        assert_eq!(view.category(), None);
        assert_eq!(view.visible().len(), 8);

        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.category(), Some(ProjectCategory::Venture));
        assert_eq!(view.visible().len(), 2);

        view.handle_key(key(KeyCode::BackTab));
        view.handle_key(key(KeyCode::BackTab));
        assert_eq!(view.category(), Some(ProjectCategory::Freelance));
    }

    #[test]
    fn test_open_and_close_detail() {
        let mut view = view();
        view.handle_key(key(KeyCode::Down));
        view.handle_key(key(KeyCode::Enter));
        assert_eq!(view.detail().map(|p| p.id.as_str()), Some("c2"));

        assert_eq!(view.handle_key(key(KeyCode::Esc)), ViewAction::Handled);
        assert!(view.detail().is_none());
        assert_eq!(view.handle_key(key(KeyCode::Esc)), ViewAction::Ignored);
    }

    #[test]
    fn test_detail_scrolls_long_description() {
        let mut view = view();
        view.handle_key(key(KeyCode::Enter));

        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        assert!(view.description.has_more_below());

        view.handle_key(key(KeyCode::PageDown));
        assert!(view.description.scroll_offset > 0);
    }

    #[test]
    fn test_click_tab_and_row() {
        let mut view = view();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);

        let freelance = view.tabs[3];
        view.handle_click(freelance.x, freelance.y);
        assert_eq!(view.category(), Some(ProjectCategory::Freelance));

        view.render(area, &mut buf);
        let (_, row) = view.rows[1];
        view.handle_click(row.x + 2, row.y);
        assert_eq!(view.detail().map(|p| p.id.as_str()), Some("c8"));
    }
}
