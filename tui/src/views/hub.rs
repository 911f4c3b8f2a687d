//! Hub View
//!
//! Profile header, the three gallery cards and the about section. The
//! starfield layer shows through every blank cell.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use orchestrator_core::{Catalog, Route};

use super::{wrap_index, View, ViewAction};
use crate::theme;
use crate::widgets::{centered_line, chips};

/// Card height including borders
const CARD_HEIGHT: u16 = 5;

/// Below this width cards stack vertically
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 60;

/// The landing page
pub struct HubView {
    catalog: Arc<Catalog>,
    selected: usize,
    cards: Vec<(Route, Rect)>,
}

impl HubView {
    /// Hub over `catalog`
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            selected: 0,
            cards: Vec::new(),
        }
    }

    /// Gallery behind the highlighted card
    pub fn selected_route(&self) -> Route {
        Route::GALLERIES[self.selected]
    }

    fn card_areas(area: Rect) -> Vec<Rect> {
        let count = Route::GALLERIES.len() as u16;
        if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
            let gap = 2;
            let width = (area.width - gap * (count - 1)) / count;
            (0..count)
                .map(|i| Rect::new(area.x + i * (width + gap), area.y, width, CARD_HEIGHT))
                .collect()
        } else {
            (0..count)
                .map(|i| Rect::new(area.x, area.y + i * CARD_HEIGHT, area.width, CARD_HEIGHT))
                .collect()
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) -> u16 {
        let profile = &self.catalog.profile;
        let mut y = area.y;

        centered_line(buf, area, y, &profile.persona, theme::muted_style());
        y += 1;
        centered_line(buf, area, y, &profile.full_name(), theme::title_style());
        y += 1;

        let mut subtitle = profile.roles.join(" • ");
        if !profile.location.is_empty() {
            subtitle = format!("{subtitle}  ·  {}", profile.location);
        }
        centered_line(buf, area, y, &subtitle, theme::body_style());
        y + 2
    }

    fn render_cards(&mut self, area: Rect, buf: &mut Buffer) -> u16 {
        self.cards.clear();
        let inner = Rect {
            x: area.x + 1,
            width: area.width.saturating_sub(2),
            ..area
        };

        let mut bottom = area.y;
        for (i, (rect, route)) in Self::card_areas(inner)
            .into_iter()
            .zip(Route::GALLERIES)
            .enumerate()
        {
            let rect = rect.intersection(area);
            if rect.height < 3 || rect.width < 6 {
                continue;
            }

            let border = if i == self.selected {
                theme::selected_style()
            } else {
                Style::default().fg(theme::COSMIC_CYAN_DIM)
            };
            let block = Block::bordered()
                .border_style(border)
                .title(format!(" {} ", i + 1));
            let body = block.inner(rect);
            block.render(rect, buf);

            centered_line(buf, body, body.y, route.title(), theme::title_style());
            centered_line(buf, body, body.y + 1, route.subtitle(), theme::muted_style());

            self.cards.push((route, rect));
            bottom = bottom.max(rect.bottom());
        }
        bottom + 1
    }

    fn render_about(&self, area: Rect, buf: &mut Buffer) {
        let profile = &self.catalog.profile;
        if area.height == 0 {
            return;
        }

        centered_line(buf, area, area.y, &profile.headline, theme::title_style());

        let skills: Vec<&str> = profile.skills.iter().map(String::as_str).collect();
        let text_area = Rect {
            x: area.x + 2,
            y: area.y + 2,
            width: area.width.saturating_sub(4),
            height: area.height.saturating_sub(4),
        }
        .intersection(area);
        Paragraph::new(profile.about.as_str())
            .style(theme::body_style())
            .wrap(Wrap { trim: true })
            .render(text_area, buf);

        let chip_row = Rect {
            y: area.bottom().saturating_sub(1),
            height: 1,
            ..text_area
        };
        if chip_row.y > text_area.y {
            chips(buf, chip_row, &skills, None);
        }
    }
}

impl View for HubView {
    fn route(&self) -> Route {
        Route::Hub
    }

    fn on_mount(&mut self) {
        self.cards.clear();
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            self.cards.clear();
            return;
        }

        let cards_y = self.render_header(area, buf);
        let cards_area = Rect {
            y: cards_y,
            height: area.bottom().saturating_sub(cards_y),
            ..area
        };
        let about_y = self.render_cards(cards_area, buf);

        let about_area = Rect {
            y: about_y,
            height: area.bottom().saturating_sub(about_y),
            ..area
        };
        self.render_about(about_area, buf);
    }

    fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        let len = Route::GALLERIES.len();
        match key.code {
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab => {
                self.selected = wrap_index(self.selected, len, -1);
                ViewAction::Handled
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                self.selected = wrap_index(self.selected, len, 1);
                ViewAction::Handled
            }
            KeyCode::Enter | KeyCode::Char(' ') => ViewAction::Navigate(self.selected_route()),
            KeyCode::Char(c @ '1'..='3') => {
                let index = (c as usize) - ('1' as usize);
                self.selected = index;
                ViewAction::Navigate(Route::GALLERIES[index])
            }
            _ => ViewAction::Ignored,
        }
    }

    fn handle_click(&mut self, x: u16, y: u16) -> ViewAction {
        let hit = self
            .cards
            .iter()
            .position(|(_, rect)| rect.contains((x, y).into()));
        match hit {
            Some(index) => {
                self.selected = index;
                ViewAction::Navigate(self.cards[index].0)
            }
            None => ViewAction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn hub() -> HubView {
        HubView::new(Arc::new(Catalog::builtin().expect("bundled catalog")))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_selection_wraps() {
        let mut hub = hub();
        assert_eq!(hub.handle_key(key(KeyCode::Left)), ViewAction::Handled);
        assert_eq!(hub.selected_route(), Route::Writing);
        hub.handle_key(key(KeyCode::Tab));
        assert_eq!(hub.selected_route(), Route::Artworks);
        assert_eq!(
            hub.handle_key(key(KeyCode::Enter)),
            ViewAction::Navigate(Route::Artworks)
        );
    }

    #[test]
    fn test_digit_shortcuts() {
        let mut hub = hub();
        assert_eq!(
            hub.handle_key(key(KeyCode::Char('2'))),
            ViewAction::Navigate(Route::Coding)
        );
        assert_eq!(
            hub.handle_key(key(KeyCode::Char('3'))),
            ViewAction::Navigate(Route::Writing)
        );
        assert_eq!(hub.handle_key(key(KeyCode::Char('4'))), ViewAction::Ignored);
    }

    #[test]
    fn test_click_on_card_navigates() {
        let mut hub = hub();
        let area = Rect::new(0, 0, 120, 40);
        let mut buf = Buffer::empty(area);
        hub.render(area, &mut buf);

        assert_eq!(hub.cards.len(), 3);
        let (route, rect) = hub.cards[1];
        assert_eq!(route, Route::Coding);
        assert_eq!(
            hub.handle_click(rect.x + 1, rect.y + 1),
            ViewAction::Navigate(Route::Coding)
        );
        assert_eq!(hub.handle_click(0, 0), ViewAction::Ignored);
    }

    #[test]
    fn test_narrow_layout_stacks_cards() {
        let mut hub = hub();
        let area = Rect::new(0, 0, 40, 40);
        let mut buf = Buffer::empty(area);
        hub.render(area, &mut buf);

        let xs: Vec<u16> = hub.cards.iter().map(|(_, r)| r.x).collect();
        assert_eq!(xs, vec![1, 1, 1]);
    }
}
