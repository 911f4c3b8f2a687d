//! TextBlock Widget
//!
//! A borderless, scrollable text region. Paragraph breaks in the source
//! are kept; each paragraph is wrapped to the area width.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines at the last render
    pub total_lines: usize,
    /// Visible lines at the last render
    pub viewport: usize,
}

impl TextBlockState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
        self.clamp();
    }

    /// Scroll by one screen (positive = down)
    pub fn page(&mut self, pages: isize) {
        let page = isize::try_from(self.viewport.max(1)).unwrap_or(1);
        self.scroll(pages.saturating_mul(page));
    }

    /// Back to the first line
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    /// Whether more text lies below the viewport
    pub fn has_more_below(&self) -> bool {
        self.scroll_offset + self.viewport < self.total_lines
    }

    fn clamp(&mut self) {
        let max_scroll = self.total_lines.saturating_sub(self.viewport);
        self.scroll_offset = self.scroll_offset.min(max_scroll);
    }
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
}

impl<'a> TextBlock<'a> {
    /// Block over `content`
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
        }
    }

    /// Text style
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// Wrap `content` to `width`, keeping blank lines
pub fn wrap_lines(content: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    content
        .lines()
        .flat_map(|line| {
            let line = line.trim_end();
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.to_string())
                    .collect()
            }
        })
        .collect()
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.is_empty() {
            return;
        }

        let wrapped = wrap_lines(self.content, usize::from(area.width));

        state.total_lines = wrapped.len();
        state.viewport = usize::from(area.height);
        state.clamp();

        // Render visible lines
        for (i, line) in wrapped
            .iter()
            .skip(state.scroll_offset)
            .take(state.viewport)
            .enumerate()
        {
            let y = area.y + i as u16;
            buf.set_stringn(area.x, y, line, usize::from(area.width), self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(content: &str, state: &mut TextBlockState) -> Buffer {
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        TextBlock::new(content).render(area, &mut buf, state);
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_wraps_and_keeps_blank_lines() {
        let lines = wrap_lines("one two three four\n\nfive", 9);
        assert_eq!(lines, vec!["one two", "three", "four", "", "five"]);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut state = TextBlockState::default();
        let text = "a\nb\nc\nd\ne";
        render(text, &mut state);
        assert_eq!(state.total_lines, 5);
        assert!(state.has_more_below());

        state.scroll(100);
        assert_eq!(state.scroll_offset, 2);
        let buf = render(text, &mut state);
        assert_eq!(row(&buf, 0), "c");
        assert!(!state.has_more_below());

        state.scroll(-100);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_page_moves_by_viewport() {
        let mut state = TextBlockState::default();
        render("1\n2\n3\n4\n5\n6\n7", &mut state);
        state.page(1);
        assert_eq!(state.scroll_offset, 3);
        state.page(-1);
        assert_eq!(state.scroll_offset, 0);
    }
}
