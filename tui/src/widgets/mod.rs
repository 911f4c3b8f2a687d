//! Widgets
//!
//! Small building blocks shared by the views.

mod text_block;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthStr;

use crate::theme;

pub use text_block::{wrap_lines, TextBlock, TextBlockState};

/// Cut `text` to at most `width` columns, marking the cut with `…`
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Write `text` at `(x, y)` clipped to `area`; rows outside are skipped
pub fn put_line(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    let bounds = area.intersection(buf.area);
    if y < bounds.top() || y >= bounds.bottom() || x < bounds.left() || x >= bounds.right() {
        return;
    }
    buf.set_stringn(x, y, text, usize::from(bounds.right() - x), style);
}

/// Write `text` centred on row `y` of `area`
pub fn centered_line(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let text = fit_width(text, usize::from(area.width));
    let width = u16::try_from(text.width()).unwrap_or(area.width);
    let x = area.x + area.width.saturating_sub(width) / 2;
    put_line(buf, area, x, y, &text, style);
}

/// Render `[ A ]  B   C` style chips on the first row of `area`; returns
/// the area each drawn chip took
pub fn chips(buf: &mut Buffer, area: Rect, labels: &[&str], selected: Option<usize>) -> Vec<Rect> {
    let mut areas = Vec::with_capacity(labels.len());
    if area.height == 0 {
        return areas;
    }

    let mut cursor = area.x;
    for (i, label) in labels.iter().enumerate() {
        let is_selected = selected == Some(i);
        let text = if is_selected {
            format!("[ {label} ]")
        } else {
            format!("  {label}  ")
        };
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        if cursor.saturating_add(width) > area.right() {
            break;
        }
        let style = if is_selected {
            theme::selected_style()
        } else {
            theme::chip_style()
        };
        put_line(buf, area, cursor, area.y, &text, style);
        areas.push(Rect::new(cursor, area.y, width, 1));
        cursor = cursor.saturating_add(width + 1);
    }
    areas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("short", 10), "short");
        assert_eq!(fit_width("a longer title", 8), "a longe…");
        assert_eq!(fit_width("abc", 0), "");
    }

    #[test]
    fn test_chips_stop_at_edge() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 1));
        let areas = chips(
            &mut buf,
            Rect::new(0, 0, 20, 1),
            &["ALL", "BOOK", "POETRY"],
            Some(0),
        );
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0], Rect::new(0, 0, 7, 1));
        assert_eq!(buf[(0, 0)].symbol(), "[");
    }

    #[test]
    fn test_put_line_skips_rows_outside_area() {
        let area = Rect::new(0, 0, 5, 2);
        let mut buf = Buffer::empty(area);
        put_line(&mut buf, area, 0, 5, "hello", Style::default());
        put_line(&mut buf, area, 3, 1, "hello", Style::default());
        assert_eq!(buf[(3, 1)].symbol(), "h");
        assert_eq!(buf[(4, 1)].symbol(), "e");
    }
}
