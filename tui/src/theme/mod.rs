//! Theme and Colors
//!
//! The cosmos palette: deep space black, starlight white and the cyan of
//! the warp streaks, with a violet accent for selection.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Space Palette
// ============================================================================

/// Warp streaks, titles and selection borders (#0ed8d9)
pub const COSMIC_CYAN: Color = Color::Rgb(14, 216, 217);

/// Dimmed cyan for inactive chrome
pub const COSMIC_CYAN_DIM: Color = Color::Rgb(8, 110, 112);

/// Starlight body text
pub const STARLIGHT: Color = Color::Rgb(230, 232, 240);

/// Nebula violet accent
pub const NEBULA_VIOLET: Color = Color::Rgb(168, 120, 255);

/// Warm highlight for years and tags
pub const SOLAR_GOLD: Color = Color::Rgb(240, 196, 90);

// ============================================================================
// UI Colors
// ============================================================================

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Secondary text
pub const MUTED_GRAY: Color = Color::Rgb(150, 150, 160);

// ============================================================================
// Styles
// ============================================================================

/// Large headings
pub fn title_style() -> Style {
    Style::default()
        .fg(COSMIC_CYAN)
        .add_modifier(Modifier::BOLD)
}

/// Regular body text
pub fn body_style() -> Style {
    Style::default().fg(STARLIGHT)
}

/// Secondary text
pub fn muted_style() -> Style {
    Style::default().fg(MUTED_GRAY)
}

/// Selected list item or card
pub fn selected_style() -> Style {
    Style::default()
        .fg(NEBULA_VIOLET)
        .add_modifier(Modifier::BOLD)
}

/// Chips and tags
pub fn chip_style() -> Style {
    Style::default().fg(SOLAR_GOLD)
}
