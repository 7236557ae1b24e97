//! Color palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const AMBER: Color = Color::Rgb(255, 179, 71); // #ffb347
pub const TEAL: Color = Color::Rgb(94, 214, 190); // #5ed6be
pub const SKY: Color = Color::Rgb(130, 190, 255); // #82beff
pub const SUCCESS_GREEN: Color = Color::Rgb(125, 222, 118); // #7dde76
pub const ERROR_RED: Color = Color::Rgb(245, 101, 101); // #f56565

pub const FG: Color = Color::Rgb(205, 209, 219); // #cdd1db
pub const MUTED: Color = Color::Rgb(110, 122, 148); // #6e7a94
pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 46, 58); // #2a2e3a

// ── Semantic styles ───────────────────────────────────────────────────

/// Title text for blocks and panels.
pub fn title_style() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Border for the active panel.
pub fn border_focused() -> Style {
    Style::default().fg(AMBER)
}

/// Border for everything else.
pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(FG)
}

/// Selected table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Dimmed placeholder text (empty states, loading).
pub fn placeholder() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)
}

/// Key hint text (e.g. "q salir  ? ayuda").
pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Focused form field label.
pub fn field_focused() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Unfocused form field label.
pub fn field_label() -> Style {
    Style::default().fg(MUTED)
}

/// Form field value text.
pub fn field_value() -> Style {
    Style::default().fg(FG)
}
