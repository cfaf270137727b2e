//! Colors for the trace viewer

use ratatui::style::Color;

/// Semantic color roles; panes pick by role, never by hue.
pub struct Palette {
    pub text: Color,
    pub accent: Color,
    pub highlight: Color,
    pub muted: Color,
    pub accepted: Color,
    pub rejected: Color,
    pub keyword: Color,
    pub literal: Color,
    pub focus_border: Color,
    pub idle_border: Color,
    /// Background of the line the parser is on, and of the status bar
    pub cursor_bg: Color,
    pub callable: Color,
    pub type_spec: Color,
    /// Nonterminals on the parse stack
    pub nonterminal: Color,
}

pub const PALETTE: Palette = Palette {
    text: Color::Rgb(205, 214, 244),
    accent: Color::Rgb(137, 180, 250),
    highlight: Color::Rgb(250, 179, 135),
    muted: Color::Rgb(108, 112, 134),
    accepted: Color::Rgb(166, 227, 161),
    rejected: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(137, 180, 250),
    literal: Color::Rgb(250, 179, 135),
    focus_border: Color::Rgb(249, 226, 175),
    idle_border: Color::Rgb(108, 112, 134),
    cursor_bg: Color::Rgb(50, 50, 70),
    callable: Color::Rgb(249, 226, 175),
    type_spec: Color::Rgb(148, 226, 213),
    nonterminal: Color::Rgb(203, 166, 247),
};
