//! Bottom bar: step counter, message, key hints and the parse outcome

use crate::ui::theme::PALETTE;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const KEY_HINTS: [(&str, &str); 5] = [
    ("←/→", "step"),
    ("1-9", "skip"),
    ("⎵", "play"),
    ("↵/⌫", "end/start"),
    ("q", "quit"),
];

fn bar() -> Style {
    Style::default().bg(PALETTE.cursor_bg)
}

fn badge(text: String, bg: Color) -> Span<'static> {
    Span::styled(
        text,
        Style::default()
            .bg(bg)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
}

/// Badge for the far right, if the position warrants one.
fn outcome_badge(step: usize, total: usize, failed: bool, playing: bool) -> Option<Span<'static>> {
    let at_end = step + 1 >= total;
    match (playing, at_end, failed) {
        (true, _, _) => Some(badge(" ▶ PLAYING ".into(), PALETTE.highlight)),
        (false, true, true) => Some(badge(" REJECTED ".into(), PALETTE.rejected)),
        (false, true, false) => Some(badge(" ACCEPTED ".into(), PALETTE.accepted)),
        _ => None,
    }
}

pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    step: usize,
    total: usize,
    failed: bool,
    playing: bool,
) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let counter_bg = if failed { PALETTE.rejected } else { PALETTE.accent };
    let left = Line::from(vec![
        badge(format!(" {}/{} ", step + 1, total.max(1)), counter_bg),
        Span::styled(format!(" {} ", message), bar().fg(PALETTE.text)),
    ]);
    frame.render_widget(
        Paragraph::new(left).style(bar()).alignment(Alignment::Left),
        halves[0],
    );

    let key = Style::default().bg(PALETTE.muted).fg(Color::Black);
    let mut right: Vec<Span> = Vec::new();
    for (i, (keys, action)) in KEY_HINTS.iter().enumerate() {
        if i > 0 {
            right.push(Span::styled(" ", bar()));
        }
        right.push(Span::styled(format!(" {} ", keys), key));
        right.push(Span::styled(format!(" {}", action), bar().fg(PALETTE.text)));
    }
    if let Some(outcome) = outcome_badge(step, total, failed, playing) {
        right.push(Span::styled(" │ ", bar().fg(PALETTE.muted)));
        right.push(outcome);
    }
    frame.render_widget(
        Paragraph::new(Line::from(right))
            .style(bar())
            .alignment(Alignment::Right),
        halves[1],
    );
}
