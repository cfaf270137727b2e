//! Parser stack pane
//!
//! Lists the symbol stack top first, under a header with the step's action,
//! the semantic context and the block depth.

use crate::snapshot::{Action, ParseSnapshot};
use crate::ui::theme::PALETTE;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the parser stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&ParseSnapshot>,
    terminals: &[String],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(PALETTE.focus_border)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(PALETTE.idle_border)
    };

    let block = Block::default()
        .title(" Parser Stack ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let Some(snapshot) = snapshot else {
        let list = List::new(vec![
            ListItem::new("(no steps recorded)").style(Style::default().fg(PALETTE.muted))
        ])
        .block(block);
        frame.render_widget(list, area);
        return;
    };

    let label = Style::default().fg(PALETTE.muted);
    let action_style = match snapshot.action {
        Action::Reject { .. } => Style::default().fg(PALETTE.rejected),
        Action::Accept => Style::default().fg(PALETTE.accepted),
        _ => Style::default().fg(PALETTE.highlight),
    };

    let mut items = vec![
        ListItem::new(Line::from(vec![
            Span::styled("token   ", label),
            Span::styled(
                snapshot.token.clone(),
                Style::default()
                    .fg(PALETTE.text)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  (line {})", snapshot.line), label),
        ])),
        ListItem::new(Line::from(vec![
            Span::styled("action  ", label),
            Span::styled(snapshot.action.to_string(), action_style),
        ])),
        ListItem::new(Line::from(vec![
            Span::styled("context ", label),
            Span::styled(
                snapshot.context.to_string(),
                Style::default().fg(PALETTE.accent),
            ),
            Span::styled(format!("  depth {}", snapshot.depth), label),
        ])),
        ListItem::new(Line::from(Span::styled("─".repeat(area.width as usize), label))),
    ];

    for (i, symbol) in snapshot.stack.iter().rev().enumerate() {
        let is_terminal = terminals.iter().any(|t| t == symbol);
        let mut style = if is_terminal {
            Style::default().fg(PALETTE.text)
        } else {
            Style::default().fg(PALETTE.nonterminal)
        };
        let marker = if i == 0 {
            style = style.add_modifier(Modifier::BOLD);
            "▸ "
        } else {
            "  "
        };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(marker, Style::default().fg(PALETTE.highlight)),
            Span::styled(symbol.clone(), style),
        ])));
    }

    let total_items = items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();
    frame.render_widget(List::new(visible).block(block), area);
}
