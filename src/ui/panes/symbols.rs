//! Scope and symbol table pane

use crate::parser::scope::ScopeLevel;
use crate::parser::symtab::Role;
use crate::snapshot::ParseSnapshot;
use crate::ui::theme::PALETTE;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render visible scope entries followed by the symbol table
pub fn render_symbols_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&ParseSnapshot>,
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
        .title(" Scopes & Symbols ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let heading = Style::default()
        .fg(PALETTE.highlight)
        .add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(PALETTE.muted);

    let mut items = vec![ListItem::new(Line::from(Span::styled("In scope", heading)))];
    match snapshot {
        Some(s) if !s.scopes.is_empty() => {
            for (name, level) in &s.scopes {
                let level_style = match level {
                    ScopeLevel::Global => Style::default().fg(PALETTE.accent),
                    ScopeLevel::Block(_) => muted,
                };
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(format!("  {:<12}", name), Style::default().fg(PALETTE.text)),
                    Span::styled(level.to_string(), level_style),
                ])));
            }
        }
        _ => items.push(ListItem::new(Span::styled("  (none)", muted))),
    }

    items.push(ListItem::new(""));
    items.push(ListItem::new(Line::from(Span::styled("Symbols", heading))));
    if let Some(s) = snapshot {
        for entry in &s.symbols {
            let role_style = match entry.role {
                Role::Unresolved => muted,
                Role::Function { .. } => Style::default().fg(PALETTE.callable),
                Role::Variable { .. } => Style::default().fg(PALETTE.text),
                Role::Parameter => Style::default().fg(PALETTE.type_spec),
            };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!("  {:<12}", entry.name), Style::default().fg(PALETTE.text)),
                Span::styled(entry.role.to_string(), role_style),
            ])));
        }
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
