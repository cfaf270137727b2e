//! Source pane with C-minus highlighting
//!
//! Shows the program being parsed and marks the line of the current token.
//! When the parse failed, the line of the failing step is drawn in the error
//! style.

use crate::ui::theme::PALETTE;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Highlight one source line. `in_comment` carries an open `/* ... */`
/// across lines.
fn highlight_line<'a>(line: &'a str, in_comment: &mut bool) -> Line<'a> {
    let mut spans = Vec::new();
    let mut word_start: Option<usize> = None;
    let mut comment_start = if *in_comment { Some(0) } else { None };
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if let Some(start) = comment_start {
            if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                spans.push(Span::styled(
                    &line[start..i + 2],
                    Style::default().fg(PALETTE.muted),
                ));
                comment_start = None;
                *in_comment = false;
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }

        let c = bytes[i];
        if c.is_ascii_alphanumeric() {
            word_start.get_or_insert(i);
            i += 1;
            continue;
        }

        if let Some(start) = word_start.take() {
            spans.push(word_span(&line[start..i], c == b'('));
        }

        if c == b'/' && bytes.get(i + 1) == Some(&b'*') {
            comment_start = Some(i);
            *in_comment = true;
            i += 2;
            continue;
        }

        let style = match c {
            b'{' | b'}' | b'(' | b')' | b'[' | b']' => Style::default().fg(PALETTE.accent),
            _ => Style::default().fg(PALETTE.text),
        };
        let width = line[i..].chars().next().map_or(1, char::len_utf8);
        spans.push(Span::styled(&line[i..i + width], style));
        i += width;
    }

    if let Some(start) = comment_start {
        spans.push(Span::styled(
            &line[start..],
            Style::default().fg(PALETTE.muted),
        ));
    } else if let Some(start) = word_start {
        spans.push(word_span(&line[start..], false));
    }

    Line::from(spans)
}

fn word_span(word: &str, is_call: bool) -> Span<'_> {
    let style = match word.to_ascii_lowercase().as_str() {
        "int" | "void" => Style::default().fg(PALETTE.type_spec),
        "if" | "else" | "while" | "return" | "input" | "output" => Style::default()
            .fg(PALETTE.keyword)
            .add_modifier(Modifier::BOLD),
        _ if word.bytes().all(|b| b.is_ascii_digit()) => {
            Style::default().fg(PALETTE.literal)
        }
        _ if is_call => Style::default().fg(PALETTE.callable),
        _ => Style::default().fg(PALETTE.text),
    };
    Span::styled(word, style)
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the source pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    is_error: bool,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(PALETTE.focus_border)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(PALETTE.idle_border)
    };

    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the current line at the target row
    if current_line > 0 && current_line <= total_lines {
        scroll_state.offset = (current_line - 1).saturating_sub(target_row);
        if total_lines > visible_height {
            scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
        } else {
            scroll_state.offset = 0;
        }
    }

    // Comment state has to be tracked from the top, including hidden lines
    let mut in_comment = false;
    let highlighted: Vec<Line> = lines
        .iter()
        .map(|line| highlight_line(line, &mut in_comment))
        .collect();

    let visible_lines: Vec<Line> = highlighted
        .into_iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, mut content)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;

            let num_style = if is_current && is_error {
                Style::default()
                    .fg(PALETTE.rejected)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default()
                    .fg(PALETTE.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(PALETTE.muted)
            };

            if is_current && is_error {
                let error_style = Style::default()
                    .bg(PALETTE.rejected)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
                for span in &mut content.spans {
                    span.style = error_style;
                }
            } else if is_current {
                let current = Style::default().bg(PALETTE.cursor_bg);
                for span in &mut content.spans {
                    span.style = span.style.patch(current);
                }
            }

            let mut spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_comment_spans_lines() {
        let mut in_comment = false;
        let first = highlight_line("int x; /* open", &mut in_comment);
        assert!(in_comment);
        assert_eq!(texts(&first).last().unwrap(), "/* open");

        let second = highlight_line("still */ y", &mut in_comment);
        assert!(!in_comment);
        assert_eq!(texts(&second)[0], "still */");
    }

    #[test]
    fn test_words_and_symbols_split() {
        let mut in_comment = false;
        let line = highlight_line("f(12);", &mut in_comment);
        assert_eq!(texts(&line), vec!["f", "(", "12", ")", ";"]);
        assert_eq!(line.spans[0].style.fg, Some(PALETTE.callable));
        assert_eq!(line.spans[2].style.fg, Some(PALETTE.literal));
    }
}
