//! Frame rendering.
//!
//! # Responsibility
//! - Draw the header, the visible tree with branch glyphs, and the footer.
//!
//! # Invariants
//! - Rendering reads the session only; scroll is the sole state it updates.

use std::collections::HashSet;

use outline_core::{DocumentRepository, RowView, Session};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::text_input::TextInput;

const BAR: Style = Style::new().fg(Color::Black).bg(Color::Indexed(227));
const CURSOR_ROW: Style = Style::new().fg(Color::Indexed(230)).bg(Color::Indexed(63));
const NOTICE: Style = Style::new().fg(Color::Indexed(208));

pub fn draw<R: DocumentRepository>(
    frame: &mut Frame,
    session: &Session<R>,
    input: &TextInput,
    status: Option<&str>,
    scroll: &mut usize,
) {
    let [header, _, body, footer, notice] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(Paragraph::new(Line::styled(session.header(), BAR)), header);

    let rows = session.rows();
    let height = usize::from(body.height);
    *scroll = scroll_offset(session.cursor(), *scroll, height);
    let lines: Vec<Line> = tree_prefixes(&rows)
        .into_iter()
        .zip(&rows)
        .skip(*scroll)
        .take(height)
        .map(|(prefix, row)| row_line(row, prefix, input))
        .collect();
    frame.render_widget(Paragraph::new(lines), body);

    let footer_text = format!(
        "Press q to quit.      cursor: {} copied: {}",
        session.cursor(),
        session.clipboard_text()
    );
    frame.render_widget(Paragraph::new(Line::styled(footer_text, BAR)), footer);

    if let Some(status) = status {
        frame.render_widget(
            Paragraph::new(Line::styled(status.to_string(), NOTICE)),
            notice,
        );
    }
}

/// First visible row index keeping `cursor` inside a window of `height` rows.
pub fn scroll_offset(cursor: usize, scroll: usize, height: usize) -> usize {
    if height == 0 || cursor < scroll {
        cursor
    } else if cursor >= scroll + height {
        cursor + 1 - height
    } else {
        scroll
    }
}

/// Branch glyphs for each row, drawn from the sibling structure above it.
///
/// A level stays "open" (drawn as `│`) while a non-last sibling at that
/// depth is still awaiting its following siblings.
pub fn tree_prefixes(rows: &[RowView]) -> Vec<String> {
    let mut open_levels = HashSet::new();
    rows.iter()
        .map(|row| {
            let prefix = tree_prefix(row, &open_levels);
            if row.last_sibling {
                open_levels.remove(&row.depth);
            } else {
                open_levels.insert(row.depth);
            }
            prefix
        })
        .collect()
}

fn tree_prefix(row: &RowView, open_levels: &HashSet<usize>) -> String {
    let mut prefix = String::new();
    for level in 1..=row.depth {
        if level == row.depth {
            prefix.push(if row.last_sibling { '└' } else { '├' });
            let branches = row.has_children && row.expanded;
            prefix.push(match (branches, row.last_sibling) {
                (true, true) => '┬',
                (true, false) => '┐',
                (false, _) => '─',
            });
        } else if open_levels.contains(&level) {
            prefix.push('│');
        } else {
            prefix.push(' ');
        }
    }
    prefix.push_str(match (row.has_children, row.expanded) {
        (true, true) => " ▽ ",
        (true, false) => " ▶ ",
        (false, _) => " · ",
    });
    prefix
}

fn row_line<'a>(row: &'a RowView, prefix: String, input: &TextInput) -> Line<'a> {
    let mut text_style = Style::new();
    if row.ancestor_of_cursor {
        text_style = text_style.add_modifier(Modifier::BOLD);
    }
    if row.checked {
        text_style = text_style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
    }
    if row.proxy {
        text_style = text_style.add_modifier(Modifier::ITALIC);
    }

    let mut spans = vec![
        Span::raw(if row.at_cursor { "> " } else { "  " }),
        Span::raw(if row.checked { "✓" } else { " " }),
        Span::raw(prefix),
    ];
    if row.editing && input.is_focused() {
        let (before, under, after) = input.split_at_caret();
        spans.push(Span::raw(before));
        spans.push(Span::styled(
            under.unwrap_or(' ').to_string(),
            Style::new().add_modifier(Modifier::REVERSED),
        ));
        spans.push(Span::raw(after));
    } else {
        spans.push(Span::styled(row.text.as_str(), text_style));
    }
    if row.at_cursor {
        spans.push(Span::raw(" <"));
    }

    let line = Line::from(spans);
    if row.at_cursor {
        line.style(CURSOR_ROW)
    } else {
        line
    }
}
