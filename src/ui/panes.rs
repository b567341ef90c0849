//! Stateless render functions for each pane of the trace viewer
//!
//! - source: program text with the current line highlighted
//! - scopes: the visible scope chain, innermost first
//! - output: what the program had printed before the current step
//! - status bar: step counter, message and key bindings

use crate::snapshot::{ScopeView, Snapshot};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `offset` so the last page of `total` rows stays filled
fn clamp_scroll(offset: &mut usize, total: usize, visible_height: usize) {
    if total > visible_height {
        *offset = (*offset).min(total - visible_height);
    } else {
        *offset = 0;
    }
}

/// Simple syntax highlighting for one line of the accepted subset
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    for (i, c) in line.char_indices() {
        if c.is_ascii_alphanumeric() || c == '_' {
            current_word.push(c);
            continue;
        }

        if !current_word.is_empty() {
            let is_func = line[i..].starts_with('(');
            let style = keyword_style(&current_word, is_func);
            spans.push(Span::styled(std::mem::take(&mut current_word), style));
        }

        let style = match c {
            '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.accent),
            _ => Style::default().fg(DEFAULT_THEME.text),
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    if !current_word.is_empty() {
        let style = keyword_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn keyword_style(word: &str, is_function: bool) -> Style {
    match word {
        "int" => Style::default().fg(DEFAULT_THEME.type_name),
        "return" | "if" | "else" | "while" | "for" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "cin" | "cout" | "endl" | "putchar" => Style::default().fg(DEFAULT_THEME.function),
        _ if word.starts_with(|c: char| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ if is_function => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.text),
    }
}

/// Render the source code pane, keeping `current_line` in view
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    is_error: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Source Code ", false);
    let lines: Vec<&str> = source_code.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the current line roughly centred
    if current_line > 0 && current_line <= lines.len() {
        *scroll_offset = (current_line - 1).saturating_sub(visible_height / 2);
    }
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;

            let (num_style, background) = match (is_current, is_error) {
                (true, true) => (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Some(Style::default().bg(DEFAULT_THEME.error).fg(Color::White)),
                ),
                (true, false) => (
                    Style::default()
                        .fg(DEFAULT_THEME.current_line)
                        .add_modifier(Modifier::BOLD),
                    Some(Style::default().bg(DEFAULT_THEME.highlight_bg)),
                ),
                _ => (Style::default().fg(DEFAULT_THEME.muted), None),
            };

            let mut content = highlight_source_code(line);
            if let Some(background) = background {
                for span in &mut content.spans {
                    span.style = span.style.patch(background);
                }
            }

            let mut spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}

fn scope_title(index: usize, scope: &ScopeView, function: &str, scope_count: usize) -> String {
    if index + 1 == scope_count {
        format!("root scope #{}", scope.depth)
    } else if index == 0 {
        format!("{}() scope #{}", function, scope.depth)
    } else {
        format!("scope #{}", scope.depth)
    }
}

/// Render the scope chain visible at the current step
pub fn render_scopes_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&Snapshot>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Scopes ", is_focused);

    let Some(snapshot) = snapshot else {
        let paragraph = Paragraph::new("(no trace)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.muted));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut items: Vec<ListItem> = Vec::new();
    let scope_count = snapshot.scopes.len();
    for (index, scope) in snapshot.scopes.iter().enumerate() {
        items.push(ListItem::new(Line::from(Span::styled(
            scope_title(index, scope, &snapshot.function, scope_count),
            Style::default()
                .fg(DEFAULT_THEME.accent)
                .add_modifier(Modifier::BOLD),
        ))));

        if scope.values.is_empty() {
            items.push(ListItem::new(Span::styled(
                "  (empty)",
                Style::default().fg(DEFAULT_THEME.muted),
            )));
        }
        for (key, value) in &scope.values {
            let name_color = if scope.declared_here.contains(key) {
                DEFAULT_THEME.declared
            } else {
                DEFAULT_THEME.text
            };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!("  {}", key), Style::default().fg(name_color)),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.muted)),
                Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.number)),
            ])));
        }
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, items.len(), visible_height);

    let visible_items: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();
    frame.render_widget(List::new(visible_items).block(block), area);
}

/// Render the program output pane
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[String],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ", is_focused);

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.muted));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible_items: Vec<ListItem> = lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| ListItem::new(line.as_str()).style(Style::default().fg(DEFAULT_THEME.text)))
        .collect();
    frame.render_widget(List::new(visible_items).block(block), area);
}

/// Render the status bar at the bottom.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    current_step: usize,
    total_steps: usize,
    has_error: bool,
    is_playing: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let step_bg = if has_error {
        DEFAULT_THEME.error
    } else {
        DEFAULT_THEME.accent
    };
    let left_spans = vec![
        Span::styled(
            format!(" Step {}/{} ", current_step + 1, total_steps.max(1)),
            Style::default()
                .bg(step_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.highlight_bg)
                .fg(if has_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.text
                }),
        ),
    ];
    let left = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.highlight_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.muted).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.highlight_bg)
        .fg(DEFAULT_THEME.text);

    let mut right_spans = vec![
        Span::styled(" ←/→ ", key_style),
        Span::styled(" step ", desc_style),
        Span::styled(" ⎵ ", key_style),
        Span::styled(" play ", desc_style),
        Span::styled(" Home/End ", key_style),
        Span::styled(" start/end ", desc_style),
        Span::styled(" q ", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let badge = if is_playing {
        Some((" ▶ PLAYING ", DEFAULT_THEME.current_line))
    } else if current_step + 1 >= total_steps {
        Some((" END ", DEFAULT_THEME.error))
    } else if current_step == 0 {
        Some((" START ", DEFAULT_THEME.accent))
    } else {
        None
    };
    if let Some((text, color)) = badge {
        right_spans.push(Span::styled(
            text,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.highlight_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right, layout[1]);
}
