use std::time::Instant;

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::{Task, describe_deadline};
use crate::ops::task_filter::{TaskFilter, compile_search};
use crate::tui::app::App;
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_to_width};

use super::helpers::{priority_color, push_highlighted_spans, spans_width};

/// Rows used above the list: filter chips and a separator
const HEADER_ROWS: u16 = 2;

pub fn render_tasks_view(frame: &mut Frame, app: &mut App, area: Rect, now: Instant) {
    let wall = app.wall_now();
    let bg = app.theme.background;
    let width = area.width as usize;

    render_filter_header(frame, app, area, wall);
    if area.height <= HEADER_ROWS {
        return;
    }
    let list_area = Rect::new(area.x, area.y + HEADER_ROWS, area.width, area.height - HEADER_ROWS);

    let tasks: Vec<Task> = app.board.visible(wall).into_iter().cloned().collect();
    if tasks.is_empty() {
        let msg = if app.board.is_empty() {
            "  Nothing to do. Press R for a fresh batch."
        } else {
            "  No tasks match."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(msg, Style::default().fg(app.theme.dim).bg(bg))),
            list_area,
        );
        return;
    }

    // Each task takes one row, or three when expanded
    let heights: Vec<u16> = tasks.iter().map(|t| if t.is_expanded { 3 } else { 1 }).collect();
    app.tasks_cursor = app.tasks_cursor.min(tasks.len() - 1);
    adjust_scroll(&mut app.tasks_scroll, app.tasks_cursor, &heights, list_area.height);

    let search_re = if app.board.query.is_empty() {
        None
    } else {
        compile_search(&app.board.query)
    };

    let mut y = list_area.y;
    let bottom = list_area.y + list_area.height;
    for (idx, task) in tasks.iter().enumerate().skip(app.tasks_scroll) {
        if y >= bottom {
            break;
        }
        let selected = idx == app.tasks_cursor;
        let offset = app.board.swipes.offset_of(&task.id, now).round() as i32;
        let row = task_line(&app.theme, task, selected, wall, width, search_re.as_ref());
        render_swiped_row(frame, &app.theme, row, offset, Rect::new(list_area.x, y, list_area.width, 1));
        app.task_rows.push((y, task.id.clone()));
        y += 1;

        if task.is_expanded {
            for line in expanded_lines(app, task) {
                if y >= bottom {
                    break;
                }
                frame.render_widget(Paragraph::new(line), Rect::new(list_area.x, y, list_area.width, 1));
                app.task_rows.push((y, task.id.clone()));
                y += 1;
            }
        }
    }
}

fn render_filter_header(frame: &mut Frame, app: &App, area: Rect, wall: DateTime<Utc>) {
    let bg = app.theme.background;
    let counts = app.board.counts(wall);
    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    for filter in TaskFilter::ALL {
        let style = if filter == app.board.filter {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled(
            format!(" {} {} ", filter.label(), counts.for_filter(filter)),
            style,
        ));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }
    if !app.board.query.is_empty() {
        spans.push(Span::styled(
            format!(" /{}", app.board.query),
            Style::default().fg(app.theme.search_match_bg).bg(bg),
        ));
    }
    let header = Rect::new(area.x, area.y, area.width, area.height.min(1));
    frame.render_widget(Paragraph::new(Line::from(spans)), header);
    if area.height >= 2 {
        let sep = "\u{2500}".repeat(area.width as usize);
        frame.render_widget(
            Paragraph::new(Span::styled(sep, Style::default().fg(app.theme.dim).bg(bg))),
            Rect::new(area.x, area.y + 1, area.width, 1),
        );
    }
}

/// Keep the cursor's rows inside the window.
fn adjust_scroll(scroll: &mut usize, cursor: usize, heights: &[u16], window: u16) {
    if cursor < *scroll {
        *scroll = cursor;
        return;
    }
    loop {
        let used: u16 = heights[*scroll..=cursor].iter().sum();
        if used <= window || *scroll == cursor {
            break;
        }
        *scroll += 1;
    }
}

fn task_line<'a>(
    theme: &Theme,
    task: &Task,
    selected: bool,
    wall: DateTime<Utc>,
    width: usize,
    search_re: Option<&regex::Regex>,
) -> Line<'a> {
    let row_bg = if selected { theme.selection_bg } else { theme.background };
    let base = Style::default().fg(theme.text).bg(row_bg);
    let dim = Style::default().fg(theme.dim).bg(row_bg);

    let mut spans: Vec<Span> = Vec::new();
    spans.push(Span::styled(
        if selected { " \u{25B8} " } else { "   " },
        Style::default().fg(theme.highlight).bg(row_bg),
    ));
    if task.completed {
        spans.push(Span::styled("[x] ", Style::default().fg(theme.green).bg(row_bg)));
    } else {
        spans.push(Span::styled("[ ] ", dim));
    }

    let marker = task.priority.marker();
    spans.push(Span::styled(
        format!("{:<3} ", marker),
        Style::default().fg(priority_color(theme, task.priority)).bg(row_bg).add_modifier(Modifier::BOLD),
    ));

    let title_style = if task.completed {
        dim.add_modifier(Modifier::CROSSED_OUT)
    } else if selected {
        Style::default().fg(theme.text_bright).bg(row_bg)
    } else {
        base
    };
    let highlight = Style::default().fg(theme.search_match_fg).bg(theme.search_match_bg);

    // Right side: category and deadline
    let deadline = describe_deadline(task.deadline, wall);
    let deadline_style = if task.is_urgent(wall) {
        Style::default().fg(theme.red).bg(row_bg)
    } else {
        dim
    };
    let right = vec![
        Span::styled(format!(" {} ", task.category.label()), Style::default().fg(theme.cyan).bg(row_bg)),
        Span::styled(format!("{:>10} ", deadline), deadline_style),
    ];

    let title_room = width.saturating_sub(spans_width(&spans) + spans_width(&right));
    let title = truncate_to_width(&task.title, title_room);
    push_highlighted_spans(&mut spans, &title, title_style, highlight, search_re);

    let used = spans_width(&spans) + spans_width(&right);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    spans.extend(right);
    Line::from(spans)
}

/// A row shifted sideways by its swipe offset, with the action it will
/// trigger revealed behind it.
fn render_swiped_row(frame: &mut Frame, theme: &Theme, row: Line, offset: i32, area: Rect) {
    if offset == 0 {
        frame.render_widget(Paragraph::new(row), area);
        return;
    }
    let width = area.width as i32;
    let shift = offset.clamp(-width, width);

    let (reveal, color) = if shift < 0 {
        (" delete \u{2717} ", theme.red)
    } else {
        (" \u{2713} done ", theme.green)
    };
    let reveal_w = shift.unsigned_abs() as usize;
    let label = if display_width(reveal) <= reveal_w { reveal } else { "" };
    let fill = Style::default().fg(theme.background).bg(color).add_modifier(Modifier::BOLD);
    let reveal_text = if shift < 0 {
        format!("{:>w$}", label, w = reveal_w)
    } else {
        format!("{:<w$}", label, w = reveal_w)
    };

    let reveal_x = if shift < 0 { area.x as i32 + width + shift } else { area.x as i32 };
    let reveal_rect = Rect::new(reveal_x as u16, area.y, reveal_w as u16, 1).intersection(area);
    frame.render_widget(Paragraph::new(Span::styled(reveal_text, fill)), reveal_rect);

    let row_w = (width - shift.abs()) as u16;
    if row_w == 0 {
        return;
    }
    if shift > 0 {
        let rect = Rect::new(area.x + shift as u16, area.y, row_w, 1);
        frame.render_widget(Paragraph::new(row), rect);
    } else {
        // Sliding left: drop the first |shift| cells of the row
        let rect = Rect::new(area.x, area.y, row_w, 1);
        frame.render_widget(Paragraph::new(row).scroll((0, (-shift) as u16)), rect);
    }
}

fn expanded_lines<'a>(app: &App, task: &Task) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let width = (app.screen_width as usize).saturating_sub(10);
    let mut lines = vec![Line::from(vec![
        Span::styled("         ", dim),
        Span::styled(truncate_to_width(&task.description, width), Style::default().fg(app.theme.text).bg(bg)),
    ])];

    let mut second = vec![
        Span::styled("         ", dim),
        Span::styled(
            format!("{} {}", task.personality.label(), task.personality.catchphrase()),
            Style::default().fg(app.theme.purple).bg(bg).add_modifier(Modifier::ITALIC),
        ),
    ];
    if !task.relationships.is_empty() {
        second.push(Span::styled(
            format!("  \u{2194} {} linked", task.relationships.len()),
            dim,
        ));
    }
    lines.push(Line::from(second));
    lines
}
