use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::model::distortion::{active_effects, format_time};
use crate::model::task::{RelationshipKind, describe_deadline};
use crate::tui::app::App;

use super::helpers::priority_color;

fn field<'a>(app: &App, name: &str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("   {:<14}", name),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ),
        value,
    ])
}

fn not_found(frame: &mut Frame, app: &App, area: Rect, what: &str, id: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {} not found: {}", what, id),
            Style::default().fg(app.theme.red).bg(app.theme.background),
        )),
        Line::from(Span::styled(
            " Esc to go back",
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

pub fn render_session_detail(frame: &mut Frame, app: &App, area: Rect, id: &str) {
    let record = match app.sessions.get(id) {
        Some(r) => r.clone(),
        None => return not_found(frame, app, area, "Session", id),
    };
    let bg = app.theme.background;
    let value = |s: String| Span::styled(s, Style::default().fg(app.theme.text_bright).bg(bg));

    let (outcome, color) = if record.completed {
        ("completed", app.theme.green)
    } else {
        ("interrupted", app.theme.yellow)
    };
    let effects: Vec<&str> = active_effects(record.peak_level).iter().map(|e| e.label()).collect();

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} session", record.mode.label()),
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", outcome), Style::default().fg(color).bg(bg)),
        ]),
        Line::from(""),
        field(app, "planned", value(format_time(record.planned_secs))),
        field(
            app,
            "focused",
            value(format!("{} ({}%)", format_time(record.focused_secs), record.completion_percent())),
        ),
        field(app, "distractions", value(record.distractions.to_string())),
        field(app, "peak warp", value(record.peak_level.to_string())),
        field(
            app,
            "effects seen",
            value(if effects.is_empty() { "none".into() } else { effects.join(", ") }),
        ),
        field(
            app,
            "started",
            value(record.started_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        field(
            app,
            "ended",
            value(record.ended_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

pub fn render_task_detail(frame: &mut Frame, app: &App, area: Rect, id: &str) {
    let task = match app.board.get(id) {
        Some(t) => t.clone(),
        None => return not_found(frame, app, area, "Task", id),
    };
    let bg = app.theme.background;
    let wall = app.wall_now();
    let text = Style::default().fg(app.theme.text_bright).bg(bg);

    let (status, status_color) = if task.completed {
        ("done", app.theme.green)
    } else if task.is_overdue(wall) {
        ("overdue", app.theme.red)
    } else if task.is_urgent(wall) {
        ("urgent", app.theme.red)
    } else {
        ("open", app.theme.text)
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", task.title),
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {}", task.description),
            Style::default().fg(app.theme.text).bg(bg),
        )),
        Line::from(""),
        field(app, "status", Span::styled(status, Style::default().fg(status_color).bg(bg))),
        field(
            app,
            "priority",
            Span::styled(
                task.priority.label(),
                Style::default().fg(priority_color(&app.theme, task.priority)).bg(bg),
            ),
        ),
        field(app, "category", Span::styled(task.category.label(), text)),
        field(
            app,
            "deadline",
            Span::styled(
                format!(
                    "{} ({})",
                    task.deadline.with_timezone(&Local).format("%a %H:%M"),
                    describe_deadline(task.deadline, wall)
                ),
                text,
            ),
        ),
        field(
            app,
            "personality",
            Span::styled(
                format!("{} {}", task.personality.label(), task.personality.catchphrase()),
                Style::default().fg(app.theme.purple).bg(bg),
            ),
        ),
        Line::from(""),
        Line::from(Span::styled(
            " Relationships",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    if task.relationships.is_empty() {
        lines.push(Line::from(Span::styled(
            "   keeps to itself",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }
    for rel in &task.relationships {
        let (icon, color) = match rel.kind {
            RelationshipKind::Friend => ("\u{2665}", app.theme.green),
            RelationshipKind::Frenemy => ("\u{2694}", app.theme.red),
        };
        let title = app
            .board
            .get(&rel.task_id)
            .map_or_else(|| format!("({} is gone)", rel.task_id), |t| t.title.clone());
        lines.push(Line::from(vec![
            Span::styled(format!("   {} ", icon), Style::default().fg(color).bg(bg)),
            Span::styled(format!("{:<8}", rel.kind.label()), Style::default().fg(app.theme.dim).bg(bg)),
            Span::styled(title, Style::default().fg(app.theme.text).bg(bg)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
