use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::distortion::format_time;
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

/// Greeting for the hour of day
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        17..=21 => "Good evening",
        _ => "Burning the midnight oil",
    }
}

/// Local midnight today, as UTC
fn start_of_today() -> DateTime<Utc> {
    let now = Local::now();
    let midnight = now.date_naive().and_hms_opt(0, 0, 0);
    midnight
        .and_then(|m| Local.from_local_datetime(&m).earliest())
        .map_or_else(Utc::now, |m| m.with_timezone(&Utc))
}

pub fn render_dashboard_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let header = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text_bright).bg(bg);
    let text = Style::default().fg(app.theme.text).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(" {} \u{2728}", greeting(Local::now().hour())),
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let stats = app.sessions.stats_since(start_of_today());
    lines.push(Line::from(Span::styled(" Today", header)));
    let stat = |name: &str, v: String| {
        Line::from(vec![
            Span::styled(format!("   {:<14}", name), label),
            Span::styled(v, value),
        ])
    };
    lines.push(stat(
        "sessions",
        format!("{} ({} completed)", stats.sessions, stats.completed),
    ));
    lines.push(stat("focused", format!("{} min", stats.focused_secs / 60)));
    lines.push(stat("distractions", stats.distractions.to_string()));
    lines.push(stat("peak warp", stats.peak_level.to_string()));
    lines.push(Line::from(""));

    let counts = app.board.counts(app.wall_now());
    lines.push(Line::from(Span::styled(" Tasks", header)));
    lines.push(Line::from(vec![
        Span::styled(format!("   {} active", counts.active), text),
        Span::styled("  \u{00B7}  ", label),
        Span::styled(
            format!("{} urgent", counts.urgent),
            Style::default().fg(app.theme.red).bg(bg),
        ),
        Span::styled("  \u{00B7}  ", label),
        Span::styled(
            format!("{} done", counts.completed),
            Style::default().fg(app.theme.green).bg(bg),
        ),
    ]));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Recent sessions", header)));
    if app.sessions.is_empty() {
        lines.push(Line::from(Span::styled(
            "   No sessions yet. Press f to start focusing.",
            label,
        )));
    }
    let cursor = app.dashboard_cursor;
    for (i, record) in app.sessions.recent().enumerate() {
        let selected = i == cursor;
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let mark = if record.completed { "\u{2713}" } else { "\u{2717}" };
        let mark_color = if record.completed { app.theme.green } else { app.theme.red };
        let when = record.started_at.with_timezone(&Local).format("%H:%M");
        let body = format!(
            " {} {:<7} {:>8}  warp {}",
            when,
            record.mode.label(),
            format_time(record.focused_secs),
            record.peak_level
        );
        lines.push(Line::from(vec![
            Span::styled(if selected { " \u{25B8} " } else { "   " }, Style::default().fg(app.theme.highlight).bg(row_bg)),
            Span::styled(mark, Style::default().fg(mark_color).bg(row_bg)),
            Span::styled(truncate_to_width(&body, width.saturating_sub(4)), Style::default().fg(app.theme.text).bg(row_bg)),
        ]));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
