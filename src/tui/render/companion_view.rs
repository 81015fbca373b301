use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::chat::Sender;
use crate::tui::app::App;
use crate::util::unicode::{display_width, wrap_words};

pub fn render_companion_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let persona = app.conversation.persona();
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    // Header: who we are talking to and how
    let mode = if app.responder.is_live() && app.responder.remaining_budget() > 0 {
        format!("live \u{00B7} {} calls left", app.responder.remaining_budget())
    } else {
        "offline".to_string()
    };
    let header = Line::from(vec![
        Span::styled(
            format!(" \u{2661} {} ", persona.name()),
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", mode), dim),
    ]);
    frame.render_widget(Paragraph::new(header), Rect::new(area.x, area.y, area.width, area.height.min(1)));
    if area.height < 3 {
        return;
    }
    let body = Rect::new(area.x, area.y + 2, area.width, area.height - 2);

    // Bubbles take up to three quarters of the width
    let bubble_w = (width * 3 / 4).max(10);
    let mut lines: Vec<Line> = Vec::new();
    for message in app.conversation.messages() {
        let stamp = message.timestamp.with_timezone(&Local).format("%H:%M").to_string();
        match message.sender {
            Sender::Bot => {
                let style = Style::default().fg(app.theme.text).bg(app.theme.selection_bg);
                lines.push(Line::from(Span::styled(format!(" {} \u{00B7} {}", persona.name(), stamp), dim)));
                for row in wrap_words(&message.text, bubble_w.saturating_sub(2)) {
                    lines.push(Line::from(vec![
                        Span::styled(" ", Style::default().bg(bg)),
                        Span::styled(format!(" {} ", row), style),
                    ]));
                }
            }
            Sender::User => {
                let style = Style::default().fg(app.theme.background).bg(app.theme.purple);
                let label = format!("you \u{00B7} {} ", stamp);
                lines.push(right_aligned(vec![Span::styled(label, dim)], width, app));
                for row in wrap_words(&message.text, bubble_w.saturating_sub(2)) {
                    lines.push(right_aligned(
                        vec![Span::styled(format!(" {} ", row), style), Span::styled(" ", Style::default().bg(bg))],
                        width,
                        app,
                    ));
                }
            }
        }
        lines.push(Line::from(""));
    }
    if app.pending_reply.is_some() {
        lines.push(Line::from(Span::styled(
            format!(" {} is typing\u{2026}", persona.name()),
            dim.add_modifier(Modifier::ITALIC),
        )));
    }

    // Pin to the bottom, then scroll back by chat_scroll lines
    let visible = body.height as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    app.chat_scroll = app.chat_scroll.min(max_scroll);
    let top = max_scroll - app.chat_scroll;
    frame.render_widget(Paragraph::new(lines).scroll((top as u16, 0)), body);
}

fn right_aligned<'a>(spans: Vec<Span<'a>>, width: usize, app: &App) -> Line<'a> {
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let mut out = vec![Span::styled(
        " ".repeat(width.saturating_sub(used)),
        Style::default().bg(app.theme.background),
    )];
    out.extend(spans);
    Line::from(out)
}
