use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::paths::abbreviate_path;
use crate::tui::app::{App, ProfileItem};

pub fn render_profile_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let header = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let settings = app.settings.current();

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(" Settings", header)), Line::from("")];

    for (i, item) in ProfileItem::ALL.iter().enumerate() {
        let selected = i == app.profile_cursor;
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let pointer = Span::styled(
            if selected { " \u{25B8} " } else { "   " },
            Style::default().fg(app.theme.highlight).bg(row_bg),
        );
        let line = match item {
            ProfileItem::Setting(key) => {
                let on = settings.get(*key);
                let (switch, color) = if on {
                    ("[\u{25CF} on ]", app.theme.green)
                } else {
                    ("[ off\u{25CB}]", app.theme.dim)
                };
                Line::from(vec![
                    pointer,
                    Span::styled(format!("{:<14}", key.label()), Style::default().fg(app.theme.text).bg(row_bg)),
                    Span::styled(switch, Style::default().fg(color).bg(row_bg)),
                ])
            }
            ProfileItem::ClearChat => Line::from(vec![
                pointer,
                Span::styled(
                    "Clear chat history",
                    Style::default().fg(app.theme.red).bg(row_bg),
                ),
            ]),
        };
        lines.push(line);
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Companion", header)));
    let companion = if app.responder.is_live() {
        format!("{} live calls left this session", app.responder.remaining_budget())
    } else {
        "offline (local replies only)".to_string()
    };
    lines.push(Line::from(vec![
        Span::styled("   ", dim),
        Span::styled(companion, Style::default().fg(app.theme.text).bg(bg)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("   talking to ", dim),
        Span::styled(app.conversation.persona().name(), Style::default().fg(app.theme.purple).bg(bg)),
        Span::styled(format!(", {} messages", app.conversation.messages().len()), dim),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Storage", header)));
    lines.push(Line::from(Span::styled(
        format!("   {}", abbreviate_path(&app.data_dir)),
        dim,
    )));

    frame.render_widget(Paragraph::new(lines), area);
}
