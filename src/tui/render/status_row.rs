use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, Tab, View};

use super::helpers::push_right_hint;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let cursor = Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)); // ▌

    let line = match app.mode {
        Mode::Search => {
            let mut spans = vec![
                Span::styled(
                    format!("/{}", app.search_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                cursor,
            ];
            push_right_hint(&mut spans, "Enter keep  Esc clear", width, &app.theme);
            Line::from(spans)
        }
        Mode::Compose => {
            let name = app.conversation.persona().name();
            let mut spans = vec![
                Span::styled(format!("{} \u{276F} ", name), Style::default().fg(app.theme.purple).bg(bg)),
                Span::styled(
                    app.compose_input.clone(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                cursor,
            ];
            push_right_hint(&mut spans, "Enter send  Esc done", width, &app.theme);
            Line::from(spans)
        }
        Mode::Input | Mode::Confirm => Line::from(""),
        Mode::Navigate => {
            let mut spans = Vec::new();
            if let Some(msg) = &app.status_message {
                spans.push(Span::styled(
                    format!(" {}", msg),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ));
            }
            if app.config.ui.show_key_hints {
                push_right_hint(&mut spans, hints_for(&app.view), width, &app.theme);
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn hints_for(view: &View) -> &'static str {
    match view {
        View::Tab(Tab::Dashboard) => "jk move  Enter open  ? help ",
        View::Tab(Tab::Focus) => "Space start/pause  r reset  d distracted  ? help ",
        View::Tab(Tab::Tasks) => "x done  h/l swipe  f filter  / search  ? help ",
        View::Tab(Tab::Companion) => "i type  p persona  ? help ",
        View::Tab(Tab::Profile) => "jk move  Space toggle  ? help ",
        View::SessionDetail { .. } | View::TaskDetail { .. } => "Esc back  ? help ",
    }
}
