use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::wrap_words;

use super::helpers::centered_rect_fixed;

/// Draw a bordered popup sized to its content
fn render_popup(frame: &mut Frame, app: &App, area: Rect, width: u16, lines: Vec<Line>) {
    let bg = app.theme.background;
    let popup_w = width.min(area.width.saturating_sub(2)).max(4);
    let popup_h = ((lines.len() as u16) + 2).min(area.height);
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines).block(block).style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

/// y/n prompt for the front of the confirm queue
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect, message: &str) {
    let bg = app.theme.background;
    let width: u16 = 44;
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = wrap_words(message, width.saturating_sub(4) as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(format!(" {}", l), text_style)))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" y", key_style),
        Span::styled(" yes   ", dim),
        Span::styled("n", key_style),
        Span::styled(" no", dim),
    ]));
    let waiting = app.confirm_queue.len().saturating_sub(1);
    if waiting > 0 {
        lines.push(Line::from(Span::styled(format!(" ({} more)", waiting), dim)));
    }
    render_popup(frame, app, area, width, lines);
}

/// Modal notice; any key dismisses
pub fn render_message_popup(frame: &mut Frame, app: &App, area: Rect, message: &str) {
    let bg = app.theme.background;
    let width: u16 = 48;
    let mut lines: Vec<Line> = wrap_words(message, width.saturating_sub(4) as usize)
        .into_iter()
        .map(|l| {
            Line::from(Span::styled(
                format!(" {}", l),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ))
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " press any key",
        Style::default().fg(app.theme.dim).bg(bg),
    )));
    render_popup(frame, app, area, width, lines);
}

/// Custom duration entry on the focus screen
pub fn render_duration_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let lines = vec![
        Line::from(Span::styled(
            " Custom duration",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!(" {}", app.input_buffer),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
            Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        ]),
        Line::from(Span::styled(
            " 25  90s  1h30m  1:30:00",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    render_popup(frame, app, area, 36, lines);
}
