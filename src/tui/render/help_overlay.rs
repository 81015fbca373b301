use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Tab, View};

use super::helpers::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Center the overlay, leaving some margin
    let overlay_area = centered_rect(60, 80, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    // Context-sensitive help
    let bindings: &[(&str, &str)] = match &app.view {
        View::Tab(Tab::Dashboard) => &[
            (" \u{2191}\u{2193}/jk", "Move through sessions"),
            (" Enter", "Open session detail"),
            (" f", "Go to focus"),
        ],
        View::Tab(Tab::Focus) => &[
            (" Space", "Start / pause / resume"),
            (" r", "Reset timer"),
            (" d", "I got distracted"),
            (" +/-", "Raise / lower distortion"),
            (" 0", "Distortion to zero"),
            (" m", "Next preset"),
            (" c", "Custom duration"),
        ],
        View::Tab(Tab::Tasks) => &[
            (" \u{2191}\u{2193}/jk", "Move cursor"),
            (" Enter", "Open task detail"),
            (" x/Space", "Toggle done"),
            (" e", "Expand / collapse"),
            (" \u{2190}/h", "Swipe left (delete)"),
            (" \u{2192}/l", "Swipe right (done)"),
            (" drag", "Swipe with the mouse"),
            (" f", "Cycle filter"),
            (" /", "Search"),
            (" Esc", "Clear search"),
            (" R", "New batch of tasks"),
        ],
        View::Tab(Tab::Companion) => &[
            (" i/Enter", "Write a message"),
            (" p", "Switch companion"),
            (" \u{2191}\u{2193}/jk", "Scroll history"),
            (" G", "Jump to latest"),
        ],
        View::Tab(Tab::Profile) => &[
            (" \u{2191}\u{2193}/jk", "Move cursor"),
            (" Space/Enter", "Toggle / run"),
        ],
        View::SessionDetail { .. } | View::TaskDetail { .. } => &[
            (" Esc", "Back"),
            (" x", "Toggle task done"),
        ],
    };
    lines.push(Line::from(Span::styled(
        format!(" {}", app.view.tab().label()),
        header_style,
    )));
    for (key, desc) in bindings {
        add_binding(&mut lines, key, desc, key_style, desc_style);
    }
    lines.push(Line::from(""));

    // Global keys
    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " 1-5", "Jump to tab", key_style, desc_style);
    add_binding(&mut lines, " Tab/S-Tab", "Next / previous tab", key_style, desc_style);
    add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);
    add_binding(&mut lines, " Ctrl+C", "Quit (anywhere)", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}
