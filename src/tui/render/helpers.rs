use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use regex::Regex;

use crate::model::task::Priority;
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad `spans` with background-coloured spaces, then append `hint` flush
/// right in the dim colour, if it fits.
pub(super) fn push_right_hint<'a>(spans: &mut Vec<Span<'a>>, hint: &str, width: usize, theme: &Theme) {
    let bg = theme.background;
    let content_width = spans_width(spans);
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint.to_string(), Style::default().fg(theme.dim).bg(bg)));
    }
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let re = match search_re {
        Some(r) => r,
        None => {
            spans.push(Span::styled(text.to_string(), base_style));
            return;
        }
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        if m.start() > last_end {
            spans.push(Span::styled(text[last_end..m.start()].to_string(), base_style));
        }
        spans.push(Span::styled(text[m.start()..m.end()].to_string(), highlight_style));
        last_end = m.end();
    }
    if last_end < text.len() || last_end == 0 {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

pub(super) fn priority_color(theme: &Theme, priority: Priority) -> Color {
    match priority {
        Priority::Low => theme.dim,
        Priority::Medium => theme.blue,
        Priority::High => theme.yellow,
        Priority::Critical => theme.red,
    }
}

/// A fixed-size rectangle centred in `area`, clipped to it
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Create a centered rectangle of the given percentage of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
