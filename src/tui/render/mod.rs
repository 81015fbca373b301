pub mod companion_view;
pub mod dashboard_view;
pub mod detail_view;
pub mod focus_view;
pub mod help_overlay;
mod helpers;
pub mod popups;
pub mod profile_view;
pub mod status_row;
pub mod tab_bar;
pub mod tasks_view;

#[cfg(test)]
pub mod test_helpers;

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};

use super::app::{App, Mode, Tab, View};
use super::feedback::Haptic;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let now = Instant::now();
    app.screen_width = area.width;

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    // Only the tasks screen registers hit rows for this frame
    app.task_rows.clear();

    let view = app.view.clone();
    match &view {
        View::Tab(Tab::Dashboard) => dashboard_view::render_dashboard_view(frame, app, chunks[1]),
        View::Tab(Tab::Focus) => focus_view::render_focus_view(frame, app, chunks[1], now),
        View::Tab(Tab::Tasks) => tasks_view::render_tasks_view(frame, app, chunks[1], now),
        View::Tab(Tab::Companion) => companion_view::render_companion_view(frame, app, chunks[1]),
        View::Tab(Tab::Profile) => profile_view::render_profile_view(frame, app, chunks[1]),
        View::SessionDetail { id, .. } => {
            detail_view::render_session_detail(frame, app, chunks[1], id)
        }
        View::TaskDetail { id, .. } => detail_view::render_task_detail(frame, app, chunks[1], id),
    }

    status_row::render_status_row(frame, app, chunks[2]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    if app.mode == Mode::Input {
        popups::render_duration_prompt(frame, app, area);
    }
    if let Some(state) = app.current_confirm() {
        popups::render_confirm_popup(frame, app, area, &state.message);
    }
    if let Some(message) = &app.message {
        popups::render_message_popup(frame, app, area, message);
    }

    if let Some(kind) = app.feedback.flash(now) {
        render_flash(frame, area, flash_color(app, kind));
    }
}

fn flash_color(app: &App, kind: Haptic) -> Color {
    match kind {
        Haptic::Light => app.theme.dim,
        Haptic::Medium => app.theme.purple,
        Haptic::Heavy => app.theme.highlight,
        Haptic::Success => app.theme.green,
        Haptic::Warning => app.theme.yellow,
    }
}

/// Haptic feedback: a frame drawn around the whole screen.
fn render_flash(frame: &mut Frame, area: Rect, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    frame.render_widget(block, area);
}
