use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::ops::swipe::{SwipeDirection, SwipeOutcome};
use crate::tui::app::{App, Mode, Tab, View};
use crate::tui::feedback::Haptic;

use super::*;

pub(super) fn handle_tasks_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    let len = app.board.visible(app.wall_now()).len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => step_cursor(&mut app.tasks_cursor, 1, len),
        KeyCode::Char('k') | KeyCode::Up => step_cursor(&mut app.tasks_cursor, -1, len),
        KeyCode::Char('g') | KeyCode::Home => app.tasks_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.tasks_cursor = len.saturating_sub(1),
        KeyCode::Enter => {
            if let Some(id) = app.selected_task_id() {
                app.view = View::TaskDetail {
                    id,
                    from: Tab::Tasks,
                };
            }
        }
        KeyCode::Char('x') | KeyCode::Char(' ') => {
            if let Some(id) = app.selected_task_id() {
                toggle_task(app, &id);
            }
        }
        KeyCode::Char('e') => {
            if let Some(id) = app.selected_task_id() {
                app.board.toggle_expanded(&id);
            }
        }
        KeyCode::Char('h') | KeyCode::Left => fling_selected(app, SwipeDirection::Left, now),
        KeyCode::Char('l') | KeyCode::Right => fling_selected(app, SwipeDirection::Right, now),
        KeyCode::Char('f') => {
            app.board.cycle_filter();
            app.clamp_tasks_cursor();
            app.status_message = Some(format!("showing {}", app.board.filter.label()));
        }
        KeyCode::Char('/') => {
            app.search_input = app.board.query.clone();
            app.mode = Mode::Search;
        }
        KeyCode::Esc => {
            if !app.board.query.is_empty() {
                app.board.query.clear();
                app.search_input.clear();
                app.clamp_tasks_cursor();
            }
        }
        KeyCode::Char('R') => app.regenerate_tasks(),
        _ => {}
    }
}

pub(super) fn toggle_task(app: &mut App, id: &str) {
    if let Some(done) = app.board.toggle_completed(id) {
        app.feedback.haptic(if done { Haptic::Success } else { Haptic::Light }, Instant::now());
        app.clamp_tasks_cursor();
    }
}

fn fling_selected(app: &mut App, direction: SwipeDirection, now: Instant) {
    let id = match app.selected_task_id() {
        Some(id) => id,
        None => return,
    };
    let width = app.screen_width as f32;
    if let Some(outcome) = app.board.fling(&id, direction, width, now) {
        swipe_feedback(app, outcome, now);
    }
}

fn swipe_feedback(app: &mut App, outcome: SwipeOutcome, now: Instant) {
    match outcome {
        SwipeOutcome::Delete => app.feedback.haptic(Haptic::Medium, now),
        SwipeOutcome::ToggleComplete => {
            app.feedback.haptic(Haptic::Success, now);
            app.clamp_tasks_cursor();
        }
        SwipeOutcome::SnapBack => {}
    }
}

/// Drag a task row sideways with the left button. Release past the
/// threshold deletes (left) or toggles completion (right).
pub(super) fn handle_tasks_mouse(app: &mut App, mouse: MouseEvent) {
    if app.view != View::Tab(Tab::Tasks) {
        return;
    }
    let now = Instant::now();
    let x = mouse.column as f32;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let hit = app
                .task_rows
                .iter()
                .find(|(row, _)| *row == mouse.row)
                .map(|(_, id)| id.clone());
            if let Some(id) = hit {
                if let Some(idx) = app.board.visible_ids(app.wall_now()).iter().position(|v| *v == id) {
                    app.tasks_cursor = idx;
                }
                app.board.swipes.begin(&id, x);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => app.board.swipes.drag_to(x),
        MouseEventKind::Up(MouseButton::Left) => {
            let width = app.screen_width as f32;
            if let Some((_, outcome)) = app.board.release_swipe(width, now) {
                swipe_feedback(app, outcome, now);
            }
        }
        MouseEventKind::ScrollDown => {
            let len = app.board.visible(app.wall_now()).len();
            step_cursor(&mut app.tasks_cursor, 1, len);
        }
        MouseEventKind::ScrollUp => {
            let len = app.board.visible(app.wall_now()).len();
            step_cursor(&mut app.tasks_cursor, -1, len);
        }
        _ => {}
    }
}
