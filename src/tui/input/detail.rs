use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, View};

use super::*;

/// Session and task detail routes. Esc goes back; `x` toggles a task.
pub(super) fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.close_detail(),
        KeyCode::Char('x') | KeyCode::Char(' ') => {
            if let View::TaskDetail { id, .. } = &app.view {
                let id = id.clone();
                toggle_task(app, &id);
            }
        }
        _ => {}
    }
}
