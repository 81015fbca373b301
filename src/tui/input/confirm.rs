use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, ConfirmAction, Mode};

use super::*;

/// Answer the front prompt of the queue. Each prompt is independent:
/// declining one leaves its counter alone and moves on to the next.
pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    if is_ctrl_c(&key) {
        app.should_quit = true;
        return;
    }
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            if let Some(state) = app.confirm_queue.pop_front() {
                apply_confirm(app, state.action);
            }
        }
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.confirm_queue.pop_front();
        }
        _ => return,
    }
    if app.confirm_queue.is_empty() {
        app.mode = Mode::Navigate;
    }
}

fn apply_confirm(app: &mut App, action: ConfirmAction) {
    let now = Instant::now();
    match action {
        ConfirmAction::ResetDistractions => {
            app.engine.clear_distractions(now);
            app.status_message = Some("distractions cleared".into());
        }
        ConfirmAction::ResetDistortion => {
            app.engine.clear_distortion(now);
            app.status_message = Some("distortion cleared".into());
        }
        ConfirmAction::SwitchPersona => app.switch_persona(),
        ConfirmAction::ClearChat => app.clear_chat(),
    }
}
