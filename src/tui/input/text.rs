use crossterm::event::KeyEvent;

use crate::tui::app::{App, Mode};

use super::*;

/// Chat compose line on the companion screen
pub(super) fn handle_compose(app: &mut App, key: KeyEvent) {
    if is_ctrl_c(&key) {
        app.should_quit = true;
        return;
    }
    match edit_line(&mut app.compose_input, key) {
        LineEdit::Submit => {
            let text = std::mem::take(&mut app.compose_input);
            app.send_chat(text);
        }
        LineEdit::Cancel => app.mode = Mode::Navigate,
        LineEdit::Changed | LineEdit::Ignored => {}
    }
}

/// Custom duration prompt on the focus screen
pub(super) fn handle_duration_input(app: &mut App, key: KeyEvent) {
    if is_ctrl_c(&key) {
        app.should_quit = true;
        return;
    }
    match edit_line(&mut app.input_buffer, key) {
        LineEdit::Submit => {
            app.mode = Mode::Navigate;
            submit_custom_duration(app);
        }
        LineEdit::Cancel => {
            app.input_buffer.clear();
            app.mode = Mode::Navigate;
        }
        LineEdit::Changed | LineEdit::Ignored => {}
    }
}
