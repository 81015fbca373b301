use crossterm::event::KeyEvent;

use crate::tui::app::{App, Mode};

use super::*;

/// Incremental task search: the query applies as it is typed.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    if is_ctrl_c(&key) {
        app.should_quit = true;
        return;
    }
    match edit_line(&mut app.search_input, key) {
        LineEdit::Changed => {
            app.board.query = app.search_input.clone();
            app.tasks_cursor = 0;
            app.tasks_scroll = 0;
        }
        // Keep the query and return to the list
        LineEdit::Submit => {
            app.mode = Mode::Navigate;
            if !app.board.query.is_empty() {
                let count = app.board.visible(app.wall_now()).len();
                app.status_message = Some(format!("{} match(es) for \"{}\"", count, app.board.query));
            }
        }
        LineEdit::Cancel => {
            app.search_input.clear();
            app.board.query.clear();
            app.mode = Mode::Navigate;
            app.clamp_tasks_cursor();
        }
        LineEdit::Ignored => {}
    }
}
