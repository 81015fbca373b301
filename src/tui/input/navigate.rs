use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Tab, View};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    if is_ctrl_c(&key) {
        app.should_quit = true;
        return;
    }

    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    app.status_message = None;

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Tab => {
            app.open_tab(app.view.tab().next());
            return;
        }
        KeyCode::BackTab => {
            app.open_tab(app.view.tab().prev());
            return;
        }
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            app.open_tab(Tab::ALL[idx]);
            return;
        }
        _ => {}
    }

    match app.view.clone() {
        View::Tab(Tab::Dashboard) => handle_dashboard_key(app, key),
        View::Tab(Tab::Focus) => handle_focus_key(app, key),
        View::Tab(Tab::Tasks) => handle_tasks_key(app, key),
        View::Tab(Tab::Companion) => handle_companion_key(app, key),
        View::Tab(Tab::Profile) => handle_profile_key(app, key),
        View::SessionDetail { .. } | View::TaskDetail { .. } => handle_detail_key(app, key),
    }
}
