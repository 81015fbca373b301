use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Tab, View};

use super::*;

pub(super) fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    let len = app.sessions.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => step_cursor(&mut app.dashboard_cursor, 1, len),
        KeyCode::Char('k') | KeyCode::Up => step_cursor(&mut app.dashboard_cursor, -1, len),
        KeyCode::Enter => {
            if let Some(record) = app.sessions.recent().nth(app.dashboard_cursor) {
                app.view = View::SessionDetail {
                    id: record.id.clone(),
                    from: Tab::Dashboard,
                };
            }
        }
        KeyCode::Char('f') => app.open_tab(Tab::Focus),
        _ => {}
    }
}
