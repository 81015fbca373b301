use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, ConfirmAction, ProfileItem};
use crate::tui::feedback::Haptic;

use super::*;

pub(super) fn handle_profile_key(app: &mut App, key: KeyEvent) {
    let len = ProfileItem::ALL.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => step_cursor(&mut app.profile_cursor, 1, len),
        KeyCode::Char('k') | KeyCode::Up => step_cursor(&mut app.profile_cursor, -1, len),
        KeyCode::Char(' ') | KeyCode::Enter => match ProfileItem::ALL[app.profile_cursor.min(len - 1)] {
            ProfileItem::Setting(setting) => {
                let settings = app.settings.toggle(setting);
                app.status_message = Some(format!(
                    "{} {}",
                    setting.label(),
                    if settings.get(setting) { "on" } else { "off" }
                ));
                app.feedback.haptic(Haptic::Light, Instant::now());
            }
            ProfileItem::ClearChat => {
                app.ask("Clear the whole chat history?", ConfirmAction::ClearChat);
            }
        },
        _ => {}
    }
}
