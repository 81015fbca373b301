use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_companion_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => app.mode = Mode::Compose,
        KeyCode::Char('p') => {
            let next = app.conversation.persona().toggled();
            app.ask(
                format!("Switch to {}? This clears the chat.", next.name()),
                ConfirmAction::SwitchPersona,
            );
        }
        KeyCode::Char('k') | KeyCode::Up => app.chat_scroll = app.chat_scroll.saturating_add(1),
        KeyCode::Char('j') | KeyCode::Down => app.chat_scroll = app.chat_scroll.saturating_sub(1),
        KeyCode::Char('G') | KeyCode::End => app.chat_scroll = 0,
        _ => {}
    }
}
