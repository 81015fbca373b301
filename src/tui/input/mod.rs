mod common;
mod companion;
mod confirm;
mod dashboard;
mod detail;
mod focus;
mod navigate;
mod profile;
mod search;
mod tasks;
mod text;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};

use super::app::{App, Mode};

// Import all submodule functions into this module's namespace
// so that submodules can access cross-module functions via `use super::*;`
#[allow(unused_imports)]
use common::*;
#[allow(unused_imports)]
use companion::*;
#[allow(unused_imports)]
use confirm::*;
#[allow(unused_imports)]
use dashboard::*;
#[allow(unused_imports)]
use detail::*;
#[allow(unused_imports)]
use focus::*;
#[allow(unused_imports)]
use navigate::*;
#[allow(unused_imports)]
use profile::*;
#[allow(unused_imports)]
use search::*;
#[allow(unused_imports)]
use tasks::*;
#[allow(unused_imports)]
use text::*;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // A modal message swallows the key that dismisses it
    if app.message.is_some() {
        app.message = None;
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Compose => handle_compose(app, key),
        Mode::Input => handle_duration_input(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

/// Mouse input only drives row swipes on the tasks screen.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Navigate || app.message.is_some() || app.show_help {
        return;
    }
    handle_tasks_mouse(app, mouse);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SettingKey, TimerStatus};
    use crate::tui::app::{Tab, View};
    use crate::tui::render::test_helpers::test_app;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn number_keys_jump_between_tabs() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.view, View::Tab(Tab::Tasks));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view, View::Tab(Tab::Companion));
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.view, View::Tab(Tab::Focus));
    }

    #[test]
    fn q_quits_and_help_toggles() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_from_text_entry() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Companion);
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.mode, Mode::Compose);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn space_starts_and_pauses_the_timer() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Focus);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.engine.session().status, TimerStatus::Running);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.engine.session().status, TimerStatus::Paused);
    }

    #[test]
    fn reset_with_distractions_asks_and_decline_keeps_count() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Focus);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('r'));

        assert_eq!(app.mode, Mode::Confirm);
        assert_eq!(app.engine.session().status, TimerStatus::Idle);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.engine.distortion().distraction_count(), 3);
        assert_eq!(app.sessions.len(), 1);
    }

    #[test]
    fn reset_prompts_are_independent() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Focus);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('r'));

        assert_eq!(app.confirm_queue.len(), 2);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.mode, Mode::Confirm);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.engine.distortion().distraction_count(), 0);
        assert_eq!(app.engine.distortion().manual_level(), 2);
    }

    #[test]
    fn reset_without_counters_does_not_prompt() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Focus);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.confirm_queue.is_empty());
    }

    #[test]
    fn invalid_custom_duration_shows_message() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Focus);
        let before = app.engine.session().clone();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.mode, Mode::Input);
        type_str(&mut app, "25h");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.message.is_some());
        assert_eq!(app.engine.session(), &before);

        // any key dismisses the message
        press(&mut app, KeyCode::Char('x'));
        assert!(app.message.is_none());
    }

    #[test]
    fn valid_custom_duration_applies() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Focus);
        press(&mut app, KeyCode::Char('c'));
        type_str(&mut app, "90s");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.engine.session().duration_secs, 90);
        assert_eq!(app.engine.session().remaining_secs, 90);
    }

    #[test]
    fn mode_change_while_running_is_rejected() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Focus);
        let mode = app.engine.session().mode;
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.engine.session().mode, mode);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn search_mode_filters_tasks() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Tasks);
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_str(&mut app, "zzzz-no-match");
        assert!(app.board.visible(app.wall_now()).is_empty());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.board.query.is_empty());
    }

    #[test]
    fn task_detail_opens_and_closes() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Tasks);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.view, View::TaskDetail { .. }));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Tab(Tab::Tasks));
    }

    #[test]
    fn profile_toggle_persists_theme() {
        let (dir, mut app) = test_app();
        app.open_tab(Tab::Profile);
        press(&mut app, KeyCode::Enter);
        assert!(!app.settings.current().get(SettingKey::Theme));
        let raw = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(raw.contains("\"theme\": false") || raw.contains("\"theme\":false"));
    }

    #[test]
    fn persona_switch_asks_first() {
        let (_dir, mut app) = test_app();
        app.open_tab(Tab::Companion);
        let persona = app.conversation.persona();
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.mode, Mode::Confirm);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.conversation.persona(), persona.toggled());
        assert_eq!(app.conversation.messages().len(), 1);
    }
}
