use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};

use crate::model::timer::{TimerError, TimerMode, TimerStatus, parse_duration};
use crate::tui::app::{App, ConfirmAction, Mode};
use crate::tui::feedback::Haptic;

pub(super) fn handle_focus_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => {
            let wall = app.wall_now();
            if app.engine.toggle(now, wall) {
                app.feedback.haptic(Haptic::Light, now);
            } else if app.engine.session().status == TimerStatus::Completed {
                app.status_message = Some("session complete, enjoy the moment".into());
            }
        }
        KeyCode::Char('r') => reset_timer(app, now),
        KeyCode::Char('d') => {
            app.engine.record_distraction(now);
            app.feedback.haptic(Haptic::Warning, now);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => app.engine.raise_level(now),
        KeyCode::Char('-') | KeyCode::Char('_') => app.engine.lower_level(now),
        KeyCode::Char('0') => app.engine.set_level(0, now),
        KeyCode::Char('m') => cycle_mode(app),
        KeyCode::Char('c') => {
            if app.engine.session().is_active() {
                app.status_message = Some(TimerError::Busy.to_string());
                return;
            }
            app.input_buffer.clear();
            app.mode = Mode::Input;
        }
        _ => {}
    }
}

/// Reset to Idle. Keeps an interrupted session in the log, then asks
/// separately about each nonzero counter.
pub(super) fn reset_timer(app: &mut App, now: Instant) {
    let (record, prompt) = app.engine.reset(app.wall_now());
    if let Some(record) = record {
        app.sessions.push(record);
    }
    app.feedback.haptic(Haptic::Medium, now);
    if prompt.distractions {
        let count = app.engine.distortion().distraction_count();
        app.ask(
            format!("Reset {} distraction(s)?", count),
            ConfirmAction::ResetDistractions,
        );
    }
    if prompt.distortion {
        let level = app.engine.distortion().manual_level();
        app.ask(
            format!("Reset distortion level {}?", level),
            ConfirmAction::ResetDistortion,
        );
    }
}

fn cycle_mode(app: &mut App) {
    let current = app.engine.session().mode;
    let idx = TimerMode::ALL.iter().position(|m| *m == current).unwrap_or(0);
    let next = TimerMode::ALL[(idx + 1) % TimerMode::ALL.len()];
    let secs = app.config.timer.duration_secs(next);
    match app.engine.select_mode(next, secs) {
        Ok(()) => {
            app.status_message = Some(format!("{}: {}", next.label(), next.tagline()));
        }
        Err(e) => app.status_message = Some(e.to_string()),
    }
}

/// Apply a typed custom duration, or explain why it was refused.
pub(super) fn submit_custom_duration(app: &mut App) {
    let text = std::mem::take(&mut app.input_buffer);
    let result = parse_duration(&text)
        .and_then(|secs| app.engine.select_mode(TimerMode::Custom, secs));
    match result {
        Ok(()) => {
            app.status_message = Some(format!(
                "custom timer set to {}",
                crate::model::distortion::format_time(app.engine.session().duration_secs)
            ));
        }
        Err(e) => {
            log::debug!("rejected custom duration {:?}: {}", text, e);
            app.message = Some(e.to_string());
        }
    }
}
