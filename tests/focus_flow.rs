use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;
use timewarp::model::chat::{Persona, Sender};
use timewarp::model::config::AppConfig;
use timewarp::model::timer::{TimerMode, TimerStatus};
use timewarp::ops::live::LiveCallError;
use timewarp::ops::responder::ResponseProvider;
use timewarp::ops::task_source::RandomTaskSource;
use timewarp::tui::app::{App, Mode, Tab, View};
use timewarp::tui::input::handle_key;

fn app_with(config: AppConfig, live: Option<Arc<dyn ResponseProvider>>) -> (TempDir, App) {
    let dir = TempDir::new().unwrap();
    let app = App::new(
        config,
        dir.path().to_path_buf(),
        live,
        Box::new(RandomTaskSource::seeded(6, 42)),
    );
    (dir, app)
}

fn press(app: &mut App, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

struct Echo {
    calls: AtomicUsize,
}

impl ResponseProvider for Echo {
    fn reply(&self, message: &str, _persona: Persona) -> Result<String, LiveCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("echo: {}", message))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

#[test]
fn custom_countdown_runs_to_completion() {
    let (_dir, mut app) = app_with(AppConfig::default(), None);
    press(&mut app, KeyCode::Char('2'));
    assert_eq!(app.view, View::Tab(Tab::Focus));

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.mode, Mode::Input);
    type_str(&mut app, "3s");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode, Mode::Navigate);
    assert_eq!(app.engine.session().mode, TimerMode::Custom);
    assert_eq!(app.engine.session().duration_secs, 3);

    press(&mut app, KeyCode::Char(' '));
    assert_eq!(app.engine.session().status, TimerStatus::Running);
    press(&mut app, KeyCode::Char('d'));

    app.tick(Instant::now() + Duration::from_secs(4));
    assert_eq!(app.engine.session().status, TimerStatus::Completed);
    assert_eq!(app.sessions.len(), 1);
    let record = app.sessions.recent().next().unwrap();
    assert!(record.completed);
    assert_eq!(record.distractions, 1);
    assert_eq!(record.focused_secs, 3);
}

#[test]
fn invalid_custom_duration_shows_message() {
    let (_dir, mut app) = app_with(AppConfig::default(), None);
    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Char('c'));
    type_str(&mut app, "soon");
    press(&mut app, KeyCode::Enter);
    assert!(app.message.as_deref().unwrap().contains("soon"));
    assert_eq!(app.engine.session().mode, TimerMode::Flow);

    // Any key dismisses
    press(&mut app, KeyCode::Char('x'));
    assert!(app.message.is_none());
}

#[test]
fn reset_asks_about_each_counter() {
    let (_dir, mut app) = app_with(AppConfig::default(), None);
    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('+'));
    press(&mut app, KeyCode::Char('+'));
    press(&mut app, KeyCode::Char('r'));

    assert_eq!(app.engine.session().status, TimerStatus::Idle);
    assert_eq!(app.sessions.len(), 1);
    assert!(!app.sessions.recent().next().unwrap().completed);
    assert_eq!(app.mode, Mode::Confirm);
    assert_eq!(app.confirm_queue.len(), 2);

    // Keep distractions, clear distortion
    press(&mut app, KeyCode::Char('n'));
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.mode, Mode::Navigate);
    assert_eq!(app.engine.distortion().distraction_count(), 1);
    assert_eq!(app.engine.distortion().manual_level(), 0);
}

#[test]
fn zero_budget_never_reaches_live_provider() {
    let echo = Arc::new(Echo {
        calls: AtomicUsize::new(0),
    });
    let mut config = AppConfig::default();
    config.companion.call_budget = 0;
    let (_dir, mut app) = app_with(config, Some(echo.clone()));

    press(&mut app, KeyCode::Char('4'));
    press(&mut app, KeyCode::Char('i'));
    type_str(&mut app, "hello there");
    press(&mut app, KeyCode::Enter);

    assert!(app.pending_reply.is_none());
    assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    let last = app.conversation.messages().last().unwrap();
    assert_eq!(last.sender, Sender::Bot);
}

#[test]
fn live_reply_arrives_through_tick() {
    let echo = Arc::new(Echo {
        calls: AtomicUsize::new(0),
    });
    let (_dir, mut app) = app_with(AppConfig::default(), Some(echo.clone()));
    let budget = app.responder.remaining_budget();

    press(&mut app, KeyCode::Char('4'));
    press(&mut app, KeyCode::Char('i'));
    type_str(&mut app, "ping");
    press(&mut app, KeyCode::Enter);
    assert!(app.pending_reply.is_some());
    assert_eq!(app.responder.remaining_budget(), budget - 1);

    let deadline = Instant::now() + Duration::from_secs(5);
    while app.pending_reply.is_some() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
        app.tick(Instant::now());
    }
    assert!(app.pending_reply.is_none());
    assert_eq!(app.conversation.messages().last().unwrap().text, "echo: ping");
    assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
}
