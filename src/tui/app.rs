use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::settings_store::{SettingsStore, SettingsSubscription};
use crate::io::store::{PreferenceStore, keys};
use crate::io::watcher::{FileEvent, SettingsWatcher};
use crate::model::chat::{ChatMessage, Persona};
use crate::model::config::AppConfig;
use crate::model::session::SessionLog;
use crate::model::timer::TimerMode;
use crate::ops::conversation::Conversation;
use crate::ops::focus::{EngineEvent, FocusEngine};
use crate::ops::live::LiveCallError;
use crate::ops::responder::{ReplyPlan, Responder, ResponseProvider};
use crate::ops::task_board::TaskBoard;
use crate::ops::task_source::{RandomTaskSource, TaskSource};
use crate::util::ticker::earliest;

use super::feedback::{Feedback, Haptic};
use super::input;
use super::render;
use super::theme::Theme;

/// Longest the loop sleeps when no timer is pending
const IDLE_POLL: Duration = Duration::from_millis(250);
/// Redraw interval while something is animating
const FRAME: Duration = Duration::from_millis(60);

/// The five bottom tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Focus,
    Tasks,
    Companion,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Focus,
        Tab::Tasks,
        Tab::Companion,
        Tab::Profile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Home",
            Tab::Focus => "Focus",
            Tab::Tasks => "Tasks",
            Tab::Companion => "Companion",
            Tab::Profile => "Profile",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Which view is currently displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Tab(Tab),
    /// A finished focus session, by record id
    SessionDetail { id: String, from: Tab },
    /// A task, by id
    TaskDetail { id: String, from: Tab },
}

impl View {
    /// The tab highlighted in the tab bar
    pub fn tab(&self) -> Tab {
        match self {
            View::Tab(tab) => *tab,
            View::SessionDetail { from, .. } | View::TaskDetail { from, .. } => *from,
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a task search
    Search,
    /// Typing a chat message
    Compose,
    /// Typing a custom timer duration
    Input,
    /// Answering a y/n prompt
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    ResetDistractions,
    ResetDistortion,
    SwitchPersona,
    ClearChat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

/// A live chat call running on a worker thread
pub struct PendingReply {
    pub rx: Receiver<Result<String, LiveCallError>>,
    pub message: String,
    pub persona: Persona,
}

/// Rows of the profile screen, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileItem {
    Setting(crate::model::SettingKey),
    ClearChat,
}

impl ProfileItem {
    pub const ALL: [ProfileItem; 4] = [
        ProfileItem::Setting(crate::model::SettingKey::Theme),
        ProfileItem::Setting(crate::model::SettingKey::Sounds),
        ProfileItem::Setting(crate::model::SettingKey::Haptics),
        ProfileItem::ClearChat,
    ];
}

/// Main application state
pub struct App {
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub config: AppConfig,
    pub data_dir: PathBuf,

    pub settings: SettingsStore,
    settings_sub: SettingsSubscription,
    pub feedback: Feedback,

    pub engine: FocusEngine,
    pub sessions: SessionLog,

    pub board: TaskBoard,
    task_source: Box<dyn TaskSource>,
    pub tasks_cursor: usize,
    pub tasks_scroll: usize,
    /// Screen row of each task line drawn last frame, for mouse hit-testing
    pub task_rows: Vec<(u16, String)>,
    /// Width of the last frame, for swipe thresholds
    pub screen_width: u16,

    pub conversation: Conversation,
    pub responder: Responder,
    pub pending_reply: Option<PendingReply>,
    pub compose_input: String,
    /// Lines scrolled up from the bottom of the chat
    pub chat_scroll: usize,

    pub dashboard_cursor: usize,
    pub profile_cursor: usize,

    pub show_help: bool,
    pub search_input: String,
    pub input_buffer: String,
    /// Prompts waiting to be answered, front first
    pub confirm_queue: VecDeque<ConfirmState>,
    /// Modal notice; any key dismisses it
    pub message: Option<String>,
    pub status_message: Option<String>,

    /// Animation clock origin
    pub started: Instant,
    pub rng: StdRng,
}

impl App {
    pub fn new(
        config: AppConfig,
        data_dir: PathBuf,
        live: Option<Arc<dyn ResponseProvider>>,
        mut task_source: Box<dyn TaskSource>,
    ) -> Self {
        let store = PreferenceStore::new(&data_dir);
        let mut settings = SettingsStore::load(store.clone());
        let settings_sub = settings.subscribe();
        let current = settings.current();

        let mut board = TaskBoard::default();
        board.regenerate(task_source.as_mut(), Utc::now());

        let responder = match live {
            Some(provider) => Responder::new(Some(provider), config.companion.call_budget),
            None => Responder::offline(),
        };

        let mode = TimerMode::Flow;
        let engine = FocusEngine::new(
            mode,
            config.timer.duration_secs(mode),
            Duration::from_secs(config.timer.celebration_secs),
        );

        App {
            view: View::Tab(Tab::Dashboard),
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui, current.dark_theme),
            data_dir,
            settings,
            settings_sub,
            feedback: Feedback::new(current),
            engine,
            sessions: SessionLog::default(),
            board,
            task_source,
            tasks_cursor: 0,
            tasks_scroll: 0,
            task_rows: Vec::new(),
            screen_width: 80,
            conversation: Conversation::load(store),
            responder,
            pending_reply: None,
            compose_input: String::new(),
            chat_scroll: 0,
            dashboard_cursor: 0,
            profile_cursor: 0,
            show_help: false,
            search_input: String::new(),
            input_buffer: String::new(),
            confirm_queue: VecDeque::new(),
            message: None,
            status_message: None,
            started: Instant::now(),
            rng: StdRng::from_entropy(),
            config,
        }
    }

    pub fn wall_now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Milliseconds since start, for animation phases
    pub fn phase_ms(&self, now: Instant) -> u64 {
        now.duration_since(self.started).as_millis() as u64
    }

    pub fn open_tab(&mut self, tab: Tab) {
        self.view = View::Tab(tab);
    }

    /// Leave a detail route for the tab it was opened from
    pub fn close_detail(&mut self) {
        let tab = self.view.tab();
        self.view = View::Tab(tab);
    }

    pub fn regenerate_tasks(&mut self) {
        let now = self.wall_now();
        self.board.regenerate(self.task_source.as_mut(), now);
        self.tasks_cursor = 0;
        self.tasks_scroll = 0;
        self.status_message = Some(format!("{} fresh tasks", self.board.len()));
    }

    /// Queue a y/n prompt; switches to Confirm mode.
    pub fn ask(&mut self, message: impl Into<String>, action: ConfirmAction) {
        self.confirm_queue.push_back(ConfirmState {
            message: message.into(),
            action,
        });
        self.mode = Mode::Confirm;
    }

    pub fn current_confirm(&self) -> Option<&ConfirmState> {
        self.confirm_queue.front()
    }

    /// Send a chat message. Answered locally right away, or handed to a
    /// worker thread when a live call is planned.
    pub fn send_chat(&mut self, text: String) {
        let text = text.trim().to_string();
        if text.is_empty() {
            return;
        }
        if self.pending_reply.is_some() {
            self.status_message = Some("still waiting for a reply".into());
            return;
        }
        let persona = self.conversation.persona();
        self.conversation.push(ChatMessage::user(text.clone()));
        self.chat_scroll = 0;

        match self.responder.plan(&text, persona) {
            ReplyPlan::Local(reply) => self.receive_reply(reply, persona),
            ReplyPlan::Live(provider) => {
                let (tx, rx) = mpsc::channel();
                let message = text.clone();
                std::thread::spawn(move || {
                    let _ = tx.send(provider.reply(&message, persona));
                });
                self.pending_reply = Some(PendingReply {
                    rx,
                    message: text,
                    persona,
                });
            }
        }
    }

    fn receive_reply(&mut self, reply: String, persona: Persona) {
        self.conversation.push(ChatMessage::bot(reply));
        if let Some(notice) = self.responder.take_quota_notice(persona) {
            self.conversation.push(ChatMessage::bot(notice));
        }
        self.feedback.haptic(Haptic::Light, Instant::now());
    }

    /// Collect a finished live reply, if any.
    fn drain_reply(&mut self) {
        let outcome = match &self.pending_reply {
            Some(pending) => match pending.rx.try_recv() {
                Ok(result) => Some(result),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => None,
            },
            None => return,
        };
        let pending = match self.pending_reply.take() {
            Some(p) => p,
            None => return,
        };
        let result = outcome.unwrap_or_else(|| Err(LiveCallError::Empty));
        let reply = self.responder.settle(result, &pending.message, pending.persona);
        if pending.persona == self.conversation.persona() {
            self.receive_reply(reply, pending.persona);
        }
    }

    pub fn switch_persona(&mut self) {
        self.pending_reply = None;
        let persona = self.conversation.switch_persona();
        self.chat_scroll = 0;
        self.status_message = Some(format!("now chatting with {}", persona.name()));
    }

    pub fn clear_chat(&mut self) {
        self.pending_reply = None;
        self.conversation.clear();
        self.chat_scroll = 0;
        self.status_message = Some("chat history cleared".into());
    }

    /// Advance every timer and drain every channel. Called once per loop pass.
    pub fn tick(&mut self, now: Instant) {
        let wall = self.wall_now();
        for event in self.engine.update(now, wall, &mut self.rng) {
            match event {
                EngineEvent::Completed(record) => {
                    self.status_message = Some(format!(
                        "{} session complete! {} focused",
                        record.mode.label(),
                        crate::model::distortion::format_time(record.focused_secs)
                    ));
                    self.sessions.push(record);
                    self.feedback.haptic(Haptic::Success, now);
                    self.feedback.sound();
                }
                EngineEvent::CelebrationOver => {}
                EngineEvent::Drifted => {}
                EngineEvent::HapticPulse => self.feedback.haptic(Haptic::Medium, now),
            }
        }

        if !self.board.advance(now).is_empty() {
            self.feedback.haptic(Haptic::Heavy, now);
            self.clamp_tasks_cursor();
        }

        if self.settings_sub.refresh() {
            let settings = self.settings_sub.current();
            self.theme = Theme::from_config(&self.config.ui, settings.dark_theme);
            self.feedback.set_settings(settings);
        }

        self.drain_reply();
        self.feedback.expire(now);
    }

    /// Something on screen moves on its own and needs steady redraws.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.board.swipes.is_animating()
            || self.engine.is_celebrating()
            || (self.view == View::Tab(Tab::Focus) && self.engine.level() > 0)
            || self.feedback.flash(now).is_some()
            || self.pending_reply.is_some()
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let frame = if self.is_animating(now) {
            Some(now + FRAME)
        } else {
            None
        };
        earliest([
            self.engine.next_deadline(),
            self.feedback.next_deadline(),
            frame,
            Some(now + IDLE_POLL),
        ])
        .map_or(IDLE_POLL, |at| at.saturating_duration_since(now))
    }

    pub fn clamp_tasks_cursor(&mut self) {
        let count = self.board.visible(self.wall_now()).len();
        self.tasks_cursor = if count == 0 {
            0
        } else {
            self.tasks_cursor.min(count - 1)
        };
    }

    /// Id of the task under the cursor on the tasks screen
    pub fn selected_task_id(&self) -> Option<String> {
        self.board
            .visible(self.wall_now())
            .get(self.tasks_cursor)
            .map(|t| t.id.clone())
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", keys::SETTINGS))
    }
}

/// What the launcher resolved before handing over to the TUI
pub struct LaunchOptions {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub live: Option<Arc<dyn ResponseProvider>>,
}

/// Run the TUI application
pub fn run(opts: LaunchOptions) -> Result<(), Box<dyn std::error::Error>> {
    let source = RandomTaskSource::new(opts.config.tasks.count);
    let mut app = App::new(opts.config, opts.data_dir, opts.live, Box::new(source));

    let watcher = match SettingsWatcher::start(&app.data_dir, app.settings_path()) {
        Ok(w) => Some(w),
        Err(e) => {
            log::warn!("settings file watcher unavailable: {}", e);
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    log::info!("exiting after {} focus sessions", app.sessions.len());
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&SettingsWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();
        app.tick(now);
        if let Some(FileEvent::SettingsChanged) = watcher.and_then(SettingsWatcher::poll) {
            app.settings.reload();
        }
        if app.feedback.take_bell() {
            let out = terminal.backend_mut();
            out.write_all(b"\x07")?;
            out.flush()?;
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
