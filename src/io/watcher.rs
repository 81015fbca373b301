use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum FileEvent {
    /// The settings blob was created, modified or removed on disk.
    SettingsChanged,
}

/// Watches the data directory for edits to the settings file made outside
/// this process.
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl SettingsWatcher {
    /// Start watching `data_dir` for changes to `settings_path`.
    /// Returns a `SettingsWatcher` whose `poll()` method should be called each tick.
    pub fn start(data_dir: &Path, settings_path: PathBuf) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };
                if is_settings_event(&event, &settings_path) {
                    let _ = tx.send(FileEvent::SettingsChanged);
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(SettingsWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. Bursts of events collapse into one.
    pub fn poll(&self) -> Option<FileEvent> {
        let mut seen = None;
        while let Ok(evt) = self.rx.try_recv() {
            seen = Some(evt);
        }
        seen
    }
}

fn is_settings_event(event: &Event, settings_path: &Path) -> bool {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
        _ => return false,
    }
    let target = settings_path.file_name();
    event
        .paths
        .iter()
        .any(|p| p.file_name().is_some() && p.file_name() == target)
}
