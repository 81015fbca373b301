//! Process-wide settings with explicit subscribe/notify.
//!
//! The store owns the current [`Settings`] and the list of subscribers. Every
//! change (a toggle on the profile screen, or an external edit picked up by the
//! file watcher) is persisted and pushed to each live subscription. Screens
//! hold a [`SettingsSubscription`] and drain it on each pass of the event loop.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::model::{SettingKey, Settings};

use super::store::{PreferenceStore, keys};

pub struct SettingsStore {
    store: PreferenceStore,
    current: Settings,
    subscribers: Vec<Sender<Settings>>,
}

/// Receiving end of a settings subscription. Dropping it unsubscribes.
pub struct SettingsSubscription {
    rx: Receiver<Settings>,
    latest: Settings,
}

impl SettingsSubscription {
    /// Last value seen by this subscription.
    pub fn current(&self) -> Settings {
        self.latest
    }

    /// Drain pending notifications. Returns true if the value changed.
    pub fn refresh(&mut self) -> bool {
        let before = self.latest;
        while let Ok(settings) = self.rx.try_recv() {
            self.latest = settings;
        }
        self.latest != before
    }
}

impl SettingsStore {
    /// Load settings from the store. A missing or malformed blob yields defaults.
    pub fn load(store: PreferenceStore) -> Self {
        let current = store.load_or_default::<Settings>(keys::SETTINGS);
        SettingsStore {
            store,
            current,
            subscribers: Vec::new(),
        }
    }

    pub fn current(&self) -> Settings {
        self.current
    }

    pub fn subscribe(&mut self) -> SettingsSubscription {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        SettingsSubscription {
            rx,
            latest: self.current,
        }
    }

    /// Number of live subscriptions (dropped ones are pruned on notify).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Apply a change, persist it and notify subscribers.
    ///
    /// A failed write is logged; the in-memory value still changes so the UI
    /// reflects what the user chose.
    pub fn update(&mut self, f: impl FnOnce(&mut Settings)) -> Settings {
        let mut next = self.current;
        f(&mut next);
        if next == self.current {
            return next;
        }
        self.current = next;
        self.store.save_or_log(keys::SETTINGS, &self.current);
        log::info!("settings changed: {:?}", self.current);
        self.notify();
        next
    }

    pub fn toggle(&mut self, key: SettingKey) -> Settings {
        self.update(|s| s.toggle(key))
    }

    /// Re-read the persisted blob after an external edit. Unreadable data
    /// keeps the current value.
    pub fn reload(&mut self) -> bool {
        let next = match self.store.read::<Settings>(keys::SETTINGS) {
            Ok(Some(s)) => s,
            Ok(None) => return false,
            Err(e) => {
                log::warn!("ignoring settings reload: {}", e);
                return false;
            }
        };
        if next == self.current {
            return false;
        }
        log::info!("settings reloaded from disk: {:?}", next);
        self.current = next;
        self.notify();
        true
    }

    fn notify(&mut self) {
        let value = self.current;
        self.subscribers.retain(|tx| tx.send(value).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::load(PreferenceStore::new(dir.path()))
    }

    #[test]
    fn defaults_when_nothing_persisted() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).current(), Settings::default());
    }

    #[test]
    fn subscribers_see_updates() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let mut focus = store.subscribe();
        let mut tasks = store.subscribe();

        store.toggle(SettingKey::Haptics);

        assert!(focus.refresh());
        assert!(!focus.current().haptics);
        assert!(tasks.refresh());
        assert!(!tasks.current().haptics);
        assert!(!focus.refresh());
    }

    #[test]
    fn update_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.toggle(SettingKey::Sounds);
        let reopened = store_in(&dir);
        assert!(!reopened.current().sounds);
    }

    #[test]
    fn no_op_update_does_not_notify() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let mut sub = store.subscribe();
        store.update(|s| s.sounds = true);
        assert!(!sub.refresh());
        assert!(!dir.path().join("settings.json").exists());
    }

    #[test]
    fn dropped_subscriptions_are_pruned() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let keep = store.subscribe();
        drop(store.subscribe());
        assert_eq!(store.subscriber_count(), 2);
        store.toggle(SettingKey::Theme);
        assert_eq!(store.subscriber_count(), 1);
        drop(keep);
    }

    #[test]
    fn reload_picks_up_external_edit() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let mut sub = store.subscribe();
        fs::write(
            dir.path().join("settings.json"),
            r#"{"theme": false, "sounds": true, "haptics": true}"#,
        )
        .unwrap();
        assert!(store.reload());
        assert!(sub.refresh());
        assert!(!sub.current().dark_theme);
    }

    #[test]
    fn reload_ignores_malformed_blob() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.toggle(SettingKey::Haptics);
        fs::write(dir.path().join("settings.json"), "{{{").unwrap();
        assert!(!store.reload());
        assert!(!store.current().haptics);
    }
}
