//! Haptic and sound feedback, rendered the only way a terminal can:
//! haptics as a short border flash, sounds as the bell.
//!
//! Every call goes through [`Feedback`], which holds the latest settings
//! snapshot from the settings subscription and drops calls the user has
//! turned off.

use std::time::{Duration, Instant};

use crate::model::Settings;
use crate::util::ticker::Deadline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    Light,
    Medium,
    Heavy,
    Success,
    Warning,
}

impl Haptic {
    fn duration(self) -> Duration {
        match self {
            Haptic::Light => Duration::from_millis(80),
            Haptic::Medium => Duration::from_millis(140),
            Haptic::Heavy => Duration::from_millis(220),
            Haptic::Success | Haptic::Warning => Duration::from_millis(300),
        }
    }
}

#[derive(Debug)]
pub struct Feedback {
    settings: Settings,
    flash: Option<(Haptic, Deadline)>,
    bell: bool,
}

impl Feedback {
    pub fn new(settings: Settings) -> Self {
        Feedback {
            settings,
            flash: None,
            bell: false,
        }
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if !settings.haptics {
            self.flash = None;
        }
        if !settings.sounds {
            self.bell = false;
        }
    }

    pub fn haptic(&mut self, kind: Haptic, now: Instant) {
        if !self.settings.haptics {
            return;
        }
        self.flash = Some((kind, Deadline::after(kind.duration(), now)));
    }

    pub fn sound(&mut self) {
        if self.settings.sounds {
            self.bell = true;
        }
    }

    /// The flash to draw right now, if any.
    pub fn flash(&self, now: Instant) -> Option<Haptic> {
        match self.flash {
            Some((kind, deadline)) if !deadline.expired(now) => Some(kind),
            _ => None,
        }
    }

    pub fn expire(&mut self, now: Instant) {
        if self.flash(now).is_none() {
            self.flash = None;
        }
    }

    /// Whether a bell should be rung; clears the request.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.flash.map(|(_, d)| d.at())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(sounds: bool, haptics: bool) -> Settings {
        Settings {
            dark_theme: true,
            sounds,
            haptics,
        }
    }

    #[test]
    fn haptics_off_means_no_flash() {
        let now = Instant::now();
        let mut fb = Feedback::new(settings(true, false));
        fb.haptic(Haptic::Heavy, now);
        assert_eq!(fb.flash(now), None);
        assert!(fb.next_deadline().is_none());
    }

    #[test]
    fn flash_expires() {
        let now = Instant::now();
        let mut fb = Feedback::new(Settings::default());
        fb.haptic(Haptic::Light, now);
        assert_eq!(fb.flash(now), Some(Haptic::Light));
        let later = now + Duration::from_millis(100);
        assert_eq!(fb.flash(later), None);
        fb.expire(later);
        assert!(fb.next_deadline().is_none());
    }

    #[test]
    fn bell_respects_sounds_and_is_taken_once() {
        let mut fb = Feedback::new(settings(false, true));
        fb.sound();
        assert!(!fb.take_bell());

        fb.set_settings(settings(true, true));
        fb.sound();
        assert!(fb.take_bell());
        assert!(!fb.take_bell());
    }

    #[test]
    fn turning_haptics_off_cancels_flash() {
        let now = Instant::now();
        let mut fb = Feedback::new(Settings::default());
        fb.haptic(Haptic::Success, now);
        fb.set_settings(settings(true, false));
        assert_eq!(fb.flash(now), None);
    }
}
