//! The focus screen's countdown and distortion engine.
//!
//! Owns the [`TimerSession`], the [`DistortionState`] and the timers that
//! drive them. Each timer is an `Option` handle that is set when its
//! condition starts and cleared when it stops:
//!
//! - countdown ticker: present only while Running
//! - jitter ticker: present only while the effective level is above zero
//! - celebration deadline: present only while Completed
//!
//! [`FocusEngine::update`] is called from the event loop with the current
//! instant and reports what happened as [`EngineEvent`]s.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::model::distortion::{DistortionState, Effect, MAX_LEVEL};
use crate::model::session::FocusSessionRecord;
use crate::model::timer::{TickOutcome, TimerError, TimerMode, TimerSession, TimerStatus};
use crate::util::ticker::{Deadline, Ticker, earliest};

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Jitter fires faster as the distortion climbs.
pub fn jitter_period(level: u8) -> Duration {
    let level = level.min(MAX_LEVEL) as u64;
    Duration::from_millis(2000 - 150 * level)
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The countdown reached zero. Carries the finished session.
    Completed(FocusSessionRecord),
    /// The celebration ended and the timer is back to Idle.
    CelebrationOver,
    /// The time display jumped to a new position.
    Drifted,
    /// A random haptic pulse from the level-8 effect.
    HapticPulse,
}

/// Which counters a reset should offer to clear. Each is asked separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetPrompt {
    pub distractions: bool,
    pub distortion: bool,
}

impl ResetPrompt {
    pub fn is_empty(&self) -> bool {
        !self.distractions && !self.distortion
    }
}

/// Bookkeeping for the countdown currently in progress.
#[derive(Debug, Clone)]
struct Run {
    id: String,
    started_at: DateTime<Utc>,
    distractions: u32,
    peak_level: u8,
}

#[derive(Debug)]
pub struct FocusEngine {
    session: TimerSession,
    distortion: DistortionState,
    countdown: Option<Ticker>,
    jitter: Option<Ticker>,
    celebration: Option<Deadline>,
    celebration_len: Duration,
    drift: (i16, i16),
    run: Option<Run>,
}

impl FocusEngine {
    pub fn new(mode: TimerMode, duration_secs: u32, celebration_len: Duration) -> Self {
        FocusEngine {
            session: TimerSession::new(mode, duration_secs),
            distortion: DistortionState::default(),
            countdown: None,
            jitter: None,
            celebration: None,
            celebration_len,
            drift: (0, 0),
            run: None,
        }
    }

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    pub fn distortion(&self) -> &DistortionState {
        &self.distortion
    }

    pub fn level(&self) -> u8 {
        self.distortion.effective_level()
    }

    pub fn drift(&self) -> (i16, i16) {
        self.drift
    }

    pub fn has_countdown_ticker(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn has_jitter_ticker(&self) -> bool {
        self.jitter.is_some()
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration.is_some()
    }

    /// Fraction of the celebration still to play, in `[0, 1]`.
    pub fn celebration_left(&self, now: Instant) -> f32 {
        match self.celebration {
            Some(d) if !self.celebration_len.is_zero() => {
                d.remaining(now).as_secs_f32() / self.celebration_len.as_secs_f32()
            }
            _ => 0.0,
        }
    }

    /// When the event loop next needs to call [`FocusEngine::update`].
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([
            self.countdown.as_ref().map(Ticker::next_deadline),
            self.jitter.as_ref().map(Ticker::next_deadline),
            self.celebration.map(|d| d.at()),
        ])
    }

    // -- countdown --

    pub fn start(&mut self, now: Instant, wall: DateTime<Utc>) -> bool {
        if !self.session.start() {
            return false;
        }
        self.countdown = Some(Ticker::start(COUNTDOWN_PERIOD, now));
        self.run = Some(Run {
            id: FocusSessionRecord::new_id(),
            started_at: wall,
            distractions: 0,
            peak_level: self.level(),
        });
        log::info!(
            "focus started: {} for {}s",
            self.session.mode.label(),
            self.session.duration_secs
        );
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.session.pause() {
            return false;
        }
        self.countdown = None;
        true
    }

    pub fn resume(&mut self, now: Instant) -> bool {
        if !self.session.resume() {
            return false;
        }
        self.countdown = Some(Ticker::start(COUNTDOWN_PERIOD, now));
        true
    }

    /// Start, pause or resume depending on the current status.
    pub fn toggle(&mut self, now: Instant, wall: DateTime<Utc>) -> bool {
        match self.session.status {
            TimerStatus::Idle => self.start(now, wall),
            TimerStatus::Running => self.pause(),
            TimerStatus::Paused => self.resume(now),
            TimerStatus::Completed => false,
        }
    }

    /// Back to Idle with the full duration. An interrupted countdown yields
    /// its record; the prompt says which counters the user may want cleared.
    pub fn reset(&mut self, wall: DateTime<Utc>) -> (Option<FocusSessionRecord>, ResetPrompt) {
        let record = if self.session.is_active() {
            self.finish_run(wall, false)
        } else {
            self.run = None;
            None
        };
        self.session.reset();
        self.countdown = None;
        self.celebration = None;
        let prompt = ResetPrompt {
            distractions: self.distortion.distraction_count() > 0,
            distortion: self.distortion.manual_level() > 0,
        };
        (record, prompt)
    }

    /// Switch preset or custom duration. Rejected while Running or Paused.
    pub fn select_mode(&mut self, mode: TimerMode, duration_secs: u32) -> Result<(), TimerError> {
        self.session.set_mode(mode, duration_secs)?;
        self.celebration = None;
        self.run = None;
        Ok(())
    }

    // -- distortion --

    pub fn record_distraction(&mut self, now: Instant) {
        self.distortion.record_distraction();
        if let Some(run) = &mut self.run {
            run.distractions += 1;
        }
        self.level_changed(now);
    }

    pub fn raise_level(&mut self, now: Instant) {
        self.distortion.raise_manual();
        self.level_changed(now);
    }

    pub fn lower_level(&mut self, now: Instant) {
        self.distortion.lower_manual();
        self.level_changed(now);
    }

    pub fn set_level(&mut self, level: i32, now: Instant) {
        self.distortion.set_manual_level(level);
        self.level_changed(now);
    }

    pub fn clear_distractions(&mut self, now: Instant) {
        self.distortion.clear_distractions();
        self.level_changed(now);
    }

    pub fn clear_distortion(&mut self, now: Instant) {
        self.distortion.clear_manual();
        self.level_changed(now);
    }

    fn level_changed(&mut self, now: Instant) {
        let level = self.level();
        if let Some(run) = &mut self.run {
            run.peak_level = run.peak_level.max(level);
        }
        if level == 0 {
            self.jitter = None;
            self.drift = (0, 0);
            return;
        }
        let period = jitter_period(level);
        match &mut self.jitter {
            Some(ticker) if ticker.period() == period => {}
            Some(ticker) => ticker.reschedule(period, now),
            None => self.jitter = Some(Ticker::start(period, now)),
        }
    }

    // -- event loop --

    pub fn update<R: Rng + ?Sized>(&mut self, now: Instant, wall: DateTime<Utc>, rng: &mut R) -> Vec<EngineEvent> {
        let mut events = Vec::new();

        let fired = self.countdown.as_mut().map_or(0, |t| t.due(now));
        for _ in 0..fired {
            if self.session.tick() == TickOutcome::Completed {
                self.countdown = None;
                self.celebration = Some(Deadline::after(self.celebration_len, now));
                if let Some(record) = self.finish_run(wall, true) {
                    log::info!("focus completed: {}", record.id);
                    events.push(EngineEvent::Completed(record));
                }
                break;
            }
        }

        if let Some(deadline) = self.celebration {
            if deadline.expired(now) {
                self.celebration = None;
                self.session.acknowledge_completion();
                events.push(EngineEvent::CelebrationOver);
            }
        }

        let jittered = self.jitter.as_mut().map_or(0, |t| t.due(now));
        if jittered > 0 {
            let level = self.level();
            if Effect::Drift.is_active(level) {
                self.drift = (rng.gen_range(-4..=4), rng.gen_range(-1..=1));
                events.push(EngineEvent::Drifted);
            }
            if Effect::HapticPulse.is_active(level) && rng.gen_bool(0.5) {
                events.push(EngineEvent::HapticPulse);
            }
        }

        events
    }

    fn finish_run(&mut self, wall: DateTime<Utc>, completed: bool) -> Option<FocusSessionRecord> {
        let run = self.run.take()?;
        Some(FocusSessionRecord {
            id: run.id,
            mode: self.session.mode,
            planned_secs: self.session.duration_secs,
            focused_secs: self.session.elapsed_secs(),
            distractions: run.distractions,
            peak_level: run.peak_level,
            started_at: run.started_at,
            ended_at: wall,
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const CELEBRATION: Duration = Duration::from_secs(5);

    fn engine(secs: u32) -> FocusEngine {
        FocusEngine::new(TimerMode::Custom, secs, CELEBRATION)
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn countdown_ticks_once_per_second() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut e = engine(60);
        assert!(e.start(t0, Utc::now()));
        assert!(e.has_countdown_ticker());
        e.update(t0 + Duration::from_millis(999), Utc::now(), &mut rng);
        assert_eq!(e.session().remaining_secs, 60);
        e.update(t0 + secs(3), Utc::now(), &mut rng);
        assert_eq!(e.session().remaining_secs, 57);
    }

    #[test]
    fn pause_cancels_countdown_and_freezes_remaining() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut e = engine(60);
        e.start(t0, Utc::now());
        e.update(t0 + secs(2), Utc::now(), &mut rng);
        assert!(e.pause());
        assert!(!e.has_countdown_ticker());
        e.update(t0 + secs(30), Utc::now(), &mut rng);
        assert_eq!(e.session().remaining_secs, 58);

        assert!(e.resume(t0 + secs(30)));
        assert!(e.has_countdown_ticker());
        e.update(t0 + secs(31), Utc::now(), &mut rng);
        assert_eq!(e.session().remaining_secs, 57);
    }

    #[test]
    fn completion_celebrates_then_returns_to_idle() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut e = engine(2);
        e.start(t0, Utc::now());
        let events = e.update(t0 + secs(5), Utc::now(), &mut rng);
        assert!(matches!(events.as_slice(), [EngineEvent::Completed(r)] if r.completed && r.focused_secs == 2));
        assert_eq!(e.session().status, TimerStatus::Completed);
        assert!(!e.has_countdown_ticker());
        assert!(e.is_celebrating());
        assert!(!e.toggle(t0 + secs(6), Utc::now()));

        let events = e.update(t0 + secs(10), Utc::now(), &mut rng);
        assert_eq!(events, vec![EngineEvent::CelebrationOver]);
        assert_eq!(e.session().status, TimerStatus::Idle);
        assert_eq!(e.session().remaining_secs, 2);
        assert!(!e.has_countdown_ticker());
    }

    #[test]
    fn reset_cancels_countdown_and_yields_record() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut e = engine(100);
        e.start(t0, Utc::now());
        e.record_distraction(t0);
        e.update(t0 + secs(10), Utc::now(), &mut rng);
        let (record, prompt) = e.reset(Utc::now());
        let record = record.unwrap();
        assert!(!record.completed);
        assert_eq!(record.focused_secs, 10);
        assert_eq!(record.distractions, 1);
        assert!(prompt.distractions);
        assert!(!prompt.distortion);
        assert!(!e.has_countdown_ticker());
        assert_eq!(e.session().remaining_secs, 100);
        // Declining the prompt keeps the count
        assert_eq!(e.distortion().distraction_count(), 1);
    }

    #[test]
    fn reset_without_counters_needs_no_prompt() {
        let mut e = engine(100);
        e.start(Instant::now(), Utc::now());
        let (_, prompt) = e.reset(Utc::now());
        assert!(prompt.is_empty());
        let (record, _) = e.reset(Utc::now());
        assert!(record.is_none());
    }

    #[test]
    fn jitter_runs_only_above_level_zero() {
        let t0 = Instant::now();
        let mut e = engine(100);
        assert!(!e.has_jitter_ticker());
        e.raise_level(t0);
        assert!(e.has_jitter_ticker());
        e.set_level(10, t0);
        assert!(e.has_jitter_ticker());
        e.set_level(0, t0);
        assert!(!e.has_jitter_ticker());
        assert_eq!(e.drift(), (0, 0));

        e.record_distraction(t0);
        assert!(!e.has_jitter_ticker());
        e.record_distraction(t0);
        assert!(e.has_jitter_ticker());
        e.clear_distractions(t0);
        assert!(!e.has_jitter_ticker());
    }

    #[test]
    fn drift_moves_on_jitter_at_level_five() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(9);
        let mut e = engine(100);
        e.set_level(5, t0);
        let events = e.update(t0 + jitter_period(5), Utc::now(), &mut rng);
        assert!(events.contains(&EngineEvent::Drifted));
        assert!(!events.contains(&EngineEvent::HapticPulse));
    }

    #[test]
    fn mode_change_rejected_while_active() {
        let mut e = engine(100);
        e.start(Instant::now(), Utc::now());
        assert_eq!(e.select_mode(TimerMode::Deep, 3000), Err(TimerError::Busy));
        e.pause();
        assert_eq!(e.select_mode(TimerMode::Deep, 3000), Err(TimerError::Busy));
        e.reset(Utc::now());
        assert_eq!(e.select_mode(TimerMode::Deep, 3000), Ok(()));
        assert_eq!(e.session().duration_secs, 3000);
    }

    #[test]
    fn peak_level_tracks_highest_during_run() {
        let t0 = Instant::now();
        let mut e = engine(100);
        e.start(t0, Utc::now());
        e.set_level(6, t0);
        e.set_level(2, t0);
        let (record, _) = e.reset(Utc::now());
        assert_eq!(record.unwrap().peak_level, 6);
    }

    #[test]
    fn next_deadline_is_earliest_timer() {
        let t0 = Instant::now();
        let mut e = engine(100);
        assert!(e.next_deadline().is_none());
        e.start(t0, Utc::now());
        assert_eq!(e.next_deadline(), Some(t0 + secs(1)));
        e.set_level(10, t0);
        assert_eq!(e.next_deadline(), Some(t0 + jitter_period(10)));
    }
}
