use serde::{Deserialize, Serialize};

/// Longest accepted custom duration.
pub const MAX_DURATION_SECS: u32 = 24 * 60 * 60;

/// Focus preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Deep,
    Flow,
    Light,
    Custom,
}

impl TimerMode {
    pub const ALL: [TimerMode; 4] = [
        TimerMode::Deep,
        TimerMode::Flow,
        TimerMode::Light,
        TimerMode::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Deep => "Deep",
            TimerMode::Flow => "Flow",
            TimerMode::Light => "Light",
            TimerMode::Custom => "Custom",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            TimerMode::Deep => "no mercy, no notifications",
            TimerMode::Flow => "the classic groove",
            TimerMode::Light => "a quick warm-up lap",
            TimerMode::Custom => "your rules",
        }
    }
}

/// Countdown lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Outcome of a single countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing happened.
    Ignored,
    /// One second elapsed.
    Counted,
    /// The countdown reached zero on this tick.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    #[error("stop or reset the timer before changing it")]
    Busy,
    #[error("duration must be between 1 second and 24 hours")]
    OutOfRange,
    #[error("could not read \"{0}\" as a duration (try 25, 90s, 1h30m or 1:30:00)")]
    Unparseable(String),
}

/// The countdown itself. Transitions are total: an event that does not apply
/// to the current status is ignored and reported as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSession {
    pub mode: TimerMode,
    pub duration_secs: u32,
    pub remaining_secs: u32,
    pub status: TimerStatus,
}

impl TimerSession {
    pub fn new(mode: TimerMode, duration_secs: u32) -> Self {
        let duration_secs = duration_secs.clamp(1, MAX_DURATION_SECS);
        TimerSession {
            mode,
            duration_secs,
            remaining_secs: duration_secs,
            status: TimerStatus::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, TimerStatus::Running | TimerStatus::Paused)
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.duration_secs.saturating_sub(self.remaining_secs)
    }

    /// Fraction of the duration already counted down, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.elapsed_secs() as f64 / self.duration_secs as f64
    }

    /// Idle → Running. A countdown left at zero is reloaded first.
    pub fn start(&mut self) -> bool {
        if self.status != TimerStatus::Idle {
            return false;
        }
        if self.remaining_secs == 0 {
            self.remaining_secs = self.duration_secs;
        }
        self.status = TimerStatus::Running;
        true
    }

    /// Running → Paused
    pub fn pause(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        self.status = TimerStatus::Paused;
        true
    }

    /// Paused → Running
    pub fn resume(&mut self) -> bool {
        if self.status != TimerStatus::Paused {
            return false;
        }
        self.status = TimerStatus::Running;
        true
    }

    /// Any → Idle with the full duration restored.
    pub fn reset(&mut self) {
        self.status = TimerStatus::Idle;
        self.remaining_secs = self.duration_secs;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.status != TimerStatus::Running {
            return TickOutcome::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.status = TimerStatus::Completed;
            TickOutcome::Completed
        } else {
            TickOutcome::Counted
        }
    }

    /// Completed → Idle once the celebration is over. Does not restart.
    pub fn acknowledge_completion(&mut self) {
        if self.status == TimerStatus::Completed {
            self.reset();
        }
    }

    /// Switch preset. Rejected while a countdown is running or paused.
    pub fn set_mode(&mut self, mode: TimerMode, duration_secs: u32) -> Result<(), TimerError> {
        if self.is_active() {
            return Err(TimerError::Busy);
        }
        if duration_secs == 0 || duration_secs > MAX_DURATION_SECS {
            return Err(TimerError::OutOfRange);
        }
        *self = TimerSession::new(mode, duration_secs);
        Ok(())
    }
}

/// Parse a user-entered duration.
///
/// Accepted forms: bare minutes (`25`), unit suffixes (`90s`, `45m`, `2h`,
/// `1h30m`), and clock notation (`MM:SS`, `H:MM:SS`). The result must lie in
/// `(0, 24h]`.
pub fn parse_duration(input: &str) -> Result<u32, TimerError> {
    let text = input.trim().to_lowercase();
    let unparseable = || TimerError::Unparseable(input.trim().to_string());
    if text.is_empty() {
        return Err(unparseable());
    }

    let secs: u64 = if text.contains(':') {
        let parts: Vec<&str> = text.split(':').collect();
        let nums: Vec<u64> = parts
            .iter()
            .map(|p| p.parse::<u64>())
            .collect::<Result<_, _>>()
            .map_err(|_| unparseable())?;
        match nums.as_slice() {
            [m, s] if *s < 60 => m * 60 + s,
            [h, m, s] if *m < 60 && *s < 60 => h * 3600 + m * 60 + s,
            _ => return Err(unparseable()),
        }
    } else if text.chars().all(|c| c.is_ascii_digit()) {
        text.parse::<u64>().map_err(|_| unparseable())? * 60
    } else {
        let mut total = 0u64;
        let mut digits = String::new();
        for c in text.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let scale = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                ' ' if digits.is_empty() => continue,
                _ => return Err(unparseable()),
            };
            let n: u64 = digits.parse().map_err(|_| unparseable())?;
            total = total.saturating_add(n.saturating_mul(scale));
            digits.clear();
        }
        if !digits.is_empty() {
            return Err(unparseable());
        }
        total
    };

    if secs == 0 || secs > MAX_DURATION_SECS as u64 {
        return Err(TimerError::OutOfRange);
    }
    Ok(secs as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(secs: u32) -> TimerSession {
        let mut t = TimerSession::new(TimerMode::Custom, secs);
        assert!(t.start());
        t
    }

    #[test]
    fn start_pause_resume_cycle() {
        let mut t = TimerSession::new(TimerMode::Flow, 1500);
        assert_eq!(t.status, TimerStatus::Idle);
        assert!(!t.pause());
        assert!(t.start());
        assert_eq!(t.status, TimerStatus::Running);
        assert!(!t.start());
        t.tick();
        assert!(t.pause());
        assert_eq!(t.tick(), TickOutcome::Ignored);
        assert_eq!(t.remaining_secs, 1499);
        assert!(t.resume());
        t.tick();
        assert_eq!(t.remaining_secs, 1498);
    }

    #[test]
    fn reset_restores_duration() {
        let mut t = running(10);
        t.tick();
        t.tick();
        t.reset();
        assert_eq!(t.status, TimerStatus::Idle);
        assert_eq!(t.remaining_secs, 10);
    }

    #[test]
    fn completes_on_last_tick_and_does_not_restart() {
        let mut t = running(2);
        assert_eq!(t.tick(), TickOutcome::Counted);
        assert_eq!(t.tick(), TickOutcome::Completed);
        assert_eq!(t.status, TimerStatus::Completed);
        assert_eq!(t.remaining_secs, 0);
        assert_eq!(t.tick(), TickOutcome::Ignored);

        t.acknowledge_completion();
        assert_eq!(t.status, TimerStatus::Idle);
        assert_eq!(t.remaining_secs, 2);
    }

    #[test]
    fn mode_change_rejected_while_active() {
        let mut t = running(60);
        assert_eq!(t.set_mode(TimerMode::Deep, 3000), Err(TimerError::Busy));
        assert_eq!(t.mode, TimerMode::Custom);
        t.pause();
        assert_eq!(t.set_mode(TimerMode::Deep, 3000), Err(TimerError::Busy));
        t.reset();
        assert!(t.set_mode(TimerMode::Deep, 3000).is_ok());
        assert_eq!(t.duration_secs, 3000);
        assert_eq!(t.remaining_secs, 3000);
    }

    #[test]
    fn mode_change_rejects_out_of_range() {
        let mut t = TimerSession::new(TimerMode::Flow, 1500);
        assert_eq!(t.set_mode(TimerMode::Custom, 0), Err(TimerError::OutOfRange));
        assert_eq!(
            t.set_mode(TimerMode::Custom, MAX_DURATION_SECS + 1),
            Err(TimerError::OutOfRange)
        );
        assert_eq!(t.duration_secs, 1500);
    }

    #[test]
    fn parse_bare_minutes() {
        assert_eq!(parse_duration("25"), Ok(1500));
        assert_eq!(parse_duration(" 1 "), Ok(60));
    }

    #[test]
    fn parse_units() {
        assert_eq!(parse_duration("90s"), Ok(90));
        assert_eq!(parse_duration("45m"), Ok(2700));
        assert_eq!(parse_duration("1h30m"), Ok(5400));
        assert_eq!(parse_duration("2H"), Ok(7200));
    }

    #[test]
    fn parse_clock_notation() {
        assert_eq!(parse_duration("1:30"), Ok(90));
        assert_eq!(parse_duration("1:02:05"), Ok(3725));
        assert!(matches!(parse_duration("1:75"), Err(TimerError::Unparseable(_))));
    }

    #[test]
    fn parse_rejects_zero_and_too_long() {
        assert_eq!(parse_duration("0"), Err(TimerError::OutOfRange));
        assert_eq!(parse_duration("0:00"), Err(TimerError::OutOfRange));
        assert_eq!(parse_duration("25h"), Err(TimerError::OutOfRange));
        assert_eq!(parse_duration("24h"), Ok(MAX_DURATION_SECS));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(parse_duration(""), Err(TimerError::Unparseable(_))));
        assert!(matches!(parse_duration("soon"), Err(TimerError::Unparseable(_))));
        assert!(matches!(parse_duration("-5"), Err(TimerError::Unparseable(_))));
        assert!(matches!(parse_duration("10x"), Err(TimerError::Unparseable(_))));
    }
}
