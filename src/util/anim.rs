//! Fire-and-forget animation timelines.
//!
//! Animations are sampled by the renderer; the only thing the application
//! ever waits on is [`Animation::finished`].

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOutCubic,
    EaseInCubic,
    EaseInOutSine,
    /// Overshoots the target and settles back.
    EaseOutBack,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInCubic => t * t * t,
            Easing::EaseInOutSine => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
            Easing::EaseOutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
        }
    }
}

/// Interpolates a scalar from `from` to `to` over `duration`.
#[derive(Debug, Clone, Copy)]
pub struct Animation {
    start: Instant,
    duration: Duration,
    from: f32,
    to: f32,
    easing: Easing,
}

impl Animation {
    pub fn new(from: f32, to: f32, duration: Duration, easing: Easing, now: Instant) -> Self {
        Animation {
            start: now,
            duration,
            from,
            to,
            easing,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn value(&self, now: Instant) -> f32 {
        let eased = self.easing.apply(self.progress(now));
        self.from + (self.to - self.from) * eased
    }

    pub fn finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}
