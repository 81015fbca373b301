use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Ceiling for every distortion level (manual and effective).
pub const MAX_LEVEL: u8 = 10;

/// Glyphs substituted into a glitched time display.
const GLITCH_GLYPHS: &[&str] = &[
    "#", "$", "%", "&", "@", "!", "?", "*", "~", "§", "¤", "∆", "Ω", "≠", "∞", "¿",
];

/// Manual distortion level plus the distraction counter.
///
/// The effective level is always derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistortionState {
    manual_level: u8,
    distraction_count: u32,
}

impl DistortionState {
    pub fn new(manual_level: i32, distraction_count: u32) -> Self {
        let mut state = DistortionState {
            manual_level: 0,
            distraction_count,
        };
        state.set_manual_level(manual_level);
        state
    }

    pub fn manual_level(&self) -> u8 {
        self.manual_level
    }

    pub fn distraction_count(&self) -> u32 {
        self.distraction_count
    }

    pub fn effective_level(&self) -> u8 {
        effective_level(self.manual_level, self.distraction_count)
    }

    /// Set the manual level, clamping into `[0, MAX_LEVEL]`.
    pub fn set_manual_level(&mut self, level: i32) {
        self.manual_level = level.clamp(0, MAX_LEVEL as i32) as u8;
    }

    pub fn raise_manual(&mut self) {
        self.set_manual_level(self.manual_level as i32 + 1);
    }

    pub fn lower_manual(&mut self) {
        self.set_manual_level(self.manual_level as i32 - 1);
    }

    pub fn record_distraction(&mut self) {
        self.distraction_count = self.distraction_count.saturating_add(1);
    }

    pub fn clear_distractions(&mut self) {
        self.distraction_count = 0;
    }

    pub fn clear_manual(&mut self) {
        self.manual_level = 0;
    }

    pub fn effects(&self) -> Vec<Effect> {
        active_effects(self.effective_level())
    }
}

/// `min(10, manual + floor(count / 2))`, with `manual` clamped first.
pub fn effective_level(manual_level: u8, distraction_count: u32) -> u8 {
    let manual = manual_level.min(MAX_LEVEL) as u32;
    (manual + distraction_count / 2).min(MAX_LEVEL as u32) as u8
}

/// A cosmetic effect unlocked at a fixed level threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Effect {
    Wobble,
    Pulse,
    Skew,
    HueShift,
    Drift,
    Flicker,
    GlyphSwap,
    HapticPulse,
    Scramble,
    Meltdown,
}

impl Effect {
    /// Every effect, ordered by threshold.
    pub const ALL: [Effect; 10] = [
        Effect::Wobble,
        Effect::Pulse,
        Effect::Skew,
        Effect::HueShift,
        Effect::Drift,
        Effect::Flicker,
        Effect::GlyphSwap,
        Effect::HapticPulse,
        Effect::Scramble,
        Effect::Meltdown,
    ];

    /// Lowest effective level at which this effect is active.
    pub fn threshold(self) -> u8 {
        match self {
            Effect::Wobble => 1,
            Effect::Pulse => 2,
            Effect::Skew => 3,
            Effect::HueShift => 4,
            Effect::Drift => 5,
            Effect::Flicker => 6,
            Effect::GlyphSwap => 7,
            Effect::HapticPulse => 8,
            Effect::Scramble => 9,
            Effect::Meltdown => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Effect::Wobble => "wobble",
            Effect::Pulse => "pulse",
            Effect::Skew => "skew",
            Effect::HueShift => "hue shift",
            Effect::Drift => "drift",
            Effect::Flicker => "flicker",
            Effect::GlyphSwap => "glyph swap",
            Effect::HapticPulse => "haptic pulses",
            Effect::Scramble => "scramble",
            Effect::Meltdown => "meltdown",
        }
    }

    pub fn is_active(self, level: u8) -> bool {
        level >= self.threshold()
    }
}

/// Effects active at `level`, lowest threshold first.
pub fn active_effects(level: u8) -> Vec<Effect> {
    Effect::ALL
        .iter()
        .copied()
        .filter(|e| e.is_active(level))
        .collect()
}

/// How far the time display has degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBand {
    /// Normal clock format.
    Clear,
    /// Some characters replaced with glyphs.
    Glitched,
    /// Random glyphs, unrelated to the real time.
    Scrambled,
}

impl TimeBand {
    pub fn for_level(level: u8) -> TimeBand {
        match level {
            0..=6 => TimeBand::Clear,
            7 | 8 => TimeBand::Glitched,
            _ => TimeBand::Scrambled,
        }
    }
}

/// `H:MM:SS` when an hour or more remains, `MM:SS` otherwise.
pub fn format_time(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// The time as it should be shown at `level`. Purely visual: the caller's
/// `total_secs` is never modified.
pub fn display_time<R: Rng + ?Sized>(total_secs: u32, level: u8, rng: &mut R) -> String {
    let clear = format_time(total_secs);
    match TimeBand::for_level(level) {
        TimeBand::Clear => clear,
        TimeBand::Glitched => {
            let chance = if level >= 8 { 0.45 } else { 0.25 };
            clear
                .graphemes(true)
                .map(|g| {
                    if rng.gen_bool(chance) {
                        random_glyph(rng)
                    } else {
                        g
                    }
                })
                .collect()
        }
        TimeBand::Scrambled => {
            let len = rng.gen_range(4..=8);
            (0..len).map(|_| random_glyph(rng)).collect()
        }
    }
}

fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    GLITCH_GLYPHS.choose(rng).copied().unwrap_or("#")
}

/// Per-frame visual parameters for the time display, derived from the
/// active effects. Renderers translate these into terminal styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Warp {
    /// Horizontal sway in cells (wobble).
    pub sway: i16,
    /// Bold throb (pulse).
    pub bold: bool,
    /// Italic slant (skew).
    pub italic: bool,
    /// Extra left indent from skew.
    pub slant: u16,
    /// Palette index offset (hue shift).
    pub hue: usize,
    /// Offset from the periodic re-position (drift).
    pub drift: (i16, i16),
    /// Dimmed this frame (flicker).
    pub dim: bool,
    /// Fill the background with noise (meltdown).
    pub noise: bool,
}

impl Warp {
    /// Compute the warp for one frame. `phase_ms` is a monotonically growing
    /// animation clock; `drift` is the last position picked by the jitter tick.
    pub fn compute<R: Rng + ?Sized>(level: u8, phase_ms: u64, drift: (i16, i16), rng: &mut R) -> Warp {
        let mut warp = Warp::default();
        let phase = phase_ms as f32 / 1000.0;
        if Effect::Wobble.is_active(level) {
            let amplitude = 1.0 + level as f32 / 3.0;
            warp.sway = ((phase * std::f32::consts::TAU * 0.8).sin() * amplitude).round() as i16;
        }
        if Effect::Pulse.is_active(level) {
            warp.bold = (phase * std::f32::consts::TAU * 1.5).sin() > 0.0;
        }
        if Effect::Skew.is_active(level) {
            warp.italic = true;
            warp.slant = 1 + (level as u16 - 3) / 3;
        }
        if Effect::HueShift.is_active(level) {
            warp.hue = (phase_ms / 400) as usize;
        }
        if Effect::Drift.is_active(level) {
            warp.drift = drift;
        }
        if Effect::Flicker.is_active(level) {
            warp.dim = rng.gen_bool(0.1 + (level - 6) as f64 * 0.05);
        }
        if Effect::Meltdown.is_active(level) {
            warp.noise = true;
        }
        warp
    }
}
