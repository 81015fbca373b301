use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::timer::TimerMode;

/// A finished (or abandoned) countdown, kept for the dashboard and the
/// session detail screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSessionRecord {
    pub id: String,
    pub mode: TimerMode,
    pub planned_secs: u32,
    pub focused_secs: u32,
    pub distractions: u32,
    pub peak_level: u8,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Ran all the way down to zero
    pub completed: bool,
}

impl FocusSessionRecord {
    pub fn new_id() -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }

    /// Share of the planned duration actually focused, 0–100.
    pub fn completion_percent(&self) -> u32 {
        if self.planned_secs == 0 {
            return 0;
        }
        ((self.focused_secs as u64 * 100) / self.planned_secs as u64).min(100) as u32
    }
}

/// In-memory history of focus sessions for this run, newest last.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    records: Vec<FocusSessionRecord>,
}

/// Aggregates shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub sessions: usize,
    pub completed: usize,
    pub focused_secs: u64,
    pub distractions: u64,
    pub peak_level: u8,
}

impl SessionLog {
    pub fn push(&mut self, record: FocusSessionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FocusSessionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Newest first
    pub fn recent(&self) -> impl Iterator<Item = &FocusSessionRecord> {
        self.records.iter().rev()
    }

    /// Totals over sessions that started on or after `since`.
    pub fn stats_since(&self, since: DateTime<Utc>) -> SessionStats {
        self.records
            .iter()
            .filter(|r| r.started_at >= since)
            .fold(SessionStats::default(), |mut acc, r| {
                acc.sessions += 1;
                if r.completed {
                    acc.completed += 1;
                }
                acc.focused_secs += r.focused_secs as u64;
                acc.distractions += r.distractions as u64;
                acc.peak_level = acc.peak_level.max(r.peak_level);
                acc
            })
    }
}
