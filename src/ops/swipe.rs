//! Horizontal swipe gestures on task rows.
//!
//! A drag is tracked in cells relative to where it started. On release the
//! offset is compared against a fraction of the screen width:
//!
//! - past the threshold to the left: delete, after an exit animation
//! - past the threshold to the right: toggle completion, then snap back
//! - anything shorter: snap back
//!
//! Deletion is two-phase. [`SwipeTracker::release`] only starts the exit
//! animation; the row is reported for removal by [`SwipeTracker::advance`]
//! once that animation has finished, so it never disappears mid-slide.

use std::time::{Duration, Instant};

use crate::util::anim::{Animation, Easing};

/// Fraction of the screen width a drag must exceed to count.
pub const SWIPE_THRESHOLD: f32 = 0.3;

pub const EXIT_DURATION: Duration = Duration::from_millis(250);
pub const SNAP_DURATION: Duration = Duration::from_millis(180);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Delete,
    ToggleComplete,
    SnapBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Decide what a release at `offset` cells means on a `screen_width`-cell screen.
pub fn classify_release(offset: f32, screen_width: f32) -> SwipeOutcome {
    let threshold = screen_width * SWIPE_THRESHOLD;
    if offset < -threshold {
        SwipeOutcome::Delete
    } else if offset > threshold {
        SwipeOutcome::ToggleComplete
    } else {
        SwipeOutcome::SnapBack
    }
}

#[derive(Debug, Clone)]
struct Drag {
    task_id: String,
    origin_x: f32,
    offset: f32,
}

#[derive(Debug, Clone)]
struct RowAnimation {
    task_id: String,
    anim: Animation,
    removes: bool,
}

#[derive(Debug, Default)]
pub struct SwipeTracker {
    drag: Option<Drag>,
    animations: Vec<RowAnimation>,
}

impl SwipeTracker {
    /// Start dragging a row. Rows already sliding out cannot be grabbed.
    pub fn begin(&mut self, task_id: &str, x: f32) -> bool {
        if self.is_exiting(task_id) {
            return false;
        }
        self.animations.retain(|a| a.task_id != task_id);
        self.drag = Some(Drag {
            task_id: task_id.to_string(),
            origin_x: x,
            offset: 0.0,
        });
        true
    }

    pub fn drag_to(&mut self, x: f32) {
        if let Some(drag) = &mut self.drag {
            drag.offset = x - drag.origin_x;
        }
    }

    /// Nudge the active drag by `delta` cells (keyboard dragging).
    pub fn nudge(&mut self, delta: f32) {
        if let Some(drag) = &mut self.drag {
            drag.offset += delta;
        }
    }

    pub fn dragging(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.task_id.as_str())
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }

    /// Finish the drag and start the matching animation.
    pub fn release(&mut self, screen_width: f32, now: Instant) -> Option<(String, SwipeOutcome)> {
        let drag = self.drag.take()?;
        let outcome = classify_release(drag.offset, screen_width);
        let (to, duration, easing, removes) = match outcome {
            SwipeOutcome::Delete => (-screen_width, EXIT_DURATION, Easing::EaseInCubic, true),
            SwipeOutcome::ToggleComplete | SwipeOutcome::SnapBack => {
                (0.0, SNAP_DURATION, Easing::EaseOutBack, false)
            }
        };
        self.animations.push(RowAnimation {
            task_id: drag.task_id.clone(),
            anim: Animation::new(drag.offset, to, duration, easing, now),
            removes,
        });
        Some((drag.task_id, outcome))
    }

    /// A full swipe in one motion, as triggered from the keyboard.
    pub fn fling(
        &mut self,
        task_id: &str,
        direction: SwipeDirection,
        screen_width: f32,
        now: Instant,
    ) -> Option<SwipeOutcome> {
        if !self.begin(task_id, 0.0) {
            return None;
        }
        let distance = screen_width * (SWIPE_THRESHOLD + 0.1);
        self.nudge(match direction {
            SwipeDirection::Left => -distance,
            SwipeDirection::Right => distance,
        });
        self.release(screen_width, now).map(|(_, outcome)| outcome)
    }

    /// Horizontal offset of a row right now, in cells.
    pub fn offset_of(&self, task_id: &str, now: Instant) -> f32 {
        if let Some(drag) = &self.drag {
            if drag.task_id == task_id {
                return drag.offset;
            }
        }
        self.animations
            .iter()
            .find(|a| a.task_id == task_id)
            .map_or(0.0, |a| a.anim.value(now))
    }

    pub fn is_exiting(&self, task_id: &str) -> bool {
        self.animations
            .iter()
            .any(|a| a.removes && a.task_id == task_id)
    }

    pub fn is_animating(&self) -> bool {
        self.drag.is_some() || !self.animations.is_empty()
    }

    /// Retire finished animations. Returns the ids of rows whose exit
    /// animation just completed; the caller removes them from its list.
    pub fn advance(&mut self, now: Instant) -> Vec<String> {
        let mut removed = Vec::new();
        self.animations.retain(|a| {
            if !a.anim.finished(now) {
                return true;
            }
            if a.removes {
                removed.push(a.task_id.clone());
            }
            false
        });
        removed
    }
}
