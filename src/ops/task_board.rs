use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::model::task::Task;
use crate::ops::swipe::{SwipeDirection, SwipeOutcome, SwipeTracker};
use crate::ops::task_filter::{TaskCounts, TaskFilter, filtered_indices};
use crate::ops::task_source::TaskSource;

/// The tasks screen's in-memory list plus its filter, search text and
/// in-flight swipe gestures.
#[derive(Debug, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    pub filter: TaskFilter,
    pub query: String,
    pub swipes: SwipeTracker,
}

impl TaskBoard {
    pub fn new(tasks: Vec<Task>) -> Self {
        TaskBoard {
            tasks,
            ..TaskBoard::default()
        }
    }

    /// Replace the list with a fresh one. Filter and search are kept;
    /// in-flight gestures refer to the old list and are dropped.
    pub fn regenerate(&mut self, source: &mut dyn TaskSource, now: DateTime<Utc>) {
        self.tasks = source.generate(now);
        self.swipes = SwipeTracker::default();
        log::debug!("generated {} tasks", self.tasks.len());
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Tasks that pass the current search and status filter, in list order.
    pub fn visible(&self, now: DateTime<Utc>) -> Vec<&Task> {
        filtered_indices(&self.tasks, self.filter, &self.query, now)
            .into_iter()
            .map(|i| &self.tasks[i])
            .collect()
    }

    pub fn visible_ids(&self, now: DateTime<Utc>) -> Vec<String> {
        self.visible(now).into_iter().map(|t| t.id.clone()).collect()
    }

    pub fn counts(&self, now: DateTime<Utc>) -> TaskCounts {
        TaskCounts::of(&self.tasks, now)
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
    }

    pub fn toggle_completed(&mut self, id: &str) -> Option<bool> {
        let task = self.get_mut(id)?;
        task.toggle_completed();
        Some(task.completed)
    }

    pub fn toggle_expanded(&mut self, id: &str) -> Option<bool> {
        let task = self.get_mut(id)?;
        task.is_expanded = !task.is_expanded;
        Some(task.is_expanded)
    }

    /// Drop a task from the list. Relationships pointing at it go too.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(idx);
        for task in &mut self.tasks {
            task.relationships.retain(|r| r.task_id != id);
        }
        Some(removed)
    }

    /// Finish the active drag. Completion toggles immediately; a delete only
    /// starts the exit animation and is applied later by [`TaskBoard::advance`].
    pub fn release_swipe(&mut self, screen_width: f32, now: Instant) -> Option<(String, SwipeOutcome)> {
        let (id, outcome) = self.swipes.release(screen_width, now)?;
        if outcome == SwipeOutcome::ToggleComplete {
            self.toggle_completed(&id);
        }
        Some((id, outcome))
    }

    /// Keyboard equivalent of a full swipe on `id`.
    pub fn fling(
        &mut self,
        id: &str,
        direction: SwipeDirection,
        screen_width: f32,
        now: Instant,
    ) -> Option<SwipeOutcome> {
        self.get(id)?;
        let outcome = self.swipes.fling(id, direction, screen_width, now)?;
        if outcome == SwipeOutcome::ToggleComplete {
            self.toggle_completed(id);
        }
        Some(outcome)
    }

    /// Step gesture animations; rows whose exit animation has finished are
    /// removed now. Returns the removed tasks.
    pub fn advance(&mut self, now: Instant) -> Vec<Task> {
        self.swipes
            .advance(now)
            .iter()
            .filter_map(|id| self.remove(id))
            .collect()
    }
}
