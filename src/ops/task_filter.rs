use chrono::{DateTime, Utc};
use regex::Regex;

use crate::model::task::Task;

/// Status filter on the tasks screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
    Urgent,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 4] = [
        TaskFilter::All,
        TaskFilter::Active,
        TaskFilter::Completed,
        TaskFilter::Urgent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Completed => "completed",
            TaskFilter::Urgent => "urgent",
        }
    }

    /// Cycle to the next filter
    pub fn next(self) -> TaskFilter {
        match self {
            TaskFilter::All => TaskFilter::Active,
            TaskFilter::Active => TaskFilter::Completed,
            TaskFilter::Completed => TaskFilter::Urgent,
            TaskFilter::Urgent => TaskFilter::All,
        }
    }

    pub fn matches(self, task: &Task, now: DateTime<Utc>) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.completed,
            TaskFilter::Completed => task.completed,
            TaskFilter::Urgent => task.is_urgent(now),
        }
    }
}

/// Compile a search query into a case-insensitive literal matcher. An empty
/// query means "match everything" (`None`).
pub fn compile_search(query: &str) -> Option<Regex> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(query))).ok()
}

/// Title, description or category contains the pattern.
pub fn matches_search(task: &Task, re: Option<&Regex>) -> bool {
    let re = match re {
        Some(r) => r,
        None => return true,
    };
    re.is_match(&task.title) || re.is_match(&task.description) || re.is_match(task.category.label())
}

/// Indices into `tasks` that pass both the search and the status filter,
/// in list order.
pub fn filtered_indices(tasks: &[Task], filter: TaskFilter, query: &str, now: DateTime<Utc>) -> Vec<usize> {
    let re = compile_search(query);
    tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| matches_search(t, re.as_ref()))
        .filter(|(_, t)| filter.matches(t, now))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter_tasks<'a>(tasks: &'a [Task], filter: TaskFilter, query: &str, now: DateTime<Utc>) -> Vec<&'a Task> {
    filtered_indices(tasks, filter, query, now)
        .into_iter()
        .map(|i| &tasks[i])
        .collect()
}

/// Per-filter counts shown on the dashboard and the filter bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub urgent: usize,
}

impl TaskCounts {
    pub fn of(tasks: &[Task], now: DateTime<Utc>) -> TaskCounts {
        let mut counts = TaskCounts {
            total: tasks.len(),
            ..TaskCounts::default()
        };
        for task in tasks {
            if task.completed {
                counts.completed += 1;
            } else {
                counts.active += 1;
            }
            if task.is_urgent(now) {
                counts.urgent += 1;
            }
        }
        counts
    }

    pub fn for_filter(&self, filter: TaskFilter) -> usize {
        match filter {
            TaskFilter::All => self.total,
            TaskFilter::Active => self.active,
            TaskFilter::Completed => self.completed,
            TaskFilter::Urgent => self.urgent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Category, Personality, Priority};
    use chrono::Duration;

    fn task(id: &str, title: &str, hours: i64, completed: bool, now: DateTime<Utc>) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            description: format!("about {}", title.to_lowercase()),
            category: Category::Work,
            priority: Priority::Medium,
            deadline: now + Duration::hours(hours),
            completed,
            personality: Personality::Dramatic,
            relationships: vec![],
            is_expanded: false,
        }
    }

    #[test]
    fn urgent_filter_includes_open_task_due_soon() {
        let now = Utc::now();
        let mut tasks = vec![task("a", "Tax forms", 10, false, now)];
        assert_eq!(filtered_indices(&tasks, TaskFilter::Urgent, "", now), vec![0]);
        tasks[0].completed = true;
        assert!(filtered_indices(&tasks, TaskFilter::Urgent, "", now).is_empty());
    }

    #[test]
    fn status_filters() {
        let now = Utc::now();
        let tasks = vec![
            task("a", "One", 100, false, now),
            task("b", "Two", 100, true, now),
            task("c", "Three", 2, false, now),
        ];
        assert_eq!(filtered_indices(&tasks, TaskFilter::All, "", now), vec![0, 1, 2]);
        assert_eq!(filtered_indices(&tasks, TaskFilter::Active, "", now), vec![0, 2]);
        assert_eq!(filtered_indices(&tasks, TaskFilter::Completed, "", now), vec![1]);
        assert_eq!(filtered_indices(&tasks, TaskFilter::Urgent, "", now), vec![2]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let now = Utc::now();
        let tasks = vec![
            task("a", "Call the dentist", 100, false, now),
            task("b", "Refactor parser", 100, false, now),
        ];
        assert_eq!(filtered_indices(&tasks, TaskFilter::All, "DENTIST", now), vec![0]);
        // description
        assert_eq!(filtered_indices(&tasks, TaskFilter::All, "about refactor", now), vec![1]);
        // category label
        assert_eq!(filtered_indices(&tasks, TaskFilter::All, "work", now), vec![0, 1]);
    }

    #[test]
    fn search_and_status_combine() {
        let now = Utc::now();
        let tasks = vec![
            task("a", "Write docs", 100, true, now),
            task("b", "Write tests", 100, false, now),
        ];
        let hits = filter_tasks(&tasks, TaskFilter::Active, "write", now);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
    }

    #[test]
    fn search_text_is_literal() {
        let now = Utc::now();
        let tasks = vec![
            task("a", "Fix (urgent", 100, false, now),
            task("b", "Ship v1.0", 100, false, now),
            task("c", "Ship v100", 100, false, now),
            task("d", "Ask wha", 100, false, now),
        ];
        assert_eq!(filtered_indices(&tasks, TaskFilter::All, "(urgent", now), vec![0]);
        assert_eq!(filtered_indices(&tasks, TaskFilter::All, "v1.0", now), vec![1]);
        assert!(filtered_indices(&tasks, TaskFilter::All, "what?", now).is_empty());
        assert!(compile_search("   ").is_none());
    }

    #[test]
    fn counts() {
        let now = Utc::now();
        let tasks = vec![
            task("a", "One", 100, false, now),
            task("b", "Two", 5, true, now),
            task("c", "Three", 2, false, now),
        ];
        let counts = TaskCounts::of(&tasks, now);
        assert_eq!(
            counts,
            TaskCounts {
                total: 3,
                active: 2,
                completed: 1,
                urgent: 1
            }
        );
        assert_eq!(counts.for_filter(TaskFilter::Urgent), 1);
    }

    #[test]
    fn filter_cycle_visits_all() {
        let mut f = TaskFilter::default();
        for expected in TaskFilter::ALL.iter().skip(1) {
            f = f.next();
            assert_eq!(f, *expected);
        }
        assert_eq!(f.next(), TaskFilter::All);
    }
}
