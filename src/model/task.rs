use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Health,
    Learning,
    Errands,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Learning,
        Category::Errands,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Learning => "learning",
            Category::Errands => "errands",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// Bang markers shown next to the title
    pub fn marker(self) -> &'static str {
        match self {
            Priority::Low => "",
            Priority::Medium => "!",
            Priority::High => "!!",
            Priority::Critical => "!!!",
        }
    }
}

/// The mood a task projects onto whoever is avoiding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Procrastinator,
    Perfectionist,
    Overachiever,
    Chill,
    Dramatic,
}

impl Personality {
    pub const ALL: [Personality; 5] = [
        Personality::Procrastinator,
        Personality::Perfectionist,
        Personality::Overachiever,
        Personality::Chill,
        Personality::Dramatic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Personality::Procrastinator => "procrastinator",
            Personality::Perfectionist => "perfectionist",
            Personality::Overachiever => "overachiever",
            Personality::Chill => "chill",
            Personality::Dramatic => "dramatic",
        }
    }

    pub fn catchphrase(self) -> &'static str {
        match self {
            Personality::Procrastinator => "\"Tomorrow sounds nice.\"",
            Personality::Perfectionist => "\"Do it right or not at all.\"",
            Personality::Overachiever => "\"Already planning my sequel.\"",
            Personality::Chill => "\"No rush, friend.\"",
            Personality::Dramatic => "\"If you ignore me one more time...\"",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Friend,
    Frenemy,
}

impl RelationshipKind {
    pub fn label(self) -> &'static str {
        match self {
            RelationshipKind::Friend => "friend",
            RelationshipKind::Frenemy => "frenemy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub task_id: String,
    pub kind: RelationshipKind,
}

/// A to-do item. Lives only in the tasks screen's in-memory list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub deadline: DateTime<Utc>,
    pub completed: bool,
    pub personality: Personality,
    pub relationships: Vec<Relationship>,
    pub is_expanded: bool,
}

impl Task {
    /// Whole hours until the deadline; negative once it has passed.
    pub fn hours_to_deadline(&self, now: DateTime<Utc>) -> i64 {
        (self.deadline - now).num_hours()
    }

    /// Less than a day left and not yet done.
    pub fn is_urgent(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.hours_to_deadline(now) < 24
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.deadline < now
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }
}

/// Short human rendering of the time left, e.g. "3h", "2d", "overdue 5h".
pub fn describe_deadline(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = deadline - now;
    let hours = delta.num_hours();
    if delta.num_minutes() < 0 {
        let late = (-hours).max(0);
        if late >= 24 {
            format!("overdue {}d", late / 24)
        } else {
            format!("overdue {}h", late)
        }
    } else if hours < 1 {
        format!("{}m", delta.num_minutes())
    } else if hours < 48 {
        format!("{}h", hours)
    } else {
        format!("{}d", hours / 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task_due_in(hours: i64, now: DateTime<Utc>) -> Task {
        Task {
            id: "t-1".into(),
            title: "Write report".into(),
            description: "Quarterly numbers".into(),
            category: Category::Work,
            priority: Priority::High,
            deadline: now + Duration::hours(hours),
            completed: false,
            personality: Personality::Chill,
            relationships: vec![],
            is_expanded: false,
        }
    }

    #[test]
    fn urgent_inside_a_day() {
        let now = Utc::now();
        let mut task = task_due_in(10, now);
        assert_eq!(task.hours_to_deadline(now), 10);
        assert!(task.is_urgent(now));
        task.toggle_completed();
        assert!(!task.is_urgent(now));
    }

    #[test]
    fn not_urgent_beyond_a_day() {
        let now = Utc::now();
        assert!(!task_due_in(30, now).is_urgent(now));
        assert!(task_due_in(23, now).is_urgent(now));
    }

    #[test]
    fn overdue_tasks_are_urgent() {
        let now = Utc::now();
        let task = task_due_in(-3, now);
        assert!(task.is_overdue(now));
        assert!(task.is_urgent(now));
    }

    #[test]
    fn deadline_descriptions() {
        let now = Utc::now();
        assert_eq!(describe_deadline(now + Duration::minutes(30), now), "30m");
        assert_eq!(describe_deadline(now + Duration::hours(5), now), "5h");
        assert_eq!(describe_deadline(now + Duration::hours(72), now), "3d");
        assert_eq!(describe_deadline(now - Duration::hours(5), now), "overdue 5h");
        assert_eq!(describe_deadline(now - Duration::hours(50), now), "overdue 2d");
    }
}
