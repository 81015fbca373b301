use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::task::{Category, Personality, Priority, Relationship, RelationshipKind, Task};

/// Where the tasks screen gets its list from on mount.
pub trait TaskSource {
    fn generate(&mut self, now: DateTime<Utc>) -> Vec<Task>;
}

/// Titles and blurbs per category
fn templates(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::Work => &[
            ("Finish the quarterly report", "The numbers will not crunch themselves. Probably."),
            ("Reply to the email thread", "Forty-two replies deep and counting."),
            ("Prepare sprint demo", "Make the spinner spin convincingly."),
            ("Review pull requests", "Three of them say 'quick fix'. None are quick."),
            ("Update project roadmap", "Move everything one quarter to the right."),
        ],
        Category::Personal => &[
            ("Call grandma", "She has opinions about your haircut."),
            ("Plan weekend trip", "Somewhere with no Wi-Fi. Or great Wi-Fi."),
            ("Write in journal", "Document the time the clock melted."),
            ("Sort out photo backlog", "Eleven thousand pictures of sunsets."),
        ],
        Category::Health => &[
            ("Go for a run", "Five kilometres or until a dog stops you."),
            ("Book dentist appointment", "It has been 'a while'."),
            ("Drink more water", "Hydration is a form of time travel."),
            ("Stretch for ten minutes", "Your spine sends its regards."),
        ],
        Category::Learning => &[
            ("Read two chapters", "The book on the nightstand misses you."),
            ("Practice Spanish", "Keep the streak alive, the owl is watching."),
            ("Finish online course module", "Video 7 of 48. Progress!"),
            ("Learn a new recipe", "Something beyond toast."),
        ],
        Category::Errands => &[
            ("Buy groceries", "Milk, eggs, and whatever is on sale."),
            ("Return library books", "Before the fines achieve sentience."),
            ("Pick up dry cleaning", "The suit has been waiting patiently."),
            ("Renew car insurance", "Paperwork, the final boss."),
        ],
    }
}

/// Generates a fresh, plausible-looking list of tasks with random deadlines,
/// personalities and relationships.
pub struct RandomTaskSource<R: Rng = StdRng> {
    rng: R,
    count: usize,
}

impl RandomTaskSource<StdRng> {
    pub fn new(count: usize) -> Self {
        RandomTaskSource {
            rng: StdRng::from_entropy(),
            count,
        }
    }

    pub fn seeded(count: usize, seed: u64) -> Self {
        RandomTaskSource {
            rng: StdRng::seed_from_u64(seed),
            count,
        }
    }
}

impl<R: Rng> TaskSource for RandomTaskSource<R> {
    fn generate(&mut self, now: DateTime<Utc>) -> Vec<Task> {
        let rng = &mut self.rng;
        let mut tasks: Vec<Task> = (0..self.count)
            .map(|i| {
                let category = *Category::ALL.choose(rng).unwrap_or(&Category::Work);
                let (title, description) = templates(category)
                    .choose(rng)
                    .copied()
                    .unwrap_or(("Something important", "Details unclear."));
                let minutes = rng.gen_range(-6 * 60..=120 * 60);
                Task {
                    id: format!("task-{:02}", i + 1),
                    title: title.to_string(),
                    description: description.to_string(),
                    category,
                    priority: *Priority::ALL.choose(rng).unwrap_or(&Priority::Medium),
                    deadline: now + Duration::minutes(minutes),
                    completed: rng.gen_bool(0.2),
                    personality: *Personality::ALL.choose(rng).unwrap_or(&Personality::Chill),
                    relationships: Vec::new(),
                    is_expanded: false,
                }
            })
            .collect();

        let ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        for task in &mut tasks {
            let n = rng.gen_range(0..=2usize);
            let others: Vec<&String> = ids.iter().filter(|id| **id != task.id).collect();
            for other in others.choose_multiple(rng, n) {
                let kind = if rng.gen_bool(0.5) {
                    RelationshipKind::Friend
                } else {
                    RelationshipKind::Frenemy
                };
                task.relationships.push(Relationship {
                    task_id: (*other).clone(),
                    kind,
                });
            }
        }
        tasks
    }
}

/// A fixed list, for tests and demos.
pub struct StaticTaskSource(pub Vec<Task>);

impl TaskSource for StaticTaskSource {
    fn generate(&mut self, _now: DateTime<Utc>) -> Vec<Task> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_requested_count_with_unique_ids() {
        let now = Utc::now();
        let tasks = RandomTaskSource::seeded(12, 1).generate(now);
        assert_eq!(tasks.len(), 12);
        let ids: HashSet<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn relationships_point_at_other_existing_tasks() {
        let now = Utc::now();
        let tasks = RandomTaskSource::seeded(10, 7).generate(now);
        let ids: HashSet<_> = tasks.iter().map(|t| t.id.clone()).collect();
        for task in &tasks {
            assert!(task.relationships.len() <= 2);
            for rel in &task.relationships {
                assert_ne!(rel.task_id, task.id);
                assert!(ids.contains(&rel.task_id));
            }
        }
    }

    #[test]
    fn deadlines_within_window() {
        let now = Utc::now();
        for task in RandomTaskSource::seeded(50, 3).generate(now) {
            let minutes = (task.deadline - now).num_minutes();
            assert!((-6 * 60..=120 * 60).contains(&minutes));
            assert!(!task.is_expanded);
        }
    }

    #[test]
    fn same_seed_same_list() {
        let now = Utc::now();
        let a = RandomTaskSource::seeded(5, 99).generate(now);
        let b = RandomTaskSource::seeded(5, 99).generate(now);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(RandomTaskSource::seeded(0, 1).generate(Utc::now()).is_empty());
    }
}
