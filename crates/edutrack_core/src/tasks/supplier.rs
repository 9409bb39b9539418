//! Fixed-template task supplier.

use super::templates::{self, TaskTemplate};
use crate::model::task::Task;

/// Subject whose list is used for unknown input.
pub const DEFAULT_SUBJECT: &str = "default";

/// Known subject keys, lowercase.
pub const KNOWN_SUBJECTS: &[&str] = &["math", "science", "english", DEFAULT_SUBJECT];

/// Returns the subject tasks followed by the common health tasks.
///
/// Lookup is case-insensitive and ignores surrounding whitespace; unknown or
/// empty subjects get the `default` list.
pub fn supply_tasks(subject: &str) -> Vec<Task> {
    let subject_tasks = templates_for(subject);
    complete_all(subject_tasks.iter().chain(templates::HEALTH))
}

/// List served when a task provider fails.
pub fn fallback_tasks() -> Vec<Task> {
    complete_all(templates::FALLBACK.iter().chain(templates::HEALTH))
}

fn templates_for(subject: &str) -> &'static [TaskTemplate] {
    match subject.trim().to_ascii_lowercase().as_str() {
        "math" => templates::MATH,
        "science" => templates::SCIENCE,
        "english" => templates::ENGLISH,
        _ => templates::DEFAULT,
    }
}

fn complete_all<'a>(items: impl Iterator<Item = &'a TaskTemplate>) -> Vec<Task> {
    items
        .map(TaskTemplate::to_draft)
        .enumerate()
        .map(|(index, draft)| draft.complete(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{fallback_tasks, supply_tasks, DEFAULT_SUBJECT};
    use crate::model::task::TaskType;

    #[test]
    fn subject_lookup_ignores_case_and_whitespace() {
        assert_eq!(supply_tasks("  MATH "), supply_tasks("math"));
        assert_eq!(supply_tasks("math")[0].title, "Solve practice problems from Chapter 5");
    }

    #[test]
    fn unknown_subject_uses_default_list() {
        assert_eq!(supply_tasks("astrology"), supply_tasks(DEFAULT_SUBJECT));
        assert_eq!(supply_tasks(""), supply_tasks(DEFAULT_SUBJECT));
    }

    #[test]
    fn health_tasks_trail_every_list() {
        let tasks = supply_tasks("science");
        assert_eq!(tasks.len(), 5);
        assert!(tasks[2..].iter().all(|task| task.kind == TaskType::Health));
        assert_eq!(tasks.last().unwrap().title, "Practice deep breathing");
    }

    #[test]
    fn fallback_list_starts_with_review_task() {
        let tasks = fallback_tasks();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].title, "Review study materials");
        assert!(tasks.iter().all(|task| task.is_complete()));
    }
}
