//! Partially filled task descriptors and their backfill rules.

use crate::model::task::{Task, TaskPriority, TaskType};

const DEFAULT_DURATION: &str = "30 min";

/// Task as it comes from a template or a generator, any field possibly missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub kind: Option<TaskType>,
    pub duration: Option<String>,
    pub priority: Option<TaskPriority>,
    pub description: Option<String>,
}

impl TaskDraft {
    /// Fills blanks with fixed defaults. `index` is the zero-based list position.
    pub fn complete(self, index: usize) -> Task {
        let title = non_blank(self.title).unwrap_or_else(|| format!("Task {}", index + 1));
        let duration = non_blank(self.duration).unwrap_or_else(|| DEFAULT_DURATION.to_string());
        let description = non_blank(self.description)
            .unwrap_or_else(|| format!("Complete: {title} ({duration})"));

        Task {
            title,
            kind: self.kind.unwrap_or(TaskType::Study),
            duration,
            priority: self.priority.unwrap_or(TaskPriority::Medium),
            description: Some(description),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::TaskDraft;
    use crate::model::task::{TaskPriority, TaskType};

    #[test]
    fn empty_draft_is_backfilled_from_position() {
        let task = TaskDraft::default().complete(2);
        assert_eq!(task.title, "Task 3");
        assert_eq!(task.kind, TaskType::Study);
        assert_eq!(task.duration, "30 min");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.description.as_deref(), Some("Complete: Task 3 (30 min)"));
        assert!(task.is_complete());
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let draft = TaskDraft {
            title: Some("Flashcards".to_string()),
            duration: Some("  ".to_string()),
            description: Some(String::new()),
            ..TaskDraft::default()
        };
        let task = draft.complete(0);
        assert_eq!(task.duration, "30 min");
        assert_eq!(
            task.description.as_deref(),
            Some("Complete: Flashcards (30 min)")
        );
    }
}
