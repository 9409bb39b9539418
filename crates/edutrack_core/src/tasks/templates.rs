use super::draft::TaskDraft;
use crate::model::task::{TaskPriority, TaskType};

pub(crate) struct TaskTemplate {
    pub title: &'static str,
    pub kind: Option<TaskType>,
    pub duration: Option<&'static str>,
    pub priority: Option<TaskPriority>,
    pub description: Option<&'static str>,
}

impl TaskTemplate {
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: Some(self.title.to_string()),
            kind: self.kind,
            duration: self.duration.map(str::to_string),
            priority: self.priority,
            description: self.description.map(str::to_string),
        }
    }
}

const fn study(
    title: &'static str,
    duration: &'static str,
    priority: TaskPriority,
    description: &'static str,
) -> TaskTemplate {
    TaskTemplate {
        title,
        kind: Some(TaskType::Study),
        duration: Some(duration),
        priority: Some(priority),
        description: Some(description),
    }
}

const fn health(title: &'static str, duration: &'static str, description: &'static str) -> TaskTemplate {
    TaskTemplate {
        title,
        kind: Some(TaskType::Health),
        duration: Some(duration),
        priority: Some(TaskPriority::Low),
        description: Some(description),
    }
}

pub(crate) const MATH: &[TaskTemplate] = &[
    study(
        "Solve practice problems from Chapter 5",
        "45 min",
        TaskPriority::High,
        "Complete the practice problems on page 45-50.",
    ),
    study(
        "Review formulas and theorems",
        "30 min",
        TaskPriority::High,
        "Go through all the important formulas from the last two chapters.",
    ),
];

pub(crate) const SCIENCE: &[TaskTemplate] = &[
    study(
        "Read and summarize the next chapter",
        "40 min",
        TaskPriority::High,
        "Read chapter 7 and write a one-page summary.",
    ),
    study(
        "Conduct a small experiment",
        "60 min",
        TaskPriority::Medium,
        "Perform the experiment described in the lab manual on page 32.",
    ),
];

pub(crate) const ENGLISH: &[TaskTemplate] = &[
    study(
        "Read the assigned novel chapter",
        "30 min",
        TaskPriority::High,
        "Read chapter 4 and identify the main themes.",
    ),
    study(
        "Write an essay outline",
        "45 min",
        TaskPriority::High,
        "Create a detailed outline for your upcoming essay.",
    ),
];

pub(crate) const DEFAULT: &[TaskTemplate] = &[
    study(
        "Review notes and summaries",
        "30 min",
        TaskPriority::High,
        "Go through your notes and create a summary of key points.",
    ),
    study(
        "Solve practice questions",
        "45 min",
        TaskPriority::High,
        "Complete the practice questions from the textbook.",
    ),
];

pub(crate) const HEALTH: &[TaskTemplate] = &[
    health(
        "Take a short break and stretch",
        "5 min",
        "Stand up, stretch your body, and rest your eyes.",
    ),
    health(
        "Drink water",
        "2 min",
        "Stay hydrated by drinking a glass of water.",
    ),
    health(
        "Practice deep breathing",
        "3 min",
        "Take deep breaths to relax and refocus.",
    ),
];

/// Used when a provider fails outright.
pub(crate) const FALLBACK: &[TaskTemplate] = &[study(
    "Review study materials",
    "30 min",
    TaskPriority::High,
    "Go through your notes and textbooks.",
)];
