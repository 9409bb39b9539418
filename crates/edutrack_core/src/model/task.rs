//! Display-only task descriptors.

use serde::{Deserialize, Serialize};

/// Task category shown as a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    Study,
    Health,
    Exercise,
    Break,
    Other,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Study => "Study",
            Self::Health => "Health",
            Self::Exercise => "Exercise",
            Self::Break => "Break",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive parse; unknown labels return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "study" => Some(Self::Study),
            "health" => Some(Self::Health),
            "exercise" => Some(Self::Exercise),
            "break" => Some(Self::Break),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// A suggested study or health task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    /// Serialized as `type` to match the task generator schema.
    #[serde(rename = "type")]
    pub kind: TaskType,
    /// Free text such as `45 min`.
    pub duration: String,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Task {
    /// Returns whether every displayed field carries non-blank text.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.duration.trim().is_empty()
            && self
                .description
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
    }
}
