//! Task-generation provider boundary.
//!
//! # Responsibility
//! - Define the "given a subject, return 0+ task descriptors" contract.
//! - Parse generator responses into complete tasks.
//!
//! # Invariants
//! - An unreadable response envelope is a provider error.
//! - Unparseable task text inside a readable envelope yields an empty list.

use super::draft::TaskDraft;
use super::supplier::supply_tasks;
use crate::model::task::{Task, TaskPriority, TaskType};
use log::warn;
use serde::Deserialize;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Simulated round-trip of the template supplier.
pub const DEFAULT_TEMPLATE_LATENCY: Duration = Duration::from_millis(500);

const GENERATION_PROMPT: &str =
    "Generate 5 personalized study or health tasks for a student with title, type, duration, priority.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskProviderError {
    InvalidEnvelope(String),
    Unavailable(String),
}

impl Display for TaskProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEnvelope(message) => {
                write!(f, "task provider returned an invalid response: {message}")
            }
            Self::Unavailable(message) => write!(f, "task provider unavailable: {message}"),
        }
    }
}

impl Error for TaskProviderError {}

/// Produces task suggestions for a subject.
pub trait TaskProvider {
    fn provider_id(&self) -> &str;
    fn generate(&self, subject: &str) -> Result<Vec<Task>, TaskProviderError>;
}

impl<P: TaskProvider + ?Sized> TaskProvider for &P {
    fn provider_id(&self) -> &str {
        (**self).provider_id()
    }

    fn generate(&self, subject: &str) -> Result<Vec<Task>, TaskProviderError> {
        (**self).generate(subject)
    }
}

/// Local reference provider backed by the fixed templates.
#[derive(Debug, Clone, Copy)]
pub struct TemplateTaskProvider {
    latency: Duration,
}

impl TemplateTaskProvider {
    pub fn new() -> Self {
        Self::with_latency(DEFAULT_TEMPLATE_LATENCY)
    }

    /// Tests pass `Duration::ZERO`.
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for TemplateTaskProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskProvider for TemplateTaskProvider {
    fn provider_id(&self) -> &str {
        "template"
    }

    fn generate(&self, subject: &str) -> Result<Vec<Task>, TaskProviderError> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        Ok(supply_tasks(subject))
    }
}

/// Stub generator that answers every request with one canned response body.
#[derive(Debug, Clone)]
pub struct CannedResponseProvider {
    body: String,
}

impl CannedResponseProvider {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl TaskProvider for CannedResponseProvider {
    fn provider_id(&self) -> &str {
        "canned"
    }

    fn generate(&self, _subject: &str) -> Result<Vec<Task>, TaskProviderError> {
        let text = extract_candidate_text(&self.body)?;
        Ok(parse_generated_tasks(&text))
    }
}

/// Builds the JSON request body a real generator endpoint would receive.
pub fn generation_request(subject: &str) -> Value {
    let subject = subject.trim();
    let prompt = if subject.is_empty() {
        GENERATION_PROMPT.to_string()
    } else {
        format!("{GENERATION_PROMPT} Subject: {subject}.")
    };
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": prompt }]
            }
        ]
    })
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
///
/// A readable envelope without that path yields an empty string.
pub fn extract_candidate_text(body: &str) -> Result<String, TaskProviderError> {
    let envelope: Value = serde_json::from_str(body)
        .map_err(|err| TaskProviderError::InvalidEnvelope(err.to_string()))?;
    Ok(envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

/// Parses generator text as a JSON task array; any failure yields no tasks.
///
/// Markdown code fences around the array are tolerated.
pub fn parse_generated_tasks(text: &str) -> Vec<Task> {
    let payload = strip_code_fence(text);
    match serde_json::from_str::<Vec<GeneratedTask>>(payload) {
        Ok(items) => items
            .into_iter()
            .map(GeneratedTask::into_draft)
            .enumerate()
            .map(|(index, draft)| draft.complete(index))
            .collect(),
        Err(err) => {
            warn!(
                "event=task_parse module=tasks status=recovered error_code=invalid_task_json bytes={} error={}",
                text.len(),
                err
            );
            Vec::new()
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[derive(Debug, Deserialize)]
struct GeneratedTask {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl GeneratedTask {
    fn into_draft(self) -> TaskDraft {
        TaskDraft {
            title: self.title,
            kind: self
                .kind
                .as_deref()
                .map(|value| TaskType::parse(value).unwrap_or(TaskType::Other)),
            duration: self.duration,
            priority: self.priority.as_deref().and_then(TaskPriority::parse),
            description: self.description,
        }
    }
}
