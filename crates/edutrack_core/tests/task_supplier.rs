use edutrack_core::tasks::provider::generation_request;
use edutrack_core::tasks::supplier::KNOWN_SUBJECTS;
use edutrack_core::{
    fallback_tasks, supply_tasks, CannedResponseProvider, Task, TaskPriority, TaskProvider,
    TaskProviderError, TaskService, TaskType, TemplateTaskProvider, DEFAULT_SUBJECT,
};
use std::time::{Duration, Instant};

fn assert_all_fields_present(tasks: &[Task]) {
    for task in tasks {
        assert!(!task.title.trim().is_empty());
        assert!(!task.kind.as_str().is_empty());
        assert!(!task.duration.trim().is_empty());
        assert!(!task.priority.as_str().is_empty());
        assert!(task
            .description
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty()));
    }
}

#[test]
fn unrecognized_subjects_match_default_subject() {
    let default_tasks = supply_tasks(DEFAULT_SUBJECT);
    for subject in ["history", "Physics", "  ", "mathematics", "默认"] {
        assert_eq!(supply_tasks(subject), default_tasks, "subject {subject:?}");
    }
}

#[test]
fn subject_lookup_ignores_case_and_padding() {
    assert_eq!(supply_tasks(" Math "), supply_tasks("math"));
    assert_eq!(supply_tasks("\tSCIENCE\n"), supply_tasks("science"));
    assert_ne!(supply_tasks(" math "), supply_tasks(DEFAULT_SUBJECT));
}

#[test]
fn every_task_has_all_five_fields() {
    for subject in KNOWN_SUBJECTS.iter().copied().chain(["unknown"]) {
        let tasks = supply_tasks(subject);
        assert_eq!(tasks.len(), 5);
        assert_all_fields_present(&tasks);
    }
    assert_all_fields_present(&fallback_tasks());
}

#[test]
fn supplier_is_deterministic() {
    assert_eq!(supply_tasks("english"), supply_tasks("english"));
    let english = supply_tasks("English");
    assert_eq!(english[1].title, "Write an essay outline");
    assert_eq!(english[1].priority, TaskPriority::High);
}

#[test]
fn template_provider_waits_for_configured_latency() {
    let provider = TemplateTaskProvider::with_latency(Duration::from_millis(20));
    let started = Instant::now();
    let tasks = provider.generate("science").unwrap();
    assert!(started.elapsed() >= Duration::from_millis(20));
    assert_eq!(tasks, supply_tasks("science"));
    assert_eq!(provider.provider_id(), "template");
}

#[test]
fn canned_provider_parses_candidate_text() {
    let body = serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{
                    "text": "[{\"title\":\"Stretch\",\"type\":\"Break\",\"duration\":\"5 min\",\"priority\":\"low\"}]"
                }]
            }
        }]
    })
    .to_string();
    let service = TaskService::new(CannedResponseProvider::new(body));

    let tasks = service.fetch_tasks("math");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].kind, TaskType::Break);
    assert_eq!(
        tasks[0].description.as_deref(),
        Some("Complete: Stretch (5 min)")
    );
}

#[test]
fn canned_provider_with_prose_answer_yields_no_tasks() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"I cannot help with that."}]}}]}"#;
    let service = TaskService::new(CannedResponseProvider::new(body));
    assert!(service.fetch_tasks("math").is_empty());
}

#[test]
fn unreadable_envelope_falls_back_to_review_list() {
    let provider = CannedResponseProvider::new("502 Bad Gateway");
    assert!(matches!(
        provider.generate("math"),
        Err(TaskProviderError::InvalidEnvelope(_))
    ));

    let service = TaskService::new(&provider);
    assert_eq!(service.fetch_tasks("math"), fallback_tasks());
}

#[test]
fn request_body_without_subject_is_bare_prompt() {
    let body = generation_request("   ");
    let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(text.ends_with("priority."));
}
