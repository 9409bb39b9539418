//! Task suggestion use-case service.
//!
//! # Invariants
//! - `fetch_tasks` never fails; provider errors degrade to the fallback list.

use crate::model::task::Task;
use crate::tasks::provider::TaskProvider;
use crate::tasks::supplier::fallback_tasks;
use log::{info, warn};

pub struct TaskService<P: TaskProvider> {
    provider: P,
}

impl<P: TaskProvider> TaskService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns provider tasks, or the fallback list when the provider errors.
    ///
    /// An empty but successful provider answer is passed through unchanged.
    pub fn fetch_tasks(&self, subject: &str) -> Vec<Task> {
        match self.provider.generate(subject) {
            Ok(tasks) => {
                info!(
                    "event=tasks_fetch module=service status=ok provider={} count={}",
                    self.provider.provider_id(),
                    tasks.len()
                );
                tasks
            }
            Err(err) => {
                warn!(
                    "event=tasks_fetch module=service status=fallback provider={} error={}",
                    self.provider.provider_id(),
                    err
                );
                fallback_tasks()
            }
        }
    }
}
