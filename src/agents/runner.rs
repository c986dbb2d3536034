//! Step runner
//!
//! Runs the agent for one task label: exactly one artifact update and one
//! history entry per call. The request text is passed to the backend but the
//! runner itself never inspects it.

use crate::agents::backend::{MockBackend, TaskBackend};
use crate::error::{WorkflowError, WorkflowResult};
use crate::state::{LogEntry, WorkflowState};
use crate::task::TaskLabel;
use std::sync::Arc;
use tracing::{debug, info};

/// What each agent reports after its step
fn action_description(task: TaskLabel) -> Option<&'static str> {
    match task {
        TaskLabel::ImageGeneration => Some("Generated new image"),
        TaskLabel::TextOverlay => Some("Added text to image"),
        TaskLabel::BackgroundRemoval => Some("Removed image background"),
        TaskLabel::End => None,
    }
}

/// Executes task steps against a backend
#[derive(Clone)]
pub struct StepRunner {
    backend: Arc<dyn TaskBackend>,
}

impl Default for StepRunner {
    fn default() -> Self {
        Self::new(Arc::new(MockBackend))
    }
}

impl StepRunner {
    pub fn new(backend: Arc<dyn TaskBackend>) -> Self {
        Self { backend }
    }

    /// Run the step for `task` and return the updated state
    ///
    /// # Errors
    ///
    /// `NoHandler` for `End`; whatever the backend returns otherwise. On error
    /// `state` is untouched and nothing is recorded.
    pub async fn run(&self, task: TaskLabel, state: &WorkflowState) -> WorkflowResult<WorkflowState> {
        let action = action_description(task).ok_or(WorkflowError::NoHandler { task })?;

        debug!(task = %task, backend = self.backend.name(), "Running step");

        let artifact = self
            .backend
            .produce(task, state.original_request())
            .await?;

        info!(task = %task, result_ref = %artifact, "{}: {}", task.agent_name(), action);

        Ok(state
            .clone()
            .with_result_ref(artifact)
            .record(LogEntry::agent(format!("{}: {}", task.agent_name(), action))))
    }
}
