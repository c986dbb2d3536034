//! Router trait
//!
//! Routers see the whole workflow state and pick the next task label. They
//! never touch the artifact; they only append their decision to the history
//! and move `current_task`.
//!
//! ```text
//! Router (decision) → StepRunner (work) → Router → … → END
//! ```

use crate::error::WorkflowError;
use crate::state::{LogEntry, WorkflowState};
use crate::task::TaskLabel;

/// Router trait for choosing the next workflow step
#[async_trait::async_trait]
pub trait Router: Send + Sync {
    /// Short strategy name used in logs
    fn name(&self) -> &str;

    /// Decide the next task and return it with the updated state
    ///
    /// The returned state has exactly one more history entry than `state`
    /// and its `current_task` set to the returned label.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision cannot be made (e.g. the classifier
    /// is unreachable). Nothing is recorded in that case.
    async fn route(
        &self,
        state: &WorkflowState,
    ) -> Result<(TaskLabel, WorkflowState), WorkflowError>;
}

/// Apply a routing decision to a state: one log entry, new current task
pub fn record_decision(state: &WorkflowState, next: TaskLabel) -> WorkflowState {
    state
        .clone()
        .with_current_task(next)
        .record(LogEntry::supervisor(format!(
            "Supervisor: Routing to {}",
            next.routing_name()
        )))
}
