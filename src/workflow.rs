//! Workflow orchestrator
//!
//! Alternates router decisions and agent steps until the router picks END:
//!
//! ```text
//! route → run → route → run → … → route (END)
//! ```
//!
//! One instance handles one request at a time, start to finish. A failing
//! router or backend aborts the run; the failure carries the last history
//! entry that was recorded before it.

use crate::agents::StepRunner;
use crate::config::WorkflowConfig;
use crate::error::{WorkflowError, WorkflowFailure};
use crate::routing::{record_decision, Router};
use crate::state::WorkflowState;
use crate::task::TaskLabel;
use crate::{step_span, workflow_span};
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Result of a completed workflow run
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    pub workflow_id: Uuid,
    pub state: WorkflowState,
    /// Router decisions made, including a forced END
    pub decisions: usize,
    /// True if the iteration cap ended the run instead of the router
    pub forced_end: bool,
}

impl WorkflowOutcome {
    /// Final artifact reference, if any step ran
    pub fn final_artifact(&self) -> Option<&str> {
        self.state.result_ref()
    }
}

/// Supervisor-driven workflow
pub struct Workflow {
    router: Arc<dyn Router>,
    runner: StepRunner,
    max_iterations: usize,
}

impl Workflow {
    pub fn new(router: Arc<dyn Router>, runner: StepRunner) -> Self {
        Self {
            router,
            runner,
            max_iterations: 10,
        }
    }

    /// Build a workflow with the limits from configuration
    pub fn from_config(config: &WorkflowConfig, router: Arc<dyn Router>, runner: StepRunner) -> Self {
        Self::new(router, runner).with_max_iterations(config.workflow.max_iterations)
    }

    /// Cap on router decisions before the run is forced to END
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn router_name(&self) -> &str {
        self.router.name()
    }

    /// Run a fresh workflow for a user request
    pub async fn execute(
        &self,
        request: impl Into<String>,
    ) -> Result<WorkflowOutcome, WorkflowFailure> {
        self.resume(WorkflowState::new(request)).await
    }

    /// Continue a workflow from an existing state
    pub async fn resume(&self, state: WorkflowState) -> Result<WorkflowOutcome, WorkflowFailure> {
        let workflow_id = Uuid::new_v4();
        let span = workflow_span!(workflow_id = %workflow_id, router = self.router.name());
        self.drive(workflow_id, state).instrument(span).await
    }

    async fn drive(
        &self,
        workflow_id: Uuid,
        mut state: WorkflowState,
    ) -> Result<WorkflowOutcome, WorkflowFailure> {
        info!("Workflow started");
        let mut decisions = 0;
        let mut forced_end = false;

        loop {
            if decisions >= self.max_iterations {
                warn!(
                    max_iterations = self.max_iterations,
                    "Iteration limit reached, forcing END"
                );
                state = record_decision(&state, TaskLabel::End);
                decisions += 1;
                forced_end = true;
                break;
            }

            let (next, routed) = match self.router.route(&state).await {
                Ok(decision) => decision,
                Err(e) => return Err(Self::abort(workflow_id, e, &state)),
            };
            decisions += 1;
            state = routed;

            if next.is_terminal() {
                break;
            }

            state = match self
                .runner
                .run(next, &state)
                .instrument(step_span!(task = %next))
                .await
            {
                Ok(updated) => updated,
                Err(e) => return Err(Self::abort(workflow_id, e, &state)),
            };
        }

        info!(
            decisions,
            history = state.history().len(),
            result_ref = state.result_ref().unwrap_or("none"),
            "Workflow completed"
        );

        Ok(WorkflowOutcome {
            workflow_id,
            state,
            decisions,
            forced_end,
        })
    }

    fn abort(workflow_id: Uuid, error: WorkflowError, state: &WorkflowState) -> WorkflowFailure {
        error!(
            error = %error,
            last_entry = state.last_entry().map(|e| e.text.as_str()).unwrap_or("none"),
            "Workflow aborted"
        );
        WorkflowFailure {
            workflow_id,
            source: error,
            last_entry: state.last_entry().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::DeterministicRouter;
    use crate::testing::mocks::{FailingBackend, MockLlmProvider};
    use crate::routing::ClassifyingRouter;

    fn deterministic() -> Workflow {
        Workflow::new(Arc::new(DeterministicRouter::default()), StepRunner::default())
    }

    #[tokio::test]
    async fn test_full_deterministic_run_records_seven_entries() {
        let outcome = deterministic().execute("sunset").await.unwrap();

        assert_eq!(outcome.state.history().len(), 7);
        assert_eq!(outcome.decisions, 4);
        assert!(!outcome.forced_end);
        assert_eq!(outcome.final_artifact(), Some("mock_bg_removed_image.jpg"));
        assert_eq!(outcome.state.current_task(), Some(TaskLabel::End));
    }

    #[tokio::test]
    async fn test_resume_from_background_removal_ends_without_step() {
        let state = WorkflowState::resumed_at("sunset", Some(TaskLabel::BackgroundRemoval))
            .with_result_ref("mock_text_overlay_image.jpg");

        let outcome = deterministic().resume(state).await.unwrap();

        assert_eq!(outcome.decisions, 1);
        assert_eq!(outcome.state.history().len(), 1);
        assert_eq!(outcome.final_artifact(), Some("mock_text_overlay_image.jpg"));
    }

    #[tokio::test]
    async fn test_iteration_cap_forces_end() {
        let provider = Arc::new(MockLlmProvider::single_response("image_generation"));
        let router = ClassifyingRouter::new(provider, "mock-model");
        let workflow =
            Workflow::new(Arc::new(router), StepRunner::default()).with_max_iterations(3);

        let outcome = workflow.execute("loop forever").await.unwrap();

        assert!(outcome.forced_end);
        assert_eq!(outcome.decisions, 4);
        // 3 routed decisions + 3 steps + forced END
        assert_eq!(outcome.state.history().len(), 7);
        assert_eq!(
            outcome.state.last_entry().unwrap().text,
            "Supervisor: Routing to END"
        );
    }

    #[tokio::test]
    async fn test_zero_iterations_is_clamped_to_one() {
        let workflow = deterministic().with_max_iterations(0);
        let outcome = workflow.execute("sunset").await.unwrap();
        assert!(outcome.forced_end);
        assert_eq!(outcome.final_artifact(), Some("mock_generated_image.jpg"));
    }

    #[tokio::test]
    async fn test_backend_failure_reports_last_entry() {
        let workflow = Workflow::new(
            Arc::new(DeterministicRouter::default()),
            StepRunner::new(Arc::new(FailingBackend::on(TaskLabel::TextOverlay))),
        );

        let failure = workflow.execute("sunset").await.unwrap_err();

        assert!(matches!(failure.source, WorkflowError::StepFailed { .. }));
        assert_eq!(
            failure.last_entry.unwrap().text,
            "Supervisor: Routing to text_overlay"
        );
    }
}
