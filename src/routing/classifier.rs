//! LLM-based supervisor
//!
//! Asks an LLM provider which task should run next. The reply is free text;
//! [`parse_task_label`] reduces it to a label by substring matching, so the
//! router tolerates chatty answers like "Let's do image_generation next".
//!
//! There is no retry and no fallback: a provider failure aborts routing.

use crate::error::WorkflowError;
use crate::llm::provider::{CompletionRequest, LlmProvider};
use crate::routing::router::{record_decision, Router};
use crate::state::WorkflowState;
use crate::task::{current_task_name, TaskLabel};
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_SYSTEM_PROMPT: &str = "You are the supervisor of an image processing workflow. \
Given the user's request and the task that just ran, choose the next task. \
Answer with exactly one of: image_generation, text_overlay, background_removal, end.";

/// Reduce a classifier reply to a task label
///
/// Matching is case-insensitive and checks `image_generation`, then
/// `text_overlay`, then `background_removal`; the first label found anywhere
/// in the reply wins. A reply naming none of them routes to `end`.
pub fn parse_task_label(reply: &str) -> TaskLabel {
    let reply = reply.to_lowercase();
    TaskLabel::STEPS
        .into_iter()
        .find(|label| reply.contains(label.as_str()))
        .unwrap_or(TaskLabel::End)
}

/// Router that delegates each decision to an LLM
pub struct ClassifyingRouter {
    /// LLM provider
    provider: Arc<dyn LlmProvider>,
    /// Model to use for routing decisions
    model: String,
    /// Temperature for routing decisions (default: 0.0)
    temperature: f32,
    max_tokens: Option<u32>,
    system_prompt: String,
}

impl ClassifyingRouter {
    /// Create a new classifying router
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Build the user prompt from the request and the current task
    fn build_user_prompt(state: &WorkflowState) -> String {
        format!(
            r#"ORIGINAL USER REQUEST:
{}

CURRENT TASK: {}

AVAILABLE TASKS:
- image_generation: create a new image from the request
- text_overlay: add text to the current image
- background_removal: remove the background of the current image
- end: the request is fully handled

Which task should run next?"#,
            state.original_request(),
            current_task_name(state.current_task())
        )
    }

    fn build_completion_request(&self, state: &WorkflowState) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            user_prompt: Self::build_user_prompt(state),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait::async_trait]
impl Router for ClassifyingRouter {
    fn name(&self) -> &str {
        "classifier"
    }

    async fn route(
        &self,
        state: &WorkflowState,
    ) -> Result<(TaskLabel, WorkflowState), WorkflowError> {
        let request = self.build_completion_request(state);

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            "Classifier prompt:\n{}",
            request.user_prompt
        );

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| WorkflowError::classification(e.to_string()))?;

        let reply = response
            .content
            .ok_or_else(|| WorkflowError::classification("No content in classifier response"))?;

        let next = parse_task_label(&reply);

        info!(
            current_task = current_task_name(state.current_task()),
            next = %next,
            reply = %reply.trim(),
            "Classifier routing decision"
        );

        Ok((next, record_decision(state, next)))
    }
}
