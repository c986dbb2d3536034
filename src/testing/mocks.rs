//! Mock implementations for testing
//!
//! Provides a scripted LlmProvider and a TaskBackend that fails on demand.

use crate::agents::backend::{MockBackend, TaskBackend};
use crate::error::WorkflowError;
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use crate::task::TaskLabel;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// LLM provider that replays canned replies in order, wrapping around
#[derive(Debug, Clone, Default)]
pub struct MockLlmProvider {
    pub responses: Vec<String>,
    pub current_response: Arc<Mutex<usize>>,
    pub should_fail: bool,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlmProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            ..Default::default()
        }
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn single_response(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Replies for a scripted sequence of decisions
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(Into::into).collect())
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub async fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().await.push(request);

        if self.should_fail {
            return Err(LlmError::RequestFailed("Mock LLM failure".to_string()));
        }

        let mut current = self.current_response.lock().await;
        let response_idx = *current % self.responses.len().max(1);
        *current += 1;

        let content = if self.responses.is_empty() {
            "Mock response".to_string()
        } else {
            self.responses[response_idx].clone()
        };

        Ok(CompletionResponse {
            content: Some(content),
            model: "mock-model".to_string(),
        })
    }
}

/// Backend that fails for one task and behaves like [`MockBackend`] otherwise
#[derive(Debug, Clone)]
pub struct FailingBackend {
    pub failing_task: TaskLabel,
}

impl FailingBackend {
    pub fn on(failing_task: TaskLabel) -> Self {
        Self { failing_task }
    }
}

#[async_trait]
impl TaskBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing-mock"
    }

    async fn produce(&self, task: TaskLabel, request: &str) -> Result<String, WorkflowError> {
        if task == self.failing_task {
            return Err(WorkflowError::step_failed(task, "Mock backend failure"));
        }
        MockBackend.produce(task, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "mock-model".to_string(),
            system_prompt: "Pick a task.".to_string(),
            user_prompt: "next?".to_string(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    #[tokio::test]
    async fn test_mock_provider_cycles_through_responses() {
        let provider = MockLlmProvider::scripted(["first", "second"]);

        let replies = [
            provider.complete(request()).await.unwrap().content,
            provider.complete(request()).await.unwrap().content,
            provider.complete(request()).await.unwrap().content,
        ];

        assert_eq!(replies[0].as_deref(), Some("first"));
        assert_eq!(replies[1].as_deref(), Some("second"));
        assert_eq!(replies[2].as_deref(), Some("first"));
        assert_eq!(provider.request_count().await, 3);
    }

    #[tokio::test]
    async fn test_mock_provider_failure() {
        let provider = MockLlmProvider::with_failure();
        assert!(provider.complete(request()).await.is_err());
        assert_eq!(provider.request_count().await, 1);
    }

    #[tokio::test]
    async fn test_failing_backend_only_fails_its_task() {
        let backend = FailingBackend::on(TaskLabel::BackgroundRemoval);
        assert!(backend.produce(TaskLabel::ImageGeneration, "").await.is_ok());
        assert!(backend
            .produce(TaskLabel::BackgroundRemoval, "")
            .await
            .is_err());
    }
}
