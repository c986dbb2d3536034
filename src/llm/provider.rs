//! Classifier provider contract
//!
//! The supervisor sends one system prompt and one user prompt and gets free
//! text back. Anything that can answer that (a hosted chat model, a scripted
//! mock) implements [`LlmProvider`].

use async_trait::async_trait;
use thiserror::Error;

/// One classification call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Reply to a classification call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Reply text; `None` if the model returned an empty message
    pub content: Option<String>,
    /// Model that actually answered
    pub model: String,
}

/// Text completion backend used by the classifying router
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name used in logs (e.g., "openai")
    fn name(&self) -> &str;

    /// Answer a single prompt pair
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// LLM provider errors
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
    /// The response arrived but could not be decoded
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// No HTTP response (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Non-success HTTP status or an unusable body
    #[error("API error: {0}")]
    ApiError(String),
}
