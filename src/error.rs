//! Error types for the image processing workflow
//!
//! `WorkflowError` covers every way a workflow run can stop early. Messages
//! shown on the console go through `sanitize_error_message` first, since
//! provider errors can echo request headers back.

use crate::state::LogEntry;
use crate::task::TaskLabel;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Main error type for workflow operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Classification failed: {message}")]
    ClassificationFailed { message: String },

    #[error("Step '{task}' failed: {message}")]
    StepFailed { task: TaskLabel, message: String },

    #[error("No step handler for task '{task}'")]
    NoHandler { task: TaskLabel },
}

impl WorkflowError {
    /// Create classification error
    pub fn classification<S: Into<String>>(message: S) -> Self {
        Self::ClassificationFailed {
            message: message.into(),
        }
    }

    /// Create step failure error
    pub fn step_failed<S: Into<String>>(task: TaskLabel, message: S) -> Self {
        Self::StepFailed {
            task,
            message: message.into(),
        }
    }

    /// Console-safe rendering of this error
    pub fn sanitized(&self) -> String {
        sanitize_error_message(&self.to_string())
    }
}

/// A workflow run that was aborted
///
/// Carries the error and the last history entry recorded before the failure.
#[derive(Debug, Error)]
#[error("Workflow {workflow_id} aborted: {source}")]
pub struct WorkflowFailure {
    pub workflow_id: uuid::Uuid,
    #[source]
    pub source: WorkflowError,
    pub last_entry: Option<LogEntry>,
}

fn secret_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(password|token|key|secret)[=:]\s*\S+")
            .unwrap_or_else(|e| panic!("invalid secret pattern: {e}"))
    })
}

fn bearer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)bearer\s+\S+")
            .unwrap_or_else(|e| panic!("invalid bearer pattern: {e}"))
    })
}

fn path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
            .unwrap_or_else(|e| panic!("invalid path pattern: {e}"))
    })
}

/// Redact credentials and truncate long messages before printing them
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = secret_pattern()
        .replace_all(message, "${1}=***")
        .to_string();

    sanitized = bearer_pattern()
        .replace_all(&sanitized, "Bearer ***")
        .to_string();

    sanitized = path_pattern()
        .replace_all(&sanitized, "/***REDACTED***/")
        .to_string();

    // Keep total length <= 500 bytes without splitting a UTF-8 sequence
    if sanitized.len() > 500 {
        let truncate_suffix = "...[truncated]";
        let mut cut = 500 - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized = format!("{}{}", &sanitized[..cut], truncate_suffix);
    }

    sanitized
}

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
