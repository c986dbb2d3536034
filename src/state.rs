//! Workflow state threaded through router and step runner calls
//!
//! `WorkflowState` is updated by replacement: every mutator consumes the
//! value and returns the next one, so a caller holding `&WorkflowState`
//! still sees the previous state if a step fails.

use crate::task::TaskLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who recorded a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRole {
    /// Routing decisions
    Supervisor,
    /// Step runner output
    Agent,
}

/// A single history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub role: LogRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(role: LogRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn supervisor(text: impl Into<String>) -> Self {
        Self::new(LogRole::Supervisor, text)
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(LogRole::Agent, text)
    }
}

/// State of one workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    original_request: String,
    current_task: Option<TaskLabel>,
    result_ref: Option<String>,
    history: Vec<LogEntry>,
}

impl WorkflowState {
    /// Start a workflow for a user request; no task has been routed yet
    pub fn new(original_request: impl Into<String>) -> Self {
        Self {
            original_request: original_request.into(),
            current_task: None,
            result_ref: None,
            history: Vec::new(),
        }
    }

    pub fn original_request(&self) -> &str {
        &self.original_request
    }

    /// Label most recently routed to, `None` before the first decision
    pub fn current_task(&self) -> Option<TaskLabel> {
        self.current_task
    }

    pub fn result_ref(&self) -> Option<&str> {
        self.result_ref.as_deref()
    }

    pub fn history(&self) -> &[LogEntry] {
        &self.history
    }

    pub fn last_entry(&self) -> Option<&LogEntry> {
        self.history.last()
    }

    pub fn is_finished(&self) -> bool {
        self.current_task.is_some_and(|t| t.is_terminal())
    }

    /// Replace the current task label
    pub fn with_current_task(mut self, task: TaskLabel) -> Self {
        self.current_task = Some(task);
        self
    }

    /// Overwrite the artifact reference
    pub fn with_result_ref(mut self, result_ref: impl Into<String>) -> Self {
        self.result_ref = Some(result_ref.into());
        self
    }

    /// Append one history entry
    pub fn record(mut self, entry: LogEntry) -> Self {
        self.history.push(entry);
        self
    }

    /// Resume from an arbitrary point, used when replaying a workflow from the middle
    pub fn resumed_at(original_request: impl Into<String>, current_task: Option<TaskLabel>) -> Self {
        Self {
            current_task,
            ..Self::new(original_request)
        }
    }
}
