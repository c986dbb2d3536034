//! Task backends
//!
//! A backend turns `(task, request)` into an artifact reference. Real image
//! services would sit behind this trait; [`MockBackend`] stands in for them.

use crate::error::WorkflowError;
use crate::task::TaskLabel;
use async_trait::async_trait;

/// Backend that produces the artifact for a single task
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &str;

    /// Produce the artifact for `task` and return its reference
    ///
    /// Only called for step labels, never for `End`.
    async fn produce(&self, task: TaskLabel, request: &str) -> Result<String, WorkflowError>;
}

/// Fixed artifact name for each step label
pub fn placeholder_artifact(task: TaskLabel) -> Option<&'static str> {
    match task {
        TaskLabel::ImageGeneration => Some("mock_generated_image.jpg"),
        TaskLabel::TextOverlay => Some("mock_text_overlay_image.jpg"),
        TaskLabel::BackgroundRemoval => Some("mock_bg_removed_image.jpg"),
        TaskLabel::End => None,
    }
}

/// Backend that ignores the request and returns placeholder names
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

#[async_trait]
impl TaskBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn produce(&self, task: TaskLabel, _request: &str) -> Result<String, WorkflowError> {
        placeholder_artifact(task)
            .map(str::to_string)
            .ok_or(WorkflowError::NoHandler { task })
    }
}
