//! Task labels for the image processing workflow
//!
//! A workflow moves through a fixed universe of four labels. Three of them
//! name an agent step; `End` is terminal and has no handler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a workflow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskLabel {
    ImageGeneration,
    TextOverlay,
    BackgroundRemoval,
    End,
}

impl TaskLabel {
    /// Every label, in classifier priority order with the terminal label last
    pub const ALL: [TaskLabel; 4] = [
        TaskLabel::ImageGeneration,
        TaskLabel::TextOverlay,
        TaskLabel::BackgroundRemoval,
        TaskLabel::End,
    ];

    /// Labels that have a step handler
    pub const STEPS: [TaskLabel; 3] = [
        TaskLabel::ImageGeneration,
        TaskLabel::TextOverlay,
        TaskLabel::BackgroundRemoval,
    ];

    /// Wire name of the label (`image_generation`, ..., `end`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskLabel::ImageGeneration => "image_generation",
            TaskLabel::TextOverlay => "text_overlay",
            TaskLabel::BackgroundRemoval => "background_removal",
            TaskLabel::End => "end",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskLabel::End)
    }

    /// Human-readable agent name used in history entries
    pub fn agent_name(&self) -> &'static str {
        match self {
            TaskLabel::ImageGeneration => "Image Generation Agent",
            TaskLabel::TextOverlay => "Text Overlay Agent",
            TaskLabel::BackgroundRemoval => "Background Removal Agent",
            TaskLabel::End => "Supervisor",
        }
    }

    /// Name printed in routing decisions; the terminal label is shouted
    pub fn routing_name(&self) -> &'static str {
        match self {
            TaskLabel::End => "END",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for TaskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label text that is not one of the four known labels
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Unknown task label: '{0}'")]
pub struct UnknownTaskLabel(pub String);

impl FromStr for TaskLabel {
    type Err = UnknownTaskLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image_generation" => Ok(TaskLabel::ImageGeneration),
            "text_overlay" => Ok(TaskLabel::TextOverlay),
            "background_removal" => Ok(TaskLabel::BackgroundRemoval),
            "end" => Ok(TaskLabel::End),
            _ => Err(UnknownTaskLabel(s.to_string())),
        }
    }
}

/// Render an optional current task the way prompts and tables spell it
pub fn current_task_name(task: Option<TaskLabel>) -> &'static str {
    task.map(|t| t.as_str()).unwrap_or("none")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trips_through_wire_name() {
        for label in TaskLabel::ALL {
            assert_eq!(label.as_str().parse::<TaskLabel>().unwrap(), label);
        }
    }

    #[test]
    fn test_label_parsing_ignores_case_and_whitespace() {
        assert_eq!(
            " Text_Overlay ".parse::<TaskLabel>().unwrap(),
            TaskLabel::TextOverlay
        );
        assert_eq!("END".parse::<TaskLabel>().unwrap(), TaskLabel::End);
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = "upscale".parse::<TaskLabel>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown task label: 'upscale'");
        assert!("none".parse::<TaskLabel>().is_err());
    }

    #[test]
    fn test_only_end_is_terminal() {
        assert!(TaskLabel::End.is_terminal());
        assert!(TaskLabel::STEPS.iter().all(|t| !t.is_terminal()));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&TaskLabel::BackgroundRemoval).unwrap();
        assert_eq!(json, "\"background_removal\"");
    }

    #[test]
    fn test_current_task_name() {
        assert_eq!(current_task_name(None), "none");
        assert_eq!(
            current_task_name(Some(TaskLabel::ImageGeneration)),
            "image_generation"
        );
        assert_eq!(TaskLabel::End.routing_name(), "END");
    }
}
