//! Image Workflow - supervisor-routed image processing
//!
//! A supervisor repeatedly decides which image task should run next for a
//! user request, a worker agent runs that step, and the loop ends when the
//! supervisor routes to END.
//!
//! # Overview
//!
//! - Task labels and the shared workflow state
//! - Two supervisor strategies: a fixed routing table and an LLM classifier
//! - Agent steps backed by a pluggable [`agents::TaskBackend`]
//! - The orchestrator loop with an iteration cap
//!
//! # Quick Start
//!
//! ```rust
//! use image_workflow::agents::StepRunner;
//! use image_workflow::routing::DeterministicRouter;
//! use image_workflow::workflow::Workflow;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let workflow = Workflow::new(
//!     Arc::new(DeterministicRouter::default()),
//!     StepRunner::default(),
//! );
//! let outcome = workflow.execute("Create a sunset banner").await.unwrap();
//! assert_eq!(outcome.final_artifact(), Some("mock_bg_removed_image.jpg"));
//! # }
//! ```

pub mod agents;
pub mod config;
pub mod error;
pub mod llm;
pub mod observability;
pub mod routing;
pub mod state;
pub mod task;
pub mod testing;
pub mod workflow;

pub use config::WorkflowConfig;
pub use error::{WorkflowError, WorkflowFailure, WorkflowResult};
pub use state::{LogEntry, LogRole, WorkflowState};
pub use task::TaskLabel;
pub use workflow::{Workflow, WorkflowOutcome};
