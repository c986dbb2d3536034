//! Image processing agents
//!
//! The step runner executes one task: it asks a [`TaskBackend`] for an
//! artifact, stores the reference and records what the agent did. The
//! shipped backend is a mock that returns fixed placeholder file names.

pub mod backend;
pub mod runner;

pub use backend::{placeholder_artifact, MockBackend, TaskBackend};
pub use runner::StepRunner;
