//! Observability - structured logging
//!
//! Tracing subscriber setup driven by environment variables, plus span
//! macros for workflow runs and agent steps.

pub mod logging;

pub use logging::{init_logging, init_logging_with_verbosity, LogFormat};

// Span macros for structured logging
pub use logging::{step_span, workflow_span};
