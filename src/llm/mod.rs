//! LLM provider abstraction layer
//!
//! The classifying supervisor talks to an LLM through the [`LlmProvider`]
//! trait, so tests can swap in a scripted provider.

pub mod provider;
pub mod providers;

pub use provider::*;
pub use providers::*;
