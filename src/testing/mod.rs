//! Testing utilities and mock implementations
//!
//! Mocks for exercising the workflow without a live LLM provider.

pub mod mocks;

pub use mocks::*;
