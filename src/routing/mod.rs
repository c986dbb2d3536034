//! Routing infrastructure
//!
//! The supervisor decides which task runs next. Two strategies implement the
//! same [`Router`] trait:
//!
//! ## Deterministic (table.rs)
//!
//! A finite-state-machine table keyed by the current task. Validated when it
//! is built, so a running workflow can only miss the table through a bug,
//! and a miss routes to `end`.
//!
//! ## Classifier (classifier.rs)
//!
//! One LLM call per decision. The free-text reply is reduced to a label by
//! [`parse_task_label`].

pub mod classifier;
pub mod router;
pub mod table;

pub use classifier::{parse_task_label, ClassifyingRouter};
pub use router::{record_decision, Router};
pub use table::{DeterministicRouter, RoutingTable, RoutingTableError};
