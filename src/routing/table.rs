//! Deterministic routing table
//!
//! The supervisor's round robin as an explicit state machine:
//!
//! ```text
//! none → image_generation → text_overlay → background_removal → end
//! ```
//!
//! Tables can be overridden from configuration, so they are validated when
//! built: every non-terminal state needs an entry, `end` stays terminal and
//! the walk from `none` must reach `end` without a cycle.

use crate::error::WorkflowError;
use crate::routing::router::{record_decision, Router};
use crate::state::WorkflowState;
use crate::task::{current_task_name, TaskLabel};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Routing table validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingTableError {
    #[error("unknown label '{0}'")]
    UnknownLabel(String),
    #[error("no transition for '{0}'")]
    MissingEntry(String),
    #[error("'end' must route to 'end', not '{0}'")]
    NonTerminalEnd(TaskLabel),
    #[error("'none' cannot be a routing target")]
    NoneAsTarget,
    #[error("cycle detected: {0}")]
    Cycle(String),
}

/// Transition map from current task (`None` = fresh workflow) to next task
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingTable {
    transitions: BTreeMap<Option<TaskLabel>, TaskLabel>,
}

impl Default for RoutingTable {
    fn default() -> Self {
        let transitions = BTreeMap::from([
            (None, TaskLabel::ImageGeneration),
            (Some(TaskLabel::ImageGeneration), TaskLabel::TextOverlay),
            (Some(TaskLabel::TextOverlay), TaskLabel::BackgroundRemoval),
            (Some(TaskLabel::BackgroundRemoval), TaskLabel::End),
            (Some(TaskLabel::End), TaskLabel::End),
        ]);
        Self { transitions }
    }
}

impl RoutingTable {
    /// Build a table from `current = "next"` string pairs and validate it
    ///
    /// The `end → end` entry is implied when absent.
    pub fn from_entries(entries: &BTreeMap<String, String>) -> Result<Self, RoutingTableError> {
        let mut transitions = BTreeMap::new();

        for (from, to) in entries {
            let from_label = parse_state(from)?;
            if to.trim().eq_ignore_ascii_case("none") {
                return Err(RoutingTableError::NoneAsTarget);
            }
            let to_label: TaskLabel = to
                .parse()
                .map_err(|_| RoutingTableError::UnknownLabel(to.clone()))?;
            transitions.insert(from_label, to_label);
        }

        transitions
            .entry(Some(TaskLabel::End))
            .or_insert(TaskLabel::End);

        let table = Self { transitions };
        table.validate()?;
        Ok(table)
    }

    /// Check the table against the full label set
    pub fn validate(&self) -> Result<(), RoutingTableError> {
        let states =
            std::iter::once(None).chain(TaskLabel::STEPS.iter().copied().map(Some));
        for state in states {
            if !self.transitions.contains_key(&state) {
                return Err(RoutingTableError::MissingEntry(
                    current_task_name(state).to_string(),
                ));
            }
        }

        match self.transitions.get(&Some(TaskLabel::End)) {
            Some(TaskLabel::End) | None => {}
            Some(other) => return Err(RoutingTableError::NonTerminalEnd(*other)),
        }

        let mut visited = BTreeSet::new();
        let mut path = vec!["none"];
        let mut current = None;
        while current != Some(TaskLabel::End) {
            if !visited.insert(current) {
                return Err(RoutingTableError::Cycle(path.join(" → ")));
            }
            let next = self.next(current);
            path.push(next.as_str());
            current = Some(next);
        }

        Ok(())
    }

    /// Next label for the given current task; a table miss routes to END
    pub fn next(&self, current: Option<TaskLabel>) -> TaskLabel {
        match self.transitions.get(&current) {
            Some(next) => *next,
            None => {
                warn!(
                    current_task = current_task_name(current),
                    "No routing table entry, terminating workflow"
                );
                TaskLabel::End
            }
        }
    }

    /// Render the table as `current = "next"` pairs
    pub fn to_entries(&self) -> BTreeMap<String, String> {
        self.transitions
            .iter()
            .map(|(from, to)| (current_task_name(*from).to_string(), to.as_str().to_string()))
            .collect()
    }
}

fn parse_state(name: &str) -> Result<Option<TaskLabel>, RoutingTableError> {
    if name.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    name.parse()
        .map(Some)
        .map_err(|_| RoutingTableError::UnknownLabel(name.to_string()))
}

/// Router that follows a fixed routing table, ignoring request content
#[derive(Debug, Clone, Default)]
pub struct DeterministicRouter {
    table: RoutingTable,
}

impl DeterministicRouter {
    pub fn new(table: RoutingTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }
}

#[async_trait::async_trait]
impl Router for DeterministicRouter {
    fn name(&self) -> &str {
        "deterministic"
    }

    async fn route(
        &self,
        state: &WorkflowState,
    ) -> Result<(TaskLabel, WorkflowState), WorkflowError> {
        let next = self.table.next(state.current_task());
        debug!(
            current_task = current_task_name(state.current_task()),
            next = %next,
            "Deterministic routing decision"
        );
        Ok((next, record_decision(state, next)))
    }
}
