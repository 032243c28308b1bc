//! Run lifecycle.
//!
//! ```text
//! NotBuilt → Built → Solving → { SolvedOptimal | SolvedInfeasible | SolvedTimeout | SolveError }
//! ```
//!
//! Terminal states never transition again.

use serde::{Deserialize, Serialize};

use crate::lp::SolveStatus;

/// Lifecycle state of one rostering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// Input received; no model yet.
    NotBuilt,
    /// Model built, not yet submitted.
    Built,
    /// Model submitted to the solver.
    Solving,
    /// Optimal plan available.
    SolvedOptimal,
    /// No feasible plan exists.
    SolvedInfeasible,
    /// Time limit reached.
    SolvedTimeout,
    /// Backend failure or unusable solver output.
    SolveError,
}

impl RunState {
    /// Whether the run has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::SolvedOptimal
                | RunState::SolvedInfeasible
                | RunState::SolvedTimeout
                | RunState::SolveError
        )
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        match self {
            RunState::NotBuilt => next == RunState::Built,
            RunState::Built => next == RunState::Solving,
            RunState::Solving => next.is_terminal(),
            _ => false,
        }
    }

    /// Terminal state for a solver status.
    ///
    /// `Unbounded` has no dedicated state: a roster model is bounded by
    /// construction, so an unbounded report is treated as a solver error.
    pub fn from_status(status: SolveStatus) -> Self {
        match status {
            SolveStatus::Optimal => RunState::SolvedOptimal,
            SolveStatus::Infeasible => RunState::SolvedInfeasible,
            SolveStatus::Timeout => RunState::SolvedTimeout,
            SolveStatus::Unbounded | SolveStatus::SolveError => RunState::SolveError,
        }
    }
}
