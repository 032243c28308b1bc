//! MILP solver interface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::model::LinearModel;

/// Normalized outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Proven optimal solution found.
    Optimal,
    /// No feasible solution exists.
    Infeasible,
    /// Objective can decrease without bound.
    Unbounded,
    /// Solver exceeded its time limit.
    Timeout,
    /// Backend failed (crash, resource exhaustion, invalid model).
    SolveError,
}

impl SolveStatus {
    /// Fixed upper-case label.
    pub fn label(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unbounded => "UNBOUNDED",
            SolveStatus::Timeout => "TIMEOUT",
            SolveStatus::SolveError => "SOLVE_ERROR",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw result of a solve, indexed by [`VarId`](super::VarId).
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    /// Solver status.
    pub status: SolveStatus,
    /// Variable values (present for optimal results and timed-out incumbents).
    pub values: Option<Vec<f64>>,
    /// Objective value of `values`.
    pub objective_value: Option<f64>,
    /// Backend diagnostic.
    pub message: Option<String>,
    /// Wall-clock solve time in milliseconds.
    pub solve_time_ms: u64,
}

impl SolveResult {
    /// Creates a result with no values.
    pub fn empty(status: SolveStatus) -> Self {
        Self {
            status,
            values: None,
            objective_value: None,
            message: None,
            solve_time_ms: 0,
        }
    }

    /// Creates a result carrying variable values.
    pub fn with_values(status: SolveStatus, values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            status,
            values: Some(values),
            objective_value: Some(objective_value),
            message: None,
            solve_time_ms: 0,
        }
    }

    /// Creates a `SolveError` result with a diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::empty(SolveStatus::SolveError).with_message(message)
    }

    /// Attaches a diagnostic message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether variable values are available.
    pub fn is_solution_found(&self) -> bool {
        self.values.is_some()
    }
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use u_roster::lp::SolverConfig;
///
/// let config = SolverConfig::default().with_time_limit_ms(5_000);
/// assert_eq!(config.time_limit_ms, Some(5_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds (`None` = wait for the backend).
    pub time_limit_ms: Option<u64>,
}

impl SolverConfig {
    /// Sets the time limit.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Time limit as a [`Duration`].
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

/// Trait for MILP solver implementations.
///
/// Implementors translate a [`LinearModel`] to a backend, run it, and
/// normalize the outcome. Implementations never panic on backend
/// failure; they report [`SolveStatus::SolveError`] instead.
pub trait MilpSolver {
    /// Solves the model (minimization) and returns a normalized result.
    fn solve(&self, model: &LinearModel, config: &SolverConfig) -> SolveResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(SolveStatus::Optimal.to_string(), "OPTIMAL");
        assert_eq!(SolveStatus::SolveError.label(), "SOLVE_ERROR");
        assert_eq!(
            serde_json::to_string(&SolveStatus::Timeout).unwrap(),
            "\"TIMEOUT\""
        );
    }

    #[test]
    fn test_result_constructors() {
        let r = SolveResult::with_values(SolveStatus::Optimal, vec![1.0, 0.0], 3.0);
        assert!(r.is_solution_found());
        assert_eq!(r.objective_value, Some(3.0));

        let e = SolveResult::error("boom");
        assert_eq!(e.status, SolveStatus::SolveError);
        assert!(!e.is_solution_found());
        assert_eq!(e.message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_config() {
        assert_eq!(SolverConfig::default().time_limit(), None);
        let c = SolverConfig::default().with_time_limit_ms(250);
        assert_eq!(c.time_limit(), Some(Duration::from_millis(250)));
    }
}
