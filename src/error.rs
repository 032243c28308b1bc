//! Error types for u-roster.
//!
//! Only input problems are errors. Solver outcomes (infeasible, timeout,
//! backend failure) are reported as [`SolveStatus`](crate::lp::SolveStatus)
//! values inside a [`ScheduleResult`](crate::scheduler::ScheduleResult).

use thiserror::Error;

use crate::config::ConfigError;
use crate::validation::ValidationError;

/// Result type for u-roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;

/// Errors that abort a rostering run before any solver interaction.
#[derive(Error, Debug)]
pub enum RosterError {
    /// Input instance or parameters failed validation.
    #[error("invalid input ({} problem(s)): {}", .0.len(), summarize(.0))]
    Validation(Vec<ValidationError>),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RosterError {
    /// Validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            RosterError::Validation(errors) => Some(errors),
            RosterError::Config(_) => None,
        }
    }
}

impl From<Vec<ValidationError>> for RosterError {
    fn from(errors: Vec<ValidationError>) -> Self {
        RosterError::Validation(errors)
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
