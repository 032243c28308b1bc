//! Build → solve → interpret pipeline.
//!
//! # Algorithm
//!
//! 1. Validate parameters and instance (all problems reported together).
//! 2. Build the MILP over eligible pairs only.
//! 3. Submit to the solver with the optional time limit.
//! 4. Decode values into a plan, or diagnose infeasibility.
//!
//! Each call owns its input snapshot and model; nothing is shared
//! between runs, so independent runs may execute on separate threads.

use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::RunState;
use crate::builder::RosterModelBuilder;
use crate::config::RosterConfig;
use crate::error::{Result, RosterError};
use crate::interpret::interpret;
use crate::lp::{MicroLpSolver, MilpSolver, SolveStatus, SolverConfig};
use crate::models::{
    Assignment, AssignmentMatrix, AssignmentPlan, Parameters, RosterInstance, ShiftCoverage,
};
use crate::validation::{validate_instance, validate_parameters};

/// Outcome of one rostering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Normalized solver status.
    pub status: SolveStatus,
    /// Terminal lifecycle state.
    pub state: RunState,
    /// Plan, when the solver produced one (optimal or provisional).
    pub plan: Option<AssignmentPlan>,
    /// Per-shift coverage bounds (infeasible runs only).
    pub diagnostics: Vec<ShiftCoverage>,
    /// Solver or decoding diagnostic.
    pub message: Option<String>,
    /// Nurse IDs in input order (matrix rows).
    pub nurse_ids: Vec<String>,
    /// Shift IDs in input order (matrix columns).
    pub shift_ids: Vec<String>,
    /// Wall-clock solve time (ms).
    pub solve_time_ms: u64,
}

impl ScheduleResult {
    /// Fixed status label (`OPTIMAL`, `INFEASIBLE`, ...).
    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    /// Whether an optimal plan was found.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal && self.plan.is_some()
    }

    /// Whether any plan (optimal or provisional) is available.
    pub fn has_plan(&self) -> bool {
        self.plan.is_some()
    }

    /// Assignments of the plan (empty without a plan).
    pub fn assignments(&self) -> &[Assignment] {
        self.plan
            .as_ref()
            .map(|p| p.assignments.as_slice())
            .unwrap_or(&[])
    }

    /// Objective value of the plan.
    pub fn objective_value(&self) -> Option<f64> {
        self.plan.as_ref().map(|p| p.objective_value)
    }

    /// Nurse × shift matrix over all input IDs.
    pub fn assignment_matrix(&self) -> Option<AssignmentMatrix> {
        self.plan
            .as_ref()
            .map(|p| p.matrix(self.nurse_ids.iter().cloned(), self.shift_ids.iter().cloned()))
    }

    /// Shifts whose demand exceeds their eligible headcount.
    pub fn short_shifts(&self) -> impl Iterator<Item = &ShiftCoverage> {
        self.diagnostics.iter().filter(|d| d.is_short())
    }
}

/// Generates a roster with the default solver and no time limit.
///
/// # Example
///
/// ```
/// use u_roster::models::{Nurse, Parameters, RosterInstance, Shift, SkillLevel};
/// use u_roster::scheduler::generate_schedule;
///
/// let instance = RosterInstance::new()
///     .with_nurse(Nurse::general("N1", 40.0))
///     .with_nurse(Nurse::icu("N2", 40.0))
///     .with_shift(Shift::new("S1", 8.0, 1, SkillLevel::Icu))
///     .with_full_availability();
///
/// let result = generate_schedule(instance, &Parameters::default()).unwrap();
/// assert_eq!(result.status_label(), "OPTIMAL");
/// assert!(result.plan.unwrap().is_assigned("N2", "S1"));
/// ```
pub fn generate_schedule(instance: RosterInstance, params: &Parameters) -> Result<ScheduleResult> {
    generate_schedule_with(
        instance,
        params,
        &MicroLpSolver::new(),
        &SolverConfig::default(),
    )
}

/// Generates a roster using parameters and limits from a [`RosterConfig`].
pub fn generate_schedule_from_config(
    instance: RosterInstance,
    config: &RosterConfig,
) -> Result<ScheduleResult> {
    generate_schedule_with(
        instance,
        &config.parameters,
        &MicroLpSolver::new(),
        &config.solver,
    )
}

/// Loads a TOML configuration file and generates a roster with it.
///
/// Unreadable or malformed files are reported as [`RosterError::Config`].
pub fn generate_schedule_from_path(
    instance: RosterInstance,
    path: impl AsRef<Path>,
) -> Result<ScheduleResult> {
    let config = RosterConfig::load(path)?;
    generate_schedule_from_config(instance, &config)
}

/// Generates a roster with an explicit solver and configuration.
///
/// Fails only on invalid input. Every solver outcome, including
/// infeasibility and backend errors, is returned as a [`ScheduleResult`].
pub fn generate_schedule_with<S>(
    instance: RosterInstance,
    params: &Parameters,
    solver: &S,
    config: &SolverConfig,
) -> Result<ScheduleResult>
where
    S: MilpSolver + ?Sized,
{
    let mut state = RunState::NotBuilt;

    let param_errors = validate_parameters(params).err().unwrap_or_default();
    let validated = match validate_instance(instance) {
        Ok(v) if param_errors.is_empty() => v,
        Ok(_) => return Err(RosterError::Validation(param_errors)),
        Err(mut errors) => {
            errors.extend(param_errors);
            return Err(RosterError::Validation(errors));
        }
    };

    let built = RosterModelBuilder::new(&validated, params).build();
    advance(&mut state, RunState::Built);

    advance(&mut state, RunState::Solving);
    let result = solver.solve(&built.model, config);
    let interpretation = interpret(&result, &built, &validated, params.skill_compatibility);

    // Optimal status without a decodable plan is a backend fault
    let status = if result.status == SolveStatus::Optimal && interpretation.plan.is_none() {
        SolveStatus::SolveError
    } else {
        result.status
    };
    advance(&mut state, RunState::from_status(status));

    match status {
        SolveStatus::Optimal => info!(
            "roster solved: objective {:.3} in {} ms",
            interpretation
                .plan
                .as_ref()
                .map_or(0.0, |p| p.objective_value),
            result.solve_time_ms
        ),
        SolveStatus::Infeasible => warn!(
            "roster infeasible; {} shift(s) lack eligible nurses",
            interpretation
                .diagnostics
                .iter()
                .filter(|d| d.is_short())
                .count()
        ),
        SolveStatus::Timeout => warn!(
            "roster solve timed out after {} ms (provisional plan: {})",
            result.solve_time_ms,
            interpretation.plan.is_some()
        ),
        SolveStatus::Unbounded | SolveStatus::SolveError => warn!(
            "roster solve failed: {}",
            interpretation.message.as_deref().unwrap_or("unknown error")
        ),
    }

    Ok(ScheduleResult {
        status,
        state,
        plan: interpretation.plan,
        diagnostics: interpretation.diagnostics,
        message: interpretation.message,
        nurse_ids: validated.nurses().iter().map(|n| n.id.clone()).collect(),
        shift_ids: validated.shifts().iter().map(|s| s.id.clone()).collect(),
        solve_time_ms: result.solve_time_ms,
    })
}

fn advance(state: &mut RunState, next: RunState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal run transition {state:?} -> {next:?}"
    );
    debug!("run state {state:?} -> {next:?}");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::lp::{LinearModel, SolveResult};
    use crate::models::{Nurse, Shift, SkillLevel};
    use crate::validation::ValidationErrorKind;

    struct FixedSolver(SolveResult);

    impl MilpSolver for FixedSolver {
        fn solve(&self, _model: &LinearModel, _config: &SolverConfig) -> SolveResult {
            self.0.clone()
        }
    }

    fn instance() -> RosterInstance {
        RosterInstance::new()
            .with_nurse(Nurse::general("N1", 40.0))
            .with_nurse(Nurse::icu("N2", 40.0))
            .with_shift(Shift::new("S1", 8.0, 1, SkillLevel::Icu))
            .with_full_availability()
    }

    #[test]
    fn test_optimal_run() {
        let r = generate_schedule(instance(), &Parameters::default()).unwrap();
        assert_eq!(r.state, RunState::SolvedOptimal);
        assert!(r.is_optimal());
        assert_eq!(r.assignments(), &[Assignment::new("N2", "S1")]);
        assert_eq!(r.nurse_ids, vec!["N1", "N2"]);
        let m = r.assignment_matrix().unwrap();
        assert_eq!(m.cells, vec![vec![false], vec![true]]);
    }

    #[test]
    fn test_validation_collects_parameter_and_instance_errors() {
        let bad = instance().with_available("N9", "S1");
        let params = Parameters::default().with_understaff_weight(-1.0);
        let err = generate_schedule(bad, &params).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownNurse));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidWeight));
    }

    #[test]
    fn test_parameter_errors_alone() {
        let params = Parameters::default().with_overtime_weight(f64::NAN);
        let err = generate_schedule(instance(), &params).unwrap_err();
        assert_eq!(err.validation_errors().unwrap().len(), 1);
    }

    #[test]
    fn test_solve_error_is_a_result() {
        let solver = FixedSolver(SolveResult::error("license expired"));
        let r = generate_schedule_with(
            instance(),
            &Parameters::default(),
            &solver,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(r.status, SolveStatus::SolveError);
        assert_eq!(r.state, RunState::SolveError);
        assert!(!r.has_plan());
        assert_eq!(r.message.as_deref(), Some("license expired"));
        assert!(r.assignment_matrix().is_none());
    }

    #[test]
    fn test_optimal_without_values_becomes_error() {
        let solver = FixedSolver(SolveResult::empty(SolveStatus::Optimal));
        let r = generate_schedule_with(
            instance(),
            &Parameters::default(),
            &solver,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(r.status, SolveStatus::SolveError);
        assert_eq!(r.state, RunState::SolveError);
    }

    #[test]
    fn test_unbounded_maps_to_error_state() {
        let solver = FixedSolver(SolveResult::empty(SolveStatus::Unbounded));
        let r = generate_schedule_with(
            instance(),
            &Parameters::default(),
            &solver,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(r.status_label(), "UNBOUNDED");
        assert_eq!(r.state, RunState::SolveError);
        assert!(r.message.is_some());
    }

    #[test]
    fn test_timeout_with_incumbent() {
        // vars: x[N2,S1], ot[N1], ot[N2]
        let solver = FixedSolver(SolveResult::with_values(
            SolveStatus::Timeout,
            vec![1.0, 0.0, 0.0],
            0.0,
        ));
        let r = generate_schedule_with(
            instance(),
            &Parameters::default(),
            &solver,
            &SolverConfig::default().with_time_limit_ms(1),
        )
        .unwrap();
        assert_eq!(r.state, RunState::SolvedTimeout);
        assert!(r.has_plan());
        assert!(!r.is_optimal());
        assert!(!r.plan.unwrap().optimal);
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let path = std::env::temp_dir().join("u-roster-no-such-config.toml");
        let err = generate_schedule_from_path(instance(), &path).unwrap_err();
        assert!(matches!(err, RosterError::Config(ConfigError::Io { .. })));
        assert!(err.validation_errors().is_none());
    }

    #[test]
    fn test_config_file_drives_run() {
        let path =
            std::env::temp_dir().join(format!("u-roster-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[solver]\ntime_limit_ms = 60000\n").unwrap();
        let r = generate_schedule_from_path(instance(), &path);
        std::fs::remove_file(&path).unwrap();
        assert!(r.unwrap().is_optimal());

        std::fs::write(&path, "[solver\ntime_limit_ms = 1\n").unwrap();
        let err = generate_schedule_from_path(instance(), &path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, RosterError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn test_result_serializes() {
        let r = generate_schedule(instance(), &Parameters::default()).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "OPTIMAL");
        assert_eq!(json["state"], "SOLVED_OPTIMAL");
        assert_eq!(json["plan"]["assignments"][0]["nurse_id"], "N2");
    }
}
