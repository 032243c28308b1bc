//! `good_lp` adapter using the pure-Rust `microlp` backend.
//!
//! The backend runs simplex with branch-and-bound and enforces the time
//! limit itself. On expiry it returns the best incumbent found so far, or
//! an error when no feasible point was reached; both map to `Timeout`.
//! The solve runs on a scoped worker thread that is always joined, so a
//! backend panic becomes `SolveError` and nothing outlives the call.

use std::thread;
use std::time::{Duration, Instant};

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolutionStatus, SolverModel, Variable, WithTimeLimit,
};
use log::{debug, warn};

use super::model::{LinearExpr, LinearModel, Sense, VarKind};
use super::solver::{MilpSolver, SolveResult, SolveStatus, SolverConfig};

/// Feasibility tolerance for constraints without variables.
const CONSTANT_TOLERANCE: f64 = 1e-9;

/// Message prefix microlp uses when the deadline passes with no incumbent.
const TIME_LIMIT_MESSAGE: &str = "Time limit reached";

/// MILP solver backed by `good_lp` + `microlp`.
///
/// Stateless; every call builds a fresh backend problem, so one instance
/// may serve concurrent runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for MicroLpSolver {
    fn solve(&self, model: &LinearModel, config: &SolverConfig) -> SolveResult {
        if let Err(e) = model.validate() {
            return SolveResult::error(format!("invalid model: {e}"));
        }

        let start = Instant::now();
        let limit = config.time_limit();

        let mut result = run_isolated(|| solve_blocking(model, limit));
        if result.status == SolveStatus::Timeout {
            warn!(
                "microlp exceeded time limit of {} ms (incumbent: {})",
                config.time_limit_ms.unwrap_or_default(),
                result.values.is_some()
            );
        }
        result.solve_time_ms = start.elapsed().as_millis() as u64;
        result
    }
}

/// Runs `solve` on a named scoped thread and joins it; a panic becomes
/// `SolveError`.
fn run_isolated<F>(solve: F) -> SolveResult
where
    F: FnOnce() -> SolveResult + Send,
{
    let joined = thread::scope(|scope| {
        thread::Builder::new()
            .name("u-roster-microlp".into())
            .spawn_scoped(scope, solve)
            .map(|handle| handle.join())
    });
    match joined {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => SolveResult::error("solver worker panicked"),
        Err(e) => SolveResult::error(format!("failed to start solver worker: {e}")),
    }
}

/// Translates and solves on the current thread.
fn solve_blocking(model: &LinearModel, limit: Option<Duration>) -> SolveResult {
    // Constraints without variables are decided here; microlp never sees them.
    if let Some(c) = model
        .constraints()
        .iter()
        .find(|c| c.expr.is_constant() && !c.is_satisfied(&[], CONSTANT_TOLERANCE))
    {
        debug!("constraint '{}' is infeasible without variables", c.name);
        return SolveResult::empty(SolveStatus::Infeasible)
            .with_message(format!("constraint '{}' cannot be satisfied", c.name));
    }

    if model.variable_count() == 0 {
        return SolveResult::with_values(
            SolveStatus::Optimal,
            Vec::new(),
            model.objective_value(&[]),
        );
    }

    match run_microlp(model, limit) {
        Ok((status, values)) => {
            let objective = model.objective_value(&values);
            SolveResult::with_values(status_of(status), values, objective)
        }
        Err(ResolutionError::Infeasible) => SolveResult::empty(SolveStatus::Infeasible),
        Err(ResolutionError::Unbounded) => SolveResult::empty(SolveStatus::Unbounded),
        Err(ResolutionError::Other(msg)) if msg.starts_with(TIME_LIMIT_MESSAGE) => {
            SolveResult::empty(SolveStatus::Timeout).with_message(msg)
        }
        Err(other) => SolveResult::error(format!("microlp failed: {other}")),
    }
}

/// Status of a solution the backend returned with values.
fn status_of(status: SolutionStatus) -> SolveStatus {
    match status {
        SolutionStatus::Optimal => SolveStatus::Optimal,
        SolutionStatus::TimeLimit | SolutionStatus::GapLimit => SolveStatus::Timeout,
    }
}

fn run_microlp(
    model: &LinearModel,
    limit: Option<Duration>,
) -> Result<(SolutionStatus, Vec<f64>), ResolutionError> {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|def| {
            let definition = match def.kind {
                VarKind::Binary => variable().binary(),
                VarKind::Continuous => match def.upper {
                    Some(upper) => variable().min(def.lower).max(upper),
                    None => variable().min(def.lower),
                },
            };
            vars.add(definition.name(def.name.clone()))
        })
        .collect();

    let objective = to_expression(model.objective(), &handles);
    let mut problem = vars.minimise(objective).using(microlp);
    if let Some(limit) = limit {
        problem = problem.with_time_limit(limit.as_secs_f64());
    }

    for c in model.constraints().iter().filter(|c| !c.expr.is_constant()) {
        let lhs = to_expression(&c.expr, &handles);
        let rhs = Expression::from(c.rhs);
        let translated = match c.sense {
            Sense::Le => constraint::leq(lhs, rhs),
            Sense::Ge => constraint::geq(lhs, rhs),
            Sense::Eq => constraint::eq(lhs, rhs),
        };
        problem.add_constraint(translated);
    }

    let solution = problem.solve()?;
    let values = handles.iter().map(|&v| solution.value(v)).collect();
    Ok((solution.status(), values))
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant);
    for &(var, coef) in &expr.terms {
        out += coef * handles[var.index()];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::{LinearExpr, Sense, VarId};

    #[test]
    fn test_picks_cheaper_slack() {
        // min 5·slack  s.t.  x + slack >= 1, x binary
        let mut m = LinearModel::new("t");
        let x = m.add_binary("x");
        let slack = m.add_continuous("slack", 0.0);
        m.add_constraint(
            "cover",
            LinearExpr::new().with_term(x, 1.0).with_term(slack, 1.0),
            Sense::Ge,
            1.0,
        );
        m.set_objective(LinearExpr::new().with_term(slack, 5.0));

        let r = MicroLpSolver::new().solve(&m, &SolverConfig::default());
        assert_eq!(r.status, SolveStatus::Optimal);
        let values = r.values.unwrap();
        assert!(values[x.index()] > 0.5);
        assert!(values[slack.index()].abs() < 1e-6);
        assert!(r.objective_value.unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_binary() {
        // x + y >= 3 with two binaries
        let mut m = LinearModel::new("t");
        let x = m.add_binary("x");
        let y = m.add_binary("y");
        m.add_constraint(
            "cover",
            LinearExpr::new().with_term(x, 1.0).with_term(y, 1.0),
            Sense::Ge,
            3.0,
        );
        let r = MicroLpSolver::new().solve(&m, &SolverConfig::default());
        assert_eq!(r.status, SolveStatus::Infeasible);
        assert!(r.values.is_none());
    }

    #[test]
    fn test_constant_constraint_short_circuit() {
        let mut m = LinearModel::new("t");
        m.add_binary("x");
        m.add_constraint("empty", LinearExpr::new(), Sense::Ge, 2.0);
        let r = MicroLpSolver::new().solve(&m, &SolverConfig::default());
        assert_eq!(r.status, SolveStatus::Infeasible);
        assert!(r.message.unwrap().contains("empty"));
    }

    #[test]
    fn test_empty_model_is_optimal() {
        let mut m = LinearModel::new("t");
        m.add_constraint("trivial", LinearExpr::new(), Sense::Ge, 0.0);
        let r = MicroLpSolver::new().solve(&m, &SolverConfig::default());
        assert_eq!(r.status, SolveStatus::Optimal);
        assert_eq!(r.values, Some(Vec::new()));
        assert_eq!(r.objective_value, Some(0.0));
    }

    #[test]
    fn test_invalid_model_reports_error() {
        let mut m = LinearModel::new("t");
        m.set_objective(LinearExpr::new().with_term(VarId(3), 1.0));
        let r = MicroLpSolver::new().solve(&m, &SolverConfig::default());
        assert_eq!(r.status, SolveStatus::SolveError);
        assert!(r.message.unwrap().contains("invalid model"));
    }

    #[test]
    fn test_unbounded() {
        // min -x, x >= 0 continuous
        let mut m = LinearModel::new("t");
        let x = m.add_continuous("x", 0.0);
        m.add_constraint(
            "lower",
            LinearExpr::new().with_term(x, 1.0),
            Sense::Ge,
            0.0,
        );
        m.set_objective(LinearExpr::new().with_term(x, -1.0));
        let r = MicroLpSolver::new().solve(&m, &SolverConfig::default());
        assert_eq!(r.status, SolveStatus::Unbounded);
    }

    fn knapsack(n: usize) -> LinearModel {
        let mut m = LinearModel::new("knapsack");
        let mut weight = LinearExpr::new();
        let mut objective = LinearExpr::new();
        for i in 0..n {
            let x = m.add_binary(format!("x{i}"));
            weight.add_term(x, 3.0 + (i % 7) as f64);
            objective.add_term(x, -(5.0 + (i % 11) as f64));
        }
        m.add_constraint("capacity", weight, Sense::Le, 2.5 * n as f64);
        m.set_objective(objective);
        m
    }

    #[test]
    fn test_zero_time_limit_times_out_without_incumbent() {
        let m = knapsack(20);
        let config = SolverConfig::default().with_time_limit_ms(0);
        let start = Instant::now();
        let r = MicroLpSolver::new().solve(&m, &config);
        assert_eq!(r.status, SolveStatus::Timeout);
        assert!(r.values.is_none());
        assert!(r.objective_value.is_none());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_generous_time_limit_still_optimal() {
        let m = knapsack(8);
        let config = SolverConfig::default().with_time_limit_ms(60_000);
        let r = MicroLpSolver::new().solve(&m, &config);
        assert_eq!(r.status, SolveStatus::Optimal);
        assert!(m.is_feasible(r.values.as_deref().unwrap(), 1e-6));
    }

    #[test]
    fn test_worker_panic_is_solve_error() {
        let r = run_isolated(|| panic!("backend bug"));
        assert_eq!(r.status, SolveStatus::SolveError);
        assert!(r.message.unwrap().contains("panicked"));
    }

    #[test]
    fn test_limited_solutions_are_not_optimal() {
        assert_eq!(status_of(SolutionStatus::Optimal), SolveStatus::Optimal);
        assert_eq!(status_of(SolutionStatus::TimeLimit), SolveStatus::Timeout);
        assert_eq!(status_of(SolutionStatus::GapLimit), SolveStatus::Timeout);
    }
}
