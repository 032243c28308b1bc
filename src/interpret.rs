//! Solution decoding and infeasibility diagnosis.
//!
//! Maps raw solver values back to nurses and shifts.
//!
//! # Rounding
//! Binary values are thresholded at 0.5 to absorb floating-point noise;
//! continuous values are clamped to `>= 0` before reporting.

use std::collections::BTreeMap;

use log::warn;

use crate::builder::{is_eligible, BuiltModel};
use crate::lp::{SolveResult, SolveStatus};
use crate::models::{Assignment, AssignmentPlan, ShiftCoverage, SkillCompatibility};
use crate::validation::ValidatedInstance;

/// Threshold above which a binary value counts as 1.
pub const BINARY_THRESHOLD: f64 = 0.5;

/// Domain-level reading of a [`SolveResult`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    /// Decoded plan, if the solver produced usable values.
    pub plan: Option<AssignmentPlan>,
    /// Per-shift coverage bounds (filled for infeasible results).
    pub diagnostics: Vec<ShiftCoverage>,
    /// Diagnostic message for the caller.
    pub message: Option<String>,
}

/// Interprets a solver result against the model that produced it.
///
/// - `Optimal`: plan decoded from the values.
/// - `Infeasible`: no plan; per-shift coverage diagnostics.
/// - `Timeout`: provisional (non-optimal) plan if an incumbent exists.
/// - `Unbounded` / `SolveError`: no plan; backend message propagated.
pub fn interpret(
    result: &SolveResult,
    built: &BuiltModel,
    instance: &ValidatedInstance,
    rule: SkillCompatibility,
) -> Interpretation {
    match result.status {
        SolveStatus::Optimal => match decode_values(result, built, instance, true) {
            Ok(plan) => Interpretation {
                plan: Some(plan),
                message: result.message.clone(),
                ..Interpretation::default()
            },
            Err(message) => Interpretation {
                message: Some(message),
                ..Interpretation::default()
            },
        },
        SolveStatus::Infeasible => {
            let diagnostics = diagnose_infeasibility(instance, rule);
            for d in diagnostics.iter().filter(|d| d.is_short()) {
                warn!(
                    "shift '{}' needs {} nurses but only {} are eligible",
                    d.shift_id, d.demand, d.max_coverage
                );
            }
            Interpretation {
                plan: None,
                diagnostics,
                message: result.message.clone(),
            }
        }
        SolveStatus::Timeout => {
            let plan = if result.is_solution_found() {
                decode_values(result, built, instance, false).ok()
            } else {
                None
            };
            Interpretation {
                plan,
                diagnostics: Vec::new(),
                message: result.message.clone(),
            }
        }
        SolveStatus::Unbounded => Interpretation {
            message: Some(
                result
                    .message
                    .clone()
                    .unwrap_or_else(|| "model is unbounded".to_string()),
            ),
            ..Interpretation::default()
        },
        SolveStatus::SolveError => Interpretation {
            message: Some(
                result
                    .message
                    .clone()
                    .unwrap_or_else(|| "solver failed without a diagnostic".to_string()),
            ),
            ..Interpretation::default()
        },
    }
}

fn decode_values(
    result: &SolveResult,
    built: &BuiltModel,
    instance: &ValidatedInstance,
    optimal: bool,
) -> Result<AssignmentPlan, String> {
    let values = result
        .values
        .as_deref()
        .ok_or_else(|| format!("solver reported {} without values", result.status))?;
    if values.len() != built.model.variable_count() {
        return Err(format!(
            "solver returned {} values for {} variables",
            values.len(),
            built.model.variable_count()
        ));
    }
    let objective = result
        .objective_value
        .unwrap_or_else(|| built.model.objective_value(values));
    Ok(decode_plan(values, objective, built, instance, optimal))
}

/// Decodes a full value vector into an [`AssignmentPlan`].
///
/// `values` must be indexed by the model's variable handles.
pub fn decode_plan(
    values: &[f64],
    objective_value: f64,
    built: &BuiltModel,
    instance: &ValidatedInstance,
    optimal: bool,
) -> AssignmentPlan {
    let nurses = instance.nurses();
    let shifts = instance.shifts();
    let value = |var: crate::lp::VarId| values.get(var.index()).copied().unwrap_or(0.0);

    let assignments = built
        .index
        .assignments()
        .iter()
        .filter(|a| value(a.var) > BINARY_THRESHOLD)
        .map(|a| Assignment::new(nurses[a.nurse].id.as_str(), shifts[a.shift].id.as_str()))
        .collect();

    let overtime_by_nurse: BTreeMap<String, f64> = nurses
        .iter()
        .enumerate()
        .map(|(n, nurse)| {
            let hours = built
                .index
                .overtime_vars()
                .map_or(0.0, |ot| value(ot[n]).max(0.0));
            (nurse.id.clone(), hours)
        })
        .collect();

    let unmet_by_shift = built.index.unmet_vars().map(|unmet| {
        shifts
            .iter()
            .zip(unmet)
            .map(|(shift, &var)| (shift.id.clone(), value(var).max(0.0)))
            .collect::<BTreeMap<_, _>>()
    });

    AssignmentPlan {
        assignments,
        overtime_by_nurse,
        unmet_by_shift,
        objective_value,
        optimal,
    }
}

/// Explains infeasibility by comparing each shift's demand to the number
/// of eligible nurses, ignoring hour caps.
///
/// A heuristic, not a certificate: a model can be infeasible even when
/// no shift is short (e.g. hour caps without overtime).
pub fn diagnose_infeasibility(
    instance: &ValidatedInstance,
    rule: SkillCompatibility,
) -> Vec<ShiftCoverage> {
    let nurse_count = instance.nurses().len();
    instance
        .shifts()
        .iter()
        .enumerate()
        .map(|(s, shift)| {
            let eligible = (0..nurse_count)
                .filter(|&n| is_eligible(instance, rule, n, s))
                .count();
            ShiftCoverage {
                shift_id: shift.id.clone(),
                demand: shift.demand,
                max_coverage: i32::try_from(eligible).unwrap_or(i32::MAX),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RosterModelBuilder;
    use crate::models::{Nurse, Parameters, RosterInstance, Shift, SkillLevel};
    use crate::validation::validate_instance;

    fn setup(params: &Parameters) -> (ValidatedInstance, BuiltModel) {
        let instance = RosterInstance::new()
            .with_nurse(Nurse::general("N1", 40.0))
            .with_nurse(Nurse::icu("N2", 40.0))
            .with_shift(Shift::new("S1", 8.0, 2, SkillLevel::Icu))
            .with_shift(Shift::new("S2", 8.0, 1, SkillLevel::General))
            .with_full_availability();
        let v = validate_instance(instance).unwrap();
        let built = RosterModelBuilder::new(&v, params).build();
        (v, built)
    }

    #[test]
    fn test_decode_thresholds_and_clamps() {
        let params = Parameters::default().with_understaffing(true);
        let (v, built) = setup(&params);
        // vars: x[N1,S2], x[N2,S1], x[N2,S2], ot[N1], ot[N2], unmet[S1], unmet[S2]
        assert_eq!(built.model.variable_count(), 7);
        let values = vec![0.9999999, 1.0000001, 1e-9, -1e-9, 3.5, 1.0, -2e-10];

        let plan = decode_plan(&values, 12.0, &built, &v, true);
        assert_eq!(
            plan.assignments,
            vec![Assignment::new("N1", "S2"), Assignment::new("N2", "S1")]
        );
        assert_eq!(plan.overtime_by_nurse["N1"], 0.0);
        assert!((plan.overtime_by_nurse["N2"] - 3.5).abs() < 1e-10);
        let unmet = plan.unmet_by_shift.as_ref().unwrap();
        assert!((unmet["S1"] - 1.0).abs() < 1e-10);
        assert_eq!(unmet["S2"], 0.0);
        assert!(plan.optimal);
    }

    #[test]
    fn test_overtime_zero_when_disabled() {
        let params = Parameters::default().with_overtime(false);
        let (v, built) = setup(&params);
        let values = vec![1.0; built.model.variable_count()];
        let plan = decode_plan(&values, 0.0, &built, &v, true);
        assert!(plan.overtime_by_nurse.values().all(|&h| h == 0.0));
        assert_eq!(plan.overtime_by_nurse.len(), 2);
        assert!(plan.unmet_by_shift.is_none());
    }

    #[test]
    fn test_infeasible_diagnostics() {
        let params = Parameters::default();
        let (v, built) = setup(&params);
        let result = SolveResult::empty(SolveStatus::Infeasible);
        let out = interpret(&result, &built, &v, params.skill_compatibility);

        assert!(out.plan.is_none());
        assert_eq!(out.diagnostics.len(), 2);
        let s1 = &out.diagnostics[0];
        assert_eq!(s1.shift_id, "S1");
        assert_eq!(s1.max_coverage, 1);
        assert!(s1.is_short());
        assert!(!out.diagnostics[1].is_short());
    }

    #[test]
    fn test_timeout_with_incumbent_is_provisional() {
        let params = Parameters::default();
        let (v, built) = setup(&params);
        let values = vec![1.0, 1.0, 0.0, 0.0, 0.0];
        let result = SolveResult::with_values(SolveStatus::Timeout, values, 0.0);
        let out = interpret(&result, &built, &v, params.skill_compatibility);

        let plan = out.plan.unwrap();
        assert!(!plan.optimal);
        assert_eq!(plan.assignment_count(), 2);
    }

    #[test]
    fn test_timeout_without_incumbent() {
        let params = Parameters::default();
        let (v, built) = setup(&params);
        let result = SolveResult::empty(SolveStatus::Timeout).with_message("limit");
        let out = interpret(&result, &built, &v, params.skill_compatibility);
        assert!(out.plan.is_none());
        assert_eq!(out.message.as_deref(), Some("limit"));
    }

    #[test]
    fn test_solve_error_propagates_message() {
        let params = Parameters::default();
        let (v, built) = setup(&params);
        let out = interpret(
            &SolveResult::error("backend crashed"),
            &built,
            &v,
            params.skill_compatibility,
        );
        assert!(out.plan.is_none());
        assert_eq!(out.message.as_deref(), Some("backend crashed"));
    }

    #[test]
    fn test_value_count_mismatch_yields_no_plan() {
        let params = Parameters::default();
        let (v, built) = setup(&params);
        let result = SolveResult::with_values(SolveStatus::Optimal, vec![1.0], 0.0);
        let out = interpret(&result, &built, &v, params.skill_compatibility);
        assert!(out.plan.is_none());
        assert!(out.message.unwrap().contains("values"));
    }

    #[test]
    fn test_objective_recomputed_when_missing() {
        let params = Parameters::default().with_understaffing(true);
        let (v, built) = setup(&params);
        let mut result = SolveResult::with_values(
            SolveStatus::Optimal,
            vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            0.0,
        );
        result.objective_value = None;
        let out = interpret(&result, &built, &v, params.skill_compatibility);
        // unmet[S1] = 1 at default weight 50
        assert!((out.plan.unwrap().objective_value - 50.0).abs() < 1e-9);
    }
}
