//! MILP formulation of nurse rostering.
//!
//! Translates a validated instance and parameters into a [`LinearModel`],
//! keeping an index from model variables back to nurse/shift identities.
//!
//! # Formulation
//!
//! Variables (created in this order):
//! - `x[n,s] ∈ {0,1}` only for eligible pairs (available and skill-compatible)
//! - `ot[n] >= 0` per nurse, only if overtime is allowed
//! - `unmet[s] >= 0` per shift, only if understaffing is allowed
//!
//! Constraints:
//! - `cover[s]`: `Σn x[n,s] + unmet[s] >= demand(s)`
//! - `hours[n]`: `Σs hours(s)·x[n,s] - ot[n] <= max_hours(n)`
//!
//! Objective (minimize):
//! `w_ot·Σ ot[n] + w_us·Σ unmet[s] - w_pref·Σ score(n,s)·x[n,s]`
//!
//! # Reference
//! Burke et al. (2004), "The State of the Art of Nurse Rostering", Sec. 4

use std::collections::HashMap;

use log::debug;

use crate::lp::{LinearExpr, LinearModel, Sense, VarId};
use crate::models::{Parameters, SkillCompatibility};
use crate::validation::ValidatedInstance;

/// Whether nurse `n` may be given a variable for shift `s`.
///
/// Eligible = available AND the nurse's skill satisfies the shift
/// requirement under `rule`.
pub fn is_eligible(
    instance: &ValidatedInstance,
    rule: SkillCompatibility,
    n: usize,
    s: usize,
) -> bool {
    instance.is_available(n, s)
        && rule.permits(
            instance.nurses()[n].skill_level,
            instance.shifts()[s].required_skill,
        )
}

/// An assignment variable with its nurse/shift positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentVar {
    /// Nurse position in the validated instance.
    pub nurse: usize,
    /// Shift position in the validated instance.
    pub shift: usize,
    /// Model variable.
    pub var: VarId,
}

/// Maps model variables back to domain identities.
#[derive(Debug, Clone, Default)]
pub struct VariableIndex {
    assignments: Vec<AssignmentVar>,
    by_pair: HashMap<(usize, usize), VarId>,
    overtime: Option<Vec<VarId>>,
    unmet: Option<Vec<VarId>>,
}

impl VariableIndex {
    /// Assignment variables, nurse-major in input order.
    pub fn assignments(&self) -> &[AssignmentVar] {
        &self.assignments
    }

    /// Assignment variable for a pair, if the pair is eligible.
    pub fn assignment_var(&self, nurse: usize, shift: usize) -> Option<VarId> {
        self.by_pair.get(&(nurse, shift)).copied()
    }

    /// Overtime variable per nurse position. `None` when overtime is disabled.
    pub fn overtime_vars(&self) -> Option<&[VarId]> {
        self.overtime.as_deref()
    }

    /// Unmet-demand variable per shift position. `None` when understaffing is disabled.
    pub fn unmet_vars(&self) -> Option<&[VarId]> {
        self.unmet.as_deref()
    }

    /// Number of assignment variables.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}

/// A built model together with its variable index.
#[derive(Debug, Clone)]
pub struct BuiltModel {
    /// The program handed to the solver.
    pub model: LinearModel,
    /// Variable-to-identity index for decoding.
    pub index: VariableIndex,
}

/// Builds a rostering MILP from a validated instance.
///
/// # Example
/// ```
/// use u_roster::builder::RosterModelBuilder;
/// use u_roster::models::{Nurse, Parameters, RosterInstance, Shift, SkillLevel};
/// use u_roster::validation::validate_instance;
///
/// let instance = RosterInstance::new()
///     .with_nurse(Nurse::general("N1", 40.0))
///     .with_nurse(Nurse::icu("N2", 40.0))
///     .with_shift(Shift::new("S1", 8.0, 1, SkillLevel::Icu))
///     .with_full_availability();
/// let validated = validate_instance(instance).unwrap();
/// let params = Parameters::default();
///
/// let built = RosterModelBuilder::new(&validated, &params).build();
/// // N1 is not ICU-qualified, so only (N2, S1) gets a variable.
/// assert_eq!(built.index.assignment_count(), 1);
/// ```
pub struct RosterModelBuilder<'a> {
    instance: &'a ValidatedInstance,
    params: &'a Parameters,
}

impl<'a> RosterModelBuilder<'a> {
    /// Creates a new builder.
    pub fn new(instance: &'a ValidatedInstance, params: &'a Parameters) -> Self {
        Self { instance, params }
    }

    /// Whether a pair gets an assignment variable.
    pub fn is_eligible(&self, n: usize, s: usize) -> bool {
        is_eligible(self.instance, self.params.skill_compatibility, n, s)
    }

    /// Builds the model: variables, then constraints, then objective.
    pub fn build(&self) -> BuiltModel {
        let mut model = LinearModel::new("nurse_roster");
        let mut index = VariableIndex::default();
        let nurses = self.instance.nurses();
        let shifts = self.instance.shifts();

        // Assignment variables for eligible pairs only
        for (n, nurse) in nurses.iter().enumerate() {
            for (s, shift) in shifts.iter().enumerate() {
                if !self.is_eligible(n, s) {
                    continue;
                }
                let var = model.add_binary(format!("x[{},{}]", nurse.id, shift.id));
                index.assignments.push(AssignmentVar {
                    nurse: n,
                    shift: s,
                    var,
                });
                index.by_pair.insert((n, s), var);
            }
        }

        if self.params.allow_overtime {
            index.overtime = Some(
                nurses
                    .iter()
                    .map(|nurse| model.add_continuous(format!("ot[{}]", nurse.id), 0.0))
                    .collect(),
            );
        }

        if self.params.allow_understaffing {
            index.unmet = Some(
                shifts
                    .iter()
                    .map(|shift| model.add_continuous(format!("unmet[{}]", shift.id), 0.0))
                    .collect(),
            );
        }

        // Coverage: assigned headcount plus slack meets demand
        let mut cover: Vec<LinearExpr> = vec![LinearExpr::new(); shifts.len()];
        let mut hours: Vec<LinearExpr> = vec![LinearExpr::new(); nurses.len()];
        for a in &index.assignments {
            cover[a.shift].add_term(a.var, 1.0);
            hours[a.nurse].add_term(a.var, shifts[a.shift].hours);
        }

        for (s, (shift, mut expr)) in shifts.iter().zip(cover).enumerate() {
            if let Some(unmet) = &index.unmet {
                expr.add_term(unmet[s], 1.0);
            }
            model.add_constraint(
                format!("cover[{}]", shift.id),
                expr,
                Sense::Ge,
                f64::from(shift.demand),
            );
        }

        // Weekly hours: overtime absorbs the excess when enabled
        for (n, (nurse, mut expr)) in nurses.iter().zip(hours).enumerate() {
            if let Some(ot) = &index.overtime {
                expr.add_term(ot[n], -1.0);
            }
            model.add_constraint(
                format!("hours[{}]", nurse.id),
                expr,
                Sense::Le,
                nurse.max_hours_per_week,
            );
        }

        model.set_objective(self.objective(&index));

        debug!(
            "built roster model: {} assignment vars ({} pairs pruned), {} vars, {} constraints",
            index.assignment_count(),
            nurses.len() * shifts.len() - index.assignment_count(),
            model.variable_count(),
            model.constraint_count()
        );

        BuiltModel { model, index }
    }

    fn objective(&self, index: &VariableIndex) -> LinearExpr {
        let mut objective = LinearExpr::new();

        if let Some(ot) = &index.overtime {
            for &var in ot {
                objective.add_term(var, self.params.overtime_weight);
            }
        }

        if let Some(unmet) = &index.unmet {
            for &var in unmet {
                objective.add_term(var, self.params.understaff_weight);
            }
        }

        // Preferences reward assignments; absent edges are neutral
        if self.params.uses_preferences() {
            for a in &index.assignments {
                let score = self.instance.preference(a.nurse, a.shift);
                if score != 0.0 {
                    objective.add_term(a.var, -self.params.preference_weight * score);
                }
            }
        }

        objective
    }
}
