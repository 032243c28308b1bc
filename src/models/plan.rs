//! Assignment plan (solution) model.
//!
//! A plan records which nurse works which shift, plus the overtime and
//! unmet demand the solver needed to reach it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A solved roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentPlan {
    /// Nurse-shift assignments, nurse-major in input order.
    pub assignments: Vec<Assignment>,
    /// Overtime hours per nurse (every nurse present, `0.0` when none).
    pub overtime_by_nurse: BTreeMap<String, f64>,
    /// Unmet headcount per shift. `None` when understaffing is disabled.
    pub unmet_by_shift: Option<BTreeMap<String, f64>>,
    /// Objective value of this plan.
    pub objective_value: f64,
    /// `false` for a provisional plan taken from a timed-out solve.
    pub optimal: bool,
}

/// A single nurse-to-shift assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned nurse.
    pub nurse_id: String,
    /// Covered shift.
    pub shift_id: String,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(nurse_id: impl Into<String>, shift_id: impl Into<String>) -> Self {
        Self {
            nurse_id: nurse_id.into(),
            shift_id: shift_id.into(),
        }
    }
}

/// Dense nurse × shift boolean view of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentMatrix {
    /// Row labels.
    pub nurse_ids: Vec<String>,
    /// Column labels.
    pub shift_ids: Vec<String>,
    /// `cells[row][col]` is true when the nurse works the shift.
    pub cells: Vec<Vec<bool>>,
}

impl AssignmentMatrix {
    /// Cell lookup by ids. `None` when either id is not a row/column.
    pub fn get(&self, nurse_id: &str, shift_id: &str) -> Option<bool> {
        let row = self.nurse_ids.iter().position(|n| n == nurse_id)?;
        let col = self.shift_ids.iter().position(|s| s == shift_id)?;
        self.cells.get(row)?.get(col).copied()
    }

    /// Number of assigned cells.
    pub fn assigned_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c).count()
    }
}

/// Coverage bound for one shift, used to explain infeasibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCoverage {
    /// Diagnosed shift.
    pub shift_id: String,
    /// Required headcount.
    pub demand: i32,
    /// Eligible nurses (available and skill-compatible), ignoring hour caps.
    pub max_coverage: i32,
}

impl ShiftCoverage {
    /// Whether even full use of eligible nurses cannot meet demand.
    pub fn is_short(&self) -> bool {
        self.max_coverage < self.demand
    }

    /// Missing headcount under the best case (0 if coverable).
    pub fn shortfall(&self) -> i32 {
        (self.demand - self.max_coverage).max(0)
    }
}

impl AssignmentPlan {
    /// Creates an empty optimal plan.
    pub fn new() -> Self {
        Self {
            optimal: true,
            ..Self::default()
        }
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Whether the nurse works the shift.
    pub fn is_assigned(&self, nurse_id: &str, shift_id: &str) -> bool {
        self.assignments
            .iter()
            .any(|a| a.nurse_id == nurse_id && a.shift_id == shift_id)
    }

    /// Shifts worked by a nurse.
    pub fn assignments_for_nurse(&self, nurse_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.nurse_id == nurse_id)
            .collect()
    }

    /// Nurses working a shift.
    pub fn assignments_for_shift(&self, shift_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.shift_id == shift_id)
            .collect()
    }

    /// Headcount assigned to a shift.
    pub fn nurse_count_for_shift(&self, shift_id: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.shift_id == shift_id)
            .count()
    }

    /// Overtime hours of a nurse (0 if unknown).
    pub fn overtime_for(&self, nurse_id: &str) -> f64 {
        self.overtime_by_nurse.get(nurse_id).copied().unwrap_or(0.0)
    }

    /// Unmet headcount of a shift (0 if unknown or understaffing disabled).
    pub fn unmet_for(&self, shift_id: &str) -> f64 {
        self.unmet_by_shift
            .as_ref()
            .and_then(|m| m.get(shift_id).copied())
            .unwrap_or(0.0)
    }

    /// Sum of overtime across nurses.
    pub fn total_overtime(&self) -> f64 {
        self.overtime_by_nurse.values().sum()
    }

    /// Sum of unmet demand across shifts.
    pub fn total_unmet(&self) -> f64 {
        self.unmet_by_shift
            .as_ref()
            .map(|m| m.values().sum())
            .unwrap_or(0.0)
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Builds the nurse × shift matrix over the given row and column ids.
    pub fn matrix<N, S>(&self, nurse_ids: N, shift_ids: S) -> AssignmentMatrix
    where
        N: IntoIterator,
        N::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let nurse_ids: Vec<String> = nurse_ids.into_iter().map(Into::into).collect();
        let shift_ids: Vec<String> = shift_ids.into_iter().map(Into::into).collect();
        let assigned: HashSet<(&str, &str)> = self
            .assignments
            .iter()
            .map(|a| (a.nurse_id.as_str(), a.shift_id.as_str()))
            .collect();

        let cells = nurse_ids
            .iter()
            .map(|n| {
                shift_ids
                    .iter()
                    .map(|s| assigned.contains(&(n.as_str(), s.as_str())))
                    .collect()
            })
            .collect();

        AssignmentMatrix {
            nurse_ids,
            shift_ids,
            cells,
        }
    }
}
