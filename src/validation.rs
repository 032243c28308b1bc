//! Input validation for rostering problems.
//!
//! Checks structural integrity of nurses, shifts, and their relations
//! before any model is built. Detects:
//! - Duplicate IDs (nurses, shifts, and repeated edges for one pair)
//! - Edges referencing unknown nurses or shifts
//! - Non-positive shift hours or weekly caps, negative demand
//! - Negative or non-finite objective weights and preference scores
//!
//! A successful pass yields a [`ValidatedInstance`], the only input the
//! model builder accepts.

use crate::models::{Nurse, Parameters, RosterInstance, Shift};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities (or two edges for one pair) share the same ID.
    DuplicateId,
    /// An edge references a nurse that doesn't exist.
    UnknownNurse,
    /// An edge references a shift that doesn't exist.
    UnknownShift,
    /// A shift has zero, negative, or non-finite hours.
    NonPositiveHours,
    /// A shift has negative demand.
    NegativeDemand,
    /// A nurse has a zero, negative, or non-finite weekly cap.
    NonPositiveMaxHours,
    /// An objective weight is negative or non-finite.
    InvalidWeight,
    /// A preference score is NaN or infinite.
    NonFiniteValue,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A rostering instance that passed validation.
///
/// Owns its own copy of the input and dense lookup tables keyed by
/// position (`nurse_idx`, `shift_idx` in input order). Immutable.
#[derive(Debug, Clone)]
pub struct ValidatedInstance {
    instance: RosterInstance,
    nurse_pos: HashMap<String, usize>,
    shift_pos: HashMap<String, usize>,
    available: HashSet<(usize, usize)>,
    preferences: HashMap<(usize, usize), f64>,
}

impl ValidatedInstance {
    /// Nurses in input order.
    pub fn nurses(&self) -> &[Nurse] {
        &self.instance.nurses
    }

    /// Shifts in input order.
    pub fn shifts(&self) -> &[Shift] {
        &self.instance.shifts
    }

    /// The underlying input snapshot.
    pub fn instance(&self) -> &RosterInstance {
        &self.instance
    }

    /// Position of a nurse by ID.
    pub fn nurse_index(&self, nurse_id: &str) -> Option<usize> {
        self.nurse_pos.get(nurse_id).copied()
    }

    /// Position of a shift by ID.
    pub fn shift_index(&self, shift_id: &str) -> Option<usize> {
        self.shift_pos.get(shift_id).copied()
    }

    /// Whether nurse `n` is available for shift `s` (missing edge = no).
    pub fn is_available(&self, n: usize, s: usize) -> bool {
        self.available.contains(&(n, s))
    }

    /// Preference score for a pair (0.0 when no edge).
    pub fn preference(&self, n: usize, s: usize) -> f64 {
        self.preferences.get(&(n, s)).copied().unwrap_or(0.0)
    }

    /// Whether any non-neutral preference edge exists.
    pub fn has_preferences(&self) -> bool {
        self.preferences.values().any(|&v| v != 0.0)
    }
}

/// Validates a rostering instance.
///
/// Checks:
/// 1. No duplicate nurse IDs
/// 2. No duplicate shift IDs
/// 3. Weekly caps are positive and finite
/// 4. Shift hours are positive and finite, demand is non-negative
/// 5. Every availability/preference edge references known IDs
/// 6. At most one availability and one preference edge per pair
/// 7. Preference scores are finite
///
/// # Returns
/// The validated instance if all checks pass, `Err(errors)` with all
/// detected issues otherwise.
pub fn validate_instance(
    instance: RosterInstance,
) -> Result<ValidatedInstance, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut nurse_pos = HashMap::new();
    for (idx, n) in instance.nurses.iter().enumerate() {
        if nurse_pos.insert(n.id.clone(), idx).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate nurse ID: {}", n.id),
            ));
        }
        if !(n.max_hours_per_week.is_finite() && n.max_hours_per_week > 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveMaxHours,
                format!(
                    "Nurse '{}' has invalid max_hours_per_week {}",
                    n.id, n.max_hours_per_week
                ),
            ));
        }
    }

    let mut shift_pos = HashMap::new();
    for (idx, s) in instance.shifts.iter().enumerate() {
        if shift_pos.insert(s.id.clone(), idx).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shift ID: {}", s.id),
            ));
        }
        if !(s.hours.is_finite() && s.hours > 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveHours,
                format!("Shift '{}' has invalid hours {}", s.id, s.hours),
            ));
        }
        if s.demand < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDemand,
                format!("Shift '{}' has negative demand {}", s.id, s.demand),
            ));
        }
    }

    // Check availability references
    let mut seen_availability = HashSet::new();
    let mut available = HashSet::new();
    for edge in &instance.availability {
        let Some((n, s)) = resolve_edge(
            "Availability",
            &edge.nurse_id,
            &edge.shift_id,
            &nurse_pos,
            &shift_pos,
            &mut errors,
        ) else {
            continue;
        };
        if !seen_availability.insert((n, s)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!(
                    "Duplicate availability edge for ('{}', '{}')",
                    edge.nurse_id, edge.shift_id
                ),
            ));
            continue;
        }
        if edge.available {
            available.insert((n, s));
        }
    }

    // Check preference references
    let mut preferences = HashMap::new();
    for edge in &instance.preferences {
        if !edge.score.is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonFiniteValue,
                format!(
                    "Preference ('{}', '{}') has non-finite score",
                    edge.nurse_id, edge.shift_id
                ),
            ));
        }
        let Some((n, s)) = resolve_edge(
            "Preference",
            &edge.nurse_id,
            &edge.shift_id,
            &nurse_pos,
            &shift_pos,
            &mut errors,
        ) else {
            continue;
        };
        if preferences.insert((n, s), edge.score).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!(
                    "Duplicate preference edge for ('{}', '{}')",
                    edge.nurse_id, edge.shift_id
                ),
            ));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedInstance {
        instance,
        nurse_pos,
        shift_pos,
        available,
        preferences,
    })
}

/// Validates objective weights.
///
/// All weights must be finite and non-negative.
pub fn validate_parameters(params: &Parameters) -> ValidationResult {
    let errors: Vec<ValidationError> = [
        ("overtime_weight", params.overtime_weight),
        ("understaff_weight", params.understaff_weight),
        ("preference_weight", params.preference_weight),
    ]
    .into_iter()
    .filter(|(_, w)| !(w.is_finite() && *w >= 0.0))
    .map(|(name, w)| {
        ValidationError::new(
            ValidationErrorKind::InvalidWeight,
            format!("Parameter {name} must be finite and >= 0, got {w}"),
        )
    })
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn resolve_edge(
    relation: &str,
    nurse_id: &str,
    shift_id: &str,
    nurse_pos: &HashMap<String, usize>,
    shift_pos: &HashMap<String, usize>,
    errors: &mut Vec<ValidationError>,
) -> Option<(usize, usize)> {
    let n = nurse_pos.get(nurse_id).copied();
    let s = shift_pos.get(shift_id).copied();

    if n.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnknownNurse,
            format!("{relation} edge references unknown nurse '{nurse_id}'"),
        ));
    }
    if s.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnknownShift,
            format!("{relation} edge references unknown shift '{shift_id}'"),
        ));
    }

    n.zip(s)
}
