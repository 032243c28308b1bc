//! Rostering instance: nurses, shifts, and the relations between them.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Nurse, Shift};

/// Whether a nurse can work a shift.
///
/// Pairs without an edge are treated as unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityEdge {
    /// Referenced nurse.
    pub nurse_id: String,
    /// Referenced shift.
    pub shift_id: String,
    /// Availability flag (`0`/`1` or `false`/`true` in input).
    #[serde(deserialize_with = "flag_from_int_or_bool")]
    pub available: bool,
}

/// A nurse's preference for a shift.
///
/// Positive scores reward the assignment, negative scores discourage it.
/// Pairs without an edge are neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceEdge {
    /// Referenced nurse.
    pub nurse_id: String,
    /// Referenced shift.
    pub shift_id: String,
    /// Preference score.
    pub score: f64,
}

impl AvailabilityEdge {
    /// Creates a new availability edge.
    pub fn new(nurse_id: impl Into<String>, shift_id: impl Into<String>, available: bool) -> Self {
        Self {
            nurse_id: nurse_id.into(),
            shift_id: shift_id.into(),
            available,
        }
    }

    /// Creates an edge marking the pair available.
    pub fn available(nurse_id: impl Into<String>, shift_id: impl Into<String>) -> Self {
        Self::new(nurse_id, shift_id, true)
    }
}

impl PreferenceEdge {
    /// Creates a new preference edge.
    pub fn new(nurse_id: impl Into<String>, shift_id: impl Into<String>, score: f64) -> Self {
        Self {
            nurse_id: nurse_id.into(),
            shift_id: shift_id.into(),
            score,
        }
    }
}

fn flag_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "availability flag must be 0 or 1, got {other}"
        ))),
    }
}

/// Complete input snapshot for one rostering run.
///
/// Unvalidated; pass it through [`crate::validation::validate_instance`]
/// (or [`crate::scheduler::generate_schedule`]) before modelling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterInstance {
    /// Nurses to roster.
    pub nurses: Vec<Nurse>,
    /// Shifts to staff.
    pub shifts: Vec<Shift>,
    /// Availability relation.
    pub availability: Vec<AvailabilityEdge>,
    /// Optional preference relation.
    #[serde(default)]
    pub preferences: Vec<PreferenceEdge>,
}

impl RosterInstance {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a nurse.
    pub fn with_nurse(mut self, nurse: Nurse) -> Self {
        self.nurses.push(nurse);
        self
    }

    /// Adds a shift.
    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.shifts.push(shift);
        self
    }

    /// Marks a nurse available for a shift.
    pub fn with_available(
        mut self,
        nurse_id: impl Into<String>,
        shift_id: impl Into<String>,
    ) -> Self {
        self.availability
            .push(AvailabilityEdge::available(nurse_id, shift_id));
        self
    }

    /// Adds an availability edge.
    pub fn with_availability(mut self, edge: AvailabilityEdge) -> Self {
        self.availability.push(edge);
        self
    }

    /// Adds a preference edge.
    pub fn with_preference(
        mut self,
        nurse_id: impl Into<String>,
        shift_id: impl Into<String>,
        score: f64,
    ) -> Self {
        self.preferences
            .push(PreferenceEdge::new(nurse_id, shift_id, score));
        self
    }

    /// Marks every nurse available for every shift.
    pub fn with_full_availability(mut self) -> Self {
        for n in &self.nurses {
            for s in &self.shifts {
                self.availability
                    .push(AvailabilityEdge::available(n.id.as_str(), s.id.as_str()));
            }
        }
        self
    }
}
