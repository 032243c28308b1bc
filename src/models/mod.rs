//! Rostering domain models.
//!
//! Provides the data types for representing a nurse rostering problem
//! (nurses, shifts, availability, preferences, parameters) and its
//! solution (assignment plan, coverage diagnostics).
//!
//! # Domain Mappings
//!
//! | u-roster | Generic scheduling | Ward operations |
//! |----------|--------------------|-----------------|
//! | Nurse | Human resource | Staff member |
//! | Shift | Time slot with demand | Day/evening/night block |
//! | AvailabilityEdge | Resource calendar | Self-rostering request |
//! | AssignmentPlan | Schedule | Published roster |

mod instance;
mod nurse;
mod parameters;
mod plan;
mod shift;

pub use instance::{AvailabilityEdge, PreferenceEdge, RosterInstance};
pub use nurse::{Nurse, ParseSkillError, SkillLevel};
pub use parameters::{Parameters, SkillCompatibility};
pub use plan::{Assignment, AssignmentMatrix, AssignmentPlan, ShiftCoverage};
pub use shift::Shift;
