//! Nurse model.
//!
//! Nurses are the staff members assigned to shifts. Each nurse has a
//! skill level and a weekly hour cap; hours beyond the cap are overtime.
//!
//! # Reference
//! Burke et al. (2004), "The State of the Art of Nurse Rostering", Sec. 2

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A nurse that can be assigned to shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nurse {
    /// Unique nurse identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Qualification level.
    pub skill_level: SkillLevel,
    /// Contracted weekly hours before overtime applies (must be > 0).
    pub max_hours_per_week: f64,
}

/// Nurse qualification / shift skill requirement.
///
/// Serialized in upper case (`"GENERAL"`, `"ICU"`); [`FromStr`] accepts
/// any casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SkillLevel {
    /// General ward qualification.
    #[serde(alias = "general", alias = "General")]
    General,
    /// Intensive care qualification.
    #[serde(alias = "icu", alias = "Icu")]
    Icu,
}

impl SkillLevel {
    /// Canonical upper-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::General => "GENERAL",
            SkillLevel::Icu => "ICU",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a skill label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown skill level '{0}' (expected GENERAL or ICU)")]
pub struct ParseSkillError(pub String);

impl FromStr for SkillLevel {
    type Err = ParseSkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GENERAL" => Ok(SkillLevel::General),
            "ICU" => Ok(SkillLevel::Icu),
            _ => Err(ParseSkillError(s.to_string())),
        }
    }
}

impl Nurse {
    /// Creates a new nurse.
    pub fn new(id: impl Into<String>, skill_level: SkillLevel, max_hours_per_week: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            skill_level,
            max_hours_per_week,
        }
    }

    /// Creates a general-ward nurse.
    pub fn general(id: impl Into<String>, max_hours_per_week: f64) -> Self {
        Self::new(id, SkillLevel::General, max_hours_per_week)
    }

    /// Creates an ICU-qualified nurse.
    pub fn icu(id: impl Into<String>, max_hours_per_week: f64) -> Self {
        Self::new(id, SkillLevel::Icu, max_hours_per_week)
    }

    /// Sets the nurse name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
