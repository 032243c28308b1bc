//! Objective weights and feature switches for a rostering run.

use serde::{Deserialize, Serialize};

use super::SkillLevel;

/// Rule deciding which nurse skill levels may cover a shift requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCompatibility {
    /// ICU shifts need ICU nurses; GENERAL shifts accept any nurse.
    #[default]
    Hierarchical,
    /// Nurse skill must equal the required skill.
    Exact,
}

impl SkillCompatibility {
    /// Whether a nurse with `nurse_skill` may work a shift requiring `required`.
    pub fn permits(&self, nurse_skill: SkillLevel, required: SkillLevel) -> bool {
        match self {
            SkillCompatibility::Hierarchical => match required {
                SkillLevel::Icu => nurse_skill == SkillLevel::Icu,
                SkillLevel::General => true,
            },
            SkillCompatibility::Exact => nurse_skill == required,
        }
    }
}

/// Rostering parameters.
///
/// # Examples
///
/// ```
/// use u_roster::models::Parameters;
///
/// let params = Parameters::default()
///     .with_understaffing(true)
///     .with_understaff_weight(25.0)
///     .with_preference_weight(2.0);
/// assert!(params.allow_understaffing);
/// assert!(params.allow_overtime);
/// assert_eq!(params.preference_weight, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Cost per overtime hour.
    pub overtime_weight: f64,
    /// Cost per unit of unmet shift demand.
    pub understaff_weight: f64,
    /// Reward multiplier for preference scores.
    pub preference_weight: f64,
    /// Whether hours beyond the weekly cap are allowed (at a cost).
    pub allow_overtime: bool,
    /// Whether shifts may be left short-staffed (at a cost).
    pub allow_understaffing: bool,
    /// Skill compatibility rule used for eligibility pruning.
    pub skill_compatibility: SkillCompatibility,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            overtime_weight: 10.0,
            understaff_weight: 50.0,
            preference_weight: 0.0,
            allow_overtime: true,
            allow_understaffing: false,
            skill_compatibility: SkillCompatibility::Hierarchical,
        }
    }
}

impl Parameters {
    /// Sets the overtime cost weight.
    pub fn with_overtime_weight(mut self, weight: f64) -> Self {
        self.overtime_weight = weight;
        self
    }

    /// Sets the understaffing penalty weight.
    pub fn with_understaff_weight(mut self, weight: f64) -> Self {
        self.understaff_weight = weight;
        self
    }

    /// Sets the preference reward weight.
    pub fn with_preference_weight(mut self, weight: f64) -> Self {
        self.preference_weight = weight;
        self
    }

    /// Enables or disables overtime.
    pub fn with_overtime(mut self, allow: bool) -> Self {
        self.allow_overtime = allow;
        self
    }

    /// Enables or disables understaffing.
    pub fn with_understaffing(mut self, allow: bool) -> Self {
        self.allow_understaffing = allow;
        self
    }

    /// Sets the skill compatibility rule.
    pub fn with_skill_compatibility(mut self, rule: SkillCompatibility) -> Self {
        self.skill_compatibility = rule;
        self
    }

    /// Whether preference scores contribute to the objective.
    pub fn uses_preferences(&self) -> bool {
        self.preference_weight != 0.0
    }
}
