//! Roster quality metrics (KPIs).
//!
//! Computes staffing indicators from a plan and its input instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Hours by nurse | Σ hours of assigned shifts |
//! | Total overtime | Σ overtime hours |
//! | Total unmet | Σ unmet headcount |
//! | Coverage rate | Σ min(assigned, demand) / Σ demand |
//! | Avg utilization | Mean of hours worked / weekly cap |
//! | Preference score | Σ scores of assigned pairs |

use std::collections::{BTreeMap, HashMap};

use crate::models::{AssignmentPlan, RosterInstance};

/// Roster performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterKpi {
    /// Hours worked per nurse (every nurse present).
    pub hours_by_nurse: BTreeMap<String, f64>,
    /// Total hours worked.
    pub total_hours: f64,
    /// Total overtime hours.
    pub total_overtime: f64,
    /// Total unmet headcount.
    pub total_unmet: f64,
    /// Fraction of demanded headcount covered (1.0 when no demand).
    pub coverage_rate: f64,
    /// Mean of hours worked / weekly cap across nurses (0.0 when no nurses).
    pub avg_utilization: f64,
    /// Sum of preference scores over assigned pairs.
    pub preference_score: f64,
}

impl RosterKpi {
    /// Computes KPIs from a plan and the instance it was solved from.
    ///
    /// Assignments naming unknown nurses or shifts are ignored.
    pub fn calculate(plan: &AssignmentPlan, instance: &RosterInstance) -> Self {
        let shift_hours: HashMap<&str, f64> = instance
            .shifts
            .iter()
            .map(|s| (s.id.as_str(), s.hours))
            .collect();

        let mut hours_by_nurse: BTreeMap<String, f64> = instance
            .nurses
            .iter()
            .map(|n| (n.id.clone(), 0.0))
            .collect();
        let mut headcount: HashMap<&str, i64> = HashMap::new();

        for a in &plan.assignments {
            let (Some(&h), Some(worked)) = (
                shift_hours.get(a.shift_id.as_str()),
                hours_by_nurse.get_mut(&a.nurse_id),
            ) else {
                continue;
            };
            *worked += h;
            *headcount.entry(a.shift_id.as_str()).or_insert(0) += 1;
        }

        let total_demand: i64 = instance.shifts.iter().map(|s| i64::from(s.demand)).sum();
        let covered: i64 = instance
            .shifts
            .iter()
            .map(|s| {
                let assigned = headcount.get(s.id.as_str()).copied().unwrap_or(0);
                assigned.min(i64::from(s.demand))
            })
            .sum();
        let coverage_rate = if total_demand == 0 {
            1.0
        } else {
            covered as f64 / total_demand as f64
        };

        let avg_utilization = if instance.nurses.is_empty() {
            0.0
        } else {
            let sum: f64 = instance
                .nurses
                .iter()
                .map(|n| hours_by_nurse.get(&n.id).copied().unwrap_or(0.0) / n.max_hours_per_week)
                .sum();
            sum / instance.nurses.len() as f64
        };

        let scores: HashMap<(&str, &str), f64> = instance
            .preferences
            .iter()
            .map(|p| ((p.nurse_id.as_str(), p.shift_id.as_str()), p.score))
            .collect();
        let preference_score: f64 = plan
            .assignments
            .iter()
            .filter_map(|a| scores.get(&(a.nurse_id.as_str(), a.shift_id.as_str())))
            .sum();

        Self {
            total_hours: hours_by_nurse.values().sum::<f64>(),
            hours_by_nurse,
            total_overtime: plan.total_overtime(),
            total_unmet: plan.total_unmet(),
            coverage_rate,
            avg_utilization,
            preference_score,
        }
    }

    /// Whether the roster meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_coverage: f64, max_overtime: f64) -> bool {
        self.coverage_rate >= min_coverage && self.total_overtime <= max_overtime
    }
}
