//! Shift model.
//!
//! A shift is a staffed time block with a headcount demand and a required
//! skill. Calendar fields are carried for reporting only; the rostering
//! model reasons about `hours` and `demand`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::SkillLevel;

/// A shift to be staffed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique shift identifier.
    pub id: String,
    /// Calendar date of the shift.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Wall-clock start time.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Wall-clock end time (may be earlier than start for overnight shifts).
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Paid hours counted against the weekly cap (must be > 0).
    pub hours: f64,
    /// Number of nurses required (must be >= 0).
    pub demand: i32,
    /// Minimum qualification needed to work this shift.
    pub required_skill: SkillLevel,
}

impl Shift {
    /// Creates a new shift.
    pub fn new(id: impl Into<String>, hours: f64, demand: i32, required_skill: SkillLevel) -> Self {
        Self {
            id: id.into(),
            date: None,
            start_time: None,
            end_time: None,
            hours,
            demand,
            required_skill,
        }
    }

    /// Sets the calendar date.
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets start and end wall-clock times.
    pub fn between(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Whether the shift wraps past midnight.
    pub fn is_overnight(&self) -> bool {
        matches!((self.start_time, self.end_time), (Some(s), Some(e)) if e <= s)
    }
}
