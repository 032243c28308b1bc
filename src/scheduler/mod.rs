//! Rostering pipeline and KPI evaluation.
//!
//! # Pipeline
//!
//! [`generate_schedule`] runs validate → build → solve → interpret for one
//! immutable input snapshot and returns a [`ScheduleResult`]. The run moves
//! through the [`RunState`] lifecycle and always ends in a terminal state.
//!
//! # KPI
//!
//! [`RosterKpi`] computes staffing metrics: hours worked, overtime,
//! unmet demand, coverage rate, utilization, and preference satisfaction.

mod kpi;
mod pipeline;
mod state;

pub use kpi::RosterKpi;
pub use pipeline::{
    generate_schedule, generate_schedule_from_config, generate_schedule_from_path,
    generate_schedule_with, ScheduleResult,
};
pub use state::RunState;
