//! Nurse rostering framework for the U-Engine ecosystem.
//!
//! Assigns nurses to shifts so that coverage, skill, availability, and
//! weekly-hour constraints hold, while minimizing a weighted cost of
//! overtime, unmet demand, and unmet preferences.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Nurse`, `Shift`, `AvailabilityEdge`,
//!   `PreferenceEdge`, `RosterInstance`, `Parameters`, `AssignmentPlan`
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling
//!   references, invalid hours/demand/weights)
//! - **`builder`**: MILP formulation over eligible nurse-shift pairs
//! - **`lp`**: Backend-neutral linear model and the `MilpSolver` boundary
//!   (`good_lp` + `microlp` by default)
//! - **`interpret`**: Decoding solver values, infeasibility diagnosis
//! - **`scheduler`**: The `generate_schedule` pipeline and roster KPIs
//! - **`config`**: TOML run configuration
//!
//! # Example
//!
//! ```
//! use u_roster::models::{Nurse, Parameters, RosterInstance, Shift, SkillLevel};
//! use u_roster::scheduler::generate_schedule;
//!
//! let instance = RosterInstance::new()
//!     .with_nurse(Nurse::icu("N1", 40.0))
//!     .with_nurse(Nurse::general("N2", 40.0))
//!     .with_shift(Shift::new("day", 8.0, 2, SkillLevel::General))
//!     .with_full_availability();
//!
//! let result = generate_schedule(instance, &Parameters::default()).unwrap();
//! assert!(result.is_optimal());
//! assert_eq!(result.assignments().len(), 2);
//! ```
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Wolsey (2020), "Integer Programming"

pub mod builder;
pub mod config;
pub mod error;
pub mod interpret;
pub mod lp;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{Result, RosterError};
pub use scheduler::{generate_schedule, ScheduleResult};
