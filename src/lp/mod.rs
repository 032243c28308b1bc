//! Mixed-integer linear programming layer.
//!
//! Provides a backend-neutral model for linear problems with binary and
//! continuous variables, and the solver boundary that runs it.
//!
//! # Key Components
//!
//! - **Model**: [`LinearModel`] with [`VarDef`], [`LinearExpr`], [`LinearConstraint`]
//! - **Solver**: [`MilpSolver`] trait, normalized [`SolveResult`] / [`SolveStatus`]
//! - **Backend**: [`MicroLpSolver`], `good_lp` over the pure-Rust `microlp` engine
//!
//! # Design
//!
//! The rostering builder only ever produces a [`LinearModel`]; it never
//! touches a solver binding. Any backend that implements [`MilpSolver`]
//! can replace [`MicroLpSolver`] without changes to model construction
//! or solution decoding.
//!
//! # References
//!
//! Wolsey (2020), "Integer Programming", 2nd ed.

mod backend;
mod model;
mod solver;

pub use backend::MicroLpSolver;
pub use model::{LinearConstraint, LinearExpr, LinearModel, Sense, VarDef, VarId, VarKind};
pub use solver::{MilpSolver, SolveResult, SolveStatus, SolverConfig};
