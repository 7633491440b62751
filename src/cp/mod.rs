//! CP-based scheduling formulation and solving.
//!
//! Builds a [`CpModel`] from recipes and resources, then solves it with
//! any [`CpSolver`] implementation. The model layer is a passive
//! description (intervals, precedence, capacity, objective); the solver
//! is pluggable — [`BranchBoundSolver`] is the in-crate exact default.
//!
//! # Reference
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"
//! - Laborie et al. (2018), "IBM ILOG CP Optimizer for Scheduling"

mod builder;
mod model;
mod solver;

pub use builder::ScheduleModelBuilder;
pub use model::{CpConstraint, CpModel, IntervalVar, Objective};
pub use solver::{
    BranchBoundSolver, CpSolution, CpSolver, IntervalSolution, SolveStats, SolveStatus,
    SolverConfig,
};
