//! Recipe scheduling on capacity-limited resources.
//!
//! Schedules multi-step recipes onto shared resources, producing start
//! times that respect per-recipe step ordering and resource capacity
//! while minimizing makespan, then maps each multi-capacity resource's
//! usage onto concrete concurrency lanes so a resource with capacity N
//! can be consumed as N parallel timelines.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Recipe`, `RecipeStep`, `Resource`,
//!   and the solved outputs `StepOutput`, `ResourceInfo`, `SolvedSchedule`
//! - **`validation`**: Input integrity checks (duplicate IDs, resource refs,
//!   capacities, durations)
//! - **`cp`**: Constraint model, model builder, and the pluggable solver
//!   (`BranchBoundSolver` is the in-crate exact default)
//! - **`lanes`**: Lane assignment — greedy interval partitioning of a
//!   resource's solved steps into non-overlapping lanes
//! - **`scheduler`**: The pipeline (`CpScheduler`) and KPI evaluation
//! - **`error`**: Pipeline failure classification
//!
//! # Pipeline
//!
//! validate → build model → solve → assign lanes → aggregate. Each run
//! is independent and synchronous; a request either completes with a
//! full schedule or fails atomically.
//!
//! # Example
//!
//! ```
//! use laneplan::models::{Recipe, RecipeStep, Resource};
//! use laneplan::scheduler::CpScheduler;
//!
//! let recipes = vec![
//!     Recipe::new("R1")
//!         .with_step(RecipeStep::new("S1", "R1", 1).with_duration(1000).with_resource("mixer"))
//!         .with_step(RecipeStep::new("S2", "R1", 2).with_duration(4000).with_resource("oven")),
//!     Recipe::new("R2")
//!         .with_step(RecipeStep::new("S3", "R2", 1).with_duration(1000).with_resource("mixer"))
//!         .with_step(RecipeStep::new("S4", "R2", 2).with_duration(2000).with_resource("oven")),
//! ];
//! let resources = vec![
//!     Resource::new("mixer"),
//!     Resource::new("oven").with_capacity(2),
//! ];
//!
//! let solved = CpScheduler::new().schedule(&recipes, &resources).unwrap();
//! assert_eq!(solved.makespan_ms, 5000);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"
//! - Kleinberg & Tardos (2006), "Algorithm Design", Ch. 4.1
//!   (interval partitioning)

pub mod cp;
pub mod error;
pub mod lanes;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{ScheduleError, ScheduleResult};
