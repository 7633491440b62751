//! Scheduling pipeline and result aggregation.
//!
//! `CpScheduler` runs one request through a synchronous pipeline:
//! validate → build model → solve → assign lanes → aggregate. Each run
//! owns its state, so concurrent requests are simply independent
//! scheduler instances.
//!
//! Failures are atomic: no partial schedule is ever returned.

mod kpi;

pub use kpi::ScheduleKpi;

use std::collections::HashMap;

use tracing::debug;

use crate::cp::{
    BranchBoundSolver, CpSolver, ScheduleModelBuilder, SolveStatus, SolverConfig,
};
use crate::error::{ScheduleError, ScheduleResult};
use crate::lanes::{assign_lanes, TimedStep};
use crate::models::{Recipe, Resource, ResourceInfo, SolvedSchedule, StepOutput};
use crate::validation::validate_input;

/// Input container for scheduling.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Recipes to schedule.
    pub recipes: Vec<Recipe>,
    /// Available resources.
    pub resources: Vec<Resource>,
}

impl ScheduleRequest {
    /// Creates a new schedule request.
    pub fn new(recipes: Vec<Recipe>, resources: Vec<Resource>) -> Self {
        Self { recipes, resources }
    }
}

/// Constraint-programming scheduler.
///
/// Minimizes makespan over the given recipes and resources, then maps
/// multi-capacity resource usage onto concrete lanes.
///
/// # Example
///
/// ```
/// use laneplan::models::{Recipe, RecipeStep, Resource};
/// use laneplan::scheduler::CpScheduler;
///
/// let recipes = vec![Recipe::new("R1").with_step(
///     RecipeStep::new("S1", "R1", 1).with_duration(1000).with_resource("M1"),
/// )];
/// let resources = vec![Resource::new("M1")];
///
/// let scheduler = CpScheduler::new();
/// let solved = scheduler.schedule(&recipes, &resources).unwrap();
/// assert_eq!(solved.makespan_ms, 1000);
/// ```
#[derive(Debug, Clone)]
pub struct CpScheduler<S = BranchBoundSolver> {
    solver: S,
    config: SolverConfig,
}

impl CpScheduler<BranchBoundSolver> {
    /// Creates a scheduler backed by the in-crate exact solver.
    pub fn new() -> Self {
        Self {
            solver: BranchBoundSolver::new(),
            config: SolverConfig::default(),
        }
    }
}

impl Default for CpScheduler<BranchBoundSolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CpSolver> CpScheduler<S> {
    /// Creates a scheduler backed by a custom solver.
    pub fn with_solver(solver: S) -> Self {
        Self {
            solver,
            config: SolverConfig::default(),
        }
    }

    /// Sets the solver configuration (time budget).
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Schedules recipes on resources.
    ///
    /// # Errors
    /// - `Invalid` when the input fails validation (checked before any
    ///   model is built or solver invoked)
    /// - `NoSolution` when the model is proven infeasible
    /// - `Timeout` when the time budget runs out with no solution
    /// - `LaneOverflow` when the solved schedule breaks its own
    ///   capacity bound (internal defect)
    pub fn schedule(
        &self,
        recipes: &[Recipe],
        resources: &[Resource],
    ) -> ScheduleResult<SolvedSchedule> {
        validate_input(recipes, resources).map_err(ScheduleError::Invalid)?;

        let model = ScheduleModelBuilder::new(recipes, resources).build();
        debug!(
            intervals = model.interval_count(),
            constraints = model.constraint_count(),
            horizon = model.horizon(),
            "model built"
        );

        let solution = self.solver.solve(&model, &self.config);
        match solution.status {
            SolveStatus::Optimal | SolveStatus::Feasible => {}
            SolveStatus::Infeasible => return Err(ScheduleError::NoSolution),
            SolveStatus::Timeout => return Err(ScheduleError::Timeout),
        }

        // Split solved steps by resource capacity: capacity-1 steps go
        // straight to lane 0, the rest run through lane assignment.
        let capacities: HashMap<&str, i32> =
            resources.iter().map(|r| (r.id.as_str(), r.capacity)).collect();

        let mut outputs: Vec<StepOutput> = Vec::new();
        let mut shared: HashMap<&str, Vec<TimedStep>> = HashMap::new();

        for recipe in recipes {
            for step in &recipe.steps {
                let start_ms = solution.start_of(&step.id).ok_or_else(|| {
                    ScheduleError::Internal(format!("no solved start for step '{}'", step.id))
                })?;
                let timed = TimedStep {
                    recipe_id: recipe.id.clone(),
                    step_id: step.id.clone(),
                    resource_id: step.resource_id.clone(),
                    duration_ms: step.duration_ms,
                    start_ms,
                };
                if capacities.get(step.resource_id.as_str()).copied().unwrap_or(1) > 1 {
                    shared
                        .entry(step.resource_id.as_str())
                        .or_default()
                        .push(timed);
                } else {
                    outputs.push(StepOutput {
                        recipe_id: timed.recipe_id,
                        step_id: timed.step_id,
                        resource_id: timed.resource_id,
                        duration_ms: timed.duration_ms,
                        start_ms: timed.start_ms,
                        lane: 0,
                    });
                }
            }
        }

        for resource in resources {
            if let Some(steps) = shared.remove(resource.id.as_str()) {
                outputs.extend(assign_lanes(resource.capacity, steps)?);
            }
        }

        let resource_infos = summarize_resources(resources, &outputs);
        let makespan_ms = solution.objective;

        debug!(
            makespan_ms,
            steps = outputs.len(),
            "schedule complete"
        );

        Ok(SolvedSchedule {
            steps: outputs,
            resources: resource_infos,
            makespan_ms,
        })
    }

    /// Schedules from a request.
    pub fn schedule_request(&self, request: &ScheduleRequest) -> ScheduleResult<SolvedSchedule> {
        self.schedule(&request.recipes, &request.resources)
    }
}

/// One summary per input resource: how many lanes its steps actually
/// used (1 + max lane, 0 when it had no steps).
fn summarize_resources(resources: &[Resource], outputs: &[StepOutput]) -> Vec<ResourceInfo> {
    resources
        .iter()
        .map(|resource| {
            let used_lane_count = outputs
                .iter()
                .filter(|o| o.resource_id == resource.id)
                .map(|o| o.lane + 1)
                .max()
                .unwrap_or(0);
            ResourceInfo {
                id: resource.id.clone(),
                capacity: resource.capacity,
                concurrent: used_lane_count > 1,
                used_lane_count,
            }
        })
        .collect()
}
