//! Solved schedule model.
//!
//! Output of a scheduling run: one `StepOutput` per input step with its
//! solved start time and lane, one `ResourceInfo` per input resource,
//! and the minimized makespan.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Solved result for one step.
///
/// Immutable once produced. `lane` is always 0 on capacity-1 resources;
/// on a capacity-C resource it is in `0..C` and no two steps sharing a
/// lane on the same resource overlap in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutput {
    /// Parent recipe ID.
    pub recipe_id: String,
    /// Step ID.
    pub step_id: String,
    /// Resource the step occupies.
    pub resource_id: String,
    /// Processing duration (ms).
    pub duration_ms: i64,
    /// Solved start time (ms).
    pub start_ms: i64,
    /// Concurrency lane on the resource.
    pub lane: i32,
}

impl StepOutput {
    /// End time (start + duration) in ms.
    #[inline]
    pub fn end_ms(&self) -> i64 {
        self.start_ms + self.duration_ms
    }

    /// Whether this step's interval overlaps another's `[start, end)`.
    /// Zero-duration intervals are empty and overlap nothing.
    pub fn overlaps(&self, other: &StepOutput) -> bool {
        self.start_ms.max(other.start_ms) < self.end_ms().min(other.end_ms())
    }
}

/// Per-resource usage summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Resource ID.
    pub id: String,
    /// Declared capacity.
    pub capacity: i32,
    /// Whether more than one lane was actually needed.
    pub concurrent: bool,
    /// 1 + the maximum lane index used (0 if the resource had no steps).
    pub used_lane_count: i32,
}

/// A complete solved schedule.
///
/// Step outputs carry no particular order; use the query helpers to
/// slice by recipe or resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolvedSchedule {
    /// One output per input step.
    pub steps: Vec<StepOutput>,
    /// One summary per input resource.
    pub resources: Vec<ResourceInfo>,
    /// Minimized completion time of the last-finishing recipe (ms).
    pub makespan_ms: i64,
}

impl SolvedSchedule {
    /// Finds the output for a given step.
    pub fn step(&self, step_id: &str) -> Option<&StepOutput> {
        self.steps.iter().find(|s| s.step_id == step_id)
    }

    /// Returns all outputs for a given recipe.
    pub fn steps_for_recipe(&self, recipe_id: &str) -> Vec<&StepOutput> {
        self.steps
            .iter()
            .filter(|s| s.recipe_id == recipe_id)
            .collect()
    }

    /// Returns all outputs for a given resource.
    pub fn steps_for_resource(&self, resource_id: &str) -> Vec<&StepOutput> {
        self.steps
            .iter()
            .filter(|s| s.resource_id == resource_id)
            .collect()
    }

    /// Finds the summary for a given resource.
    pub fn resource_info(&self, resource_id: &str) -> Option<&ResourceInfo> {
        self.resources.iter().find(|r| r.id == resource_id)
    }

    /// Completion time of a recipe (latest end of its steps).
    pub fn recipe_completion_ms(&self, recipe_id: &str) -> Option<i64> {
        self.steps_for_recipe(recipe_id)
            .iter()
            .map(|s| s.end_ms())
            .max()
    }

    /// Computes resource utilization: busy time / horizon.
    ///
    /// Returns `None` if `horizon_ms` is zero or negative.
    pub fn resource_utilization(&self, resource_id: &str, horizon_ms: i64) -> Option<f64> {
        if horizon_ms <= 0 {
            return None;
        }
        let busy: i64 = self
            .steps_for_resource(resource_id)
            .iter()
            .map(|s| s.duration_ms)
            .sum();
        Some(busy as f64 / horizon_ms as f64)
    }

    /// Computes utilization for all resources with steps, over the makespan.
    ///
    /// Note: a capacity-C resource can exceed 1.0 when its lanes run
    /// concurrently for most of the horizon.
    pub fn all_utilizations(&self) -> HashMap<String, f64> {
        if self.makespan_ms <= 0 {
            return HashMap::new();
        }

        let mut resource_busy: HashMap<String, i64> = HashMap::new();
        for s in &self.steps {
            *resource_busy.entry(s.resource_id.clone()).or_insert(0) += s.duration_ms;
        }

        resource_busy
            .into_iter()
            .map(|(id, busy)| (id, busy as f64 / self.makespan_ms as f64))
            .collect()
    }

    /// Number of step outputs.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
