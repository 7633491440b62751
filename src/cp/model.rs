//! Constraint model for interval scheduling.
//!
//! A `CpModel` holds interval variables (one per schedulable step),
//! precedence and resource constraints over them, and an optional
//! minimization objective. It is a passive description — solving is
//! the job of a [`CpSolver`](super::CpSolver) implementation.
//!
//! # Reference
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"

use std::collections::HashMap;

/// An interval decision variable.
///
/// Represents one step: a start time to be decided within
/// `[start_min, start_max]`, a fixed duration, and an end time
/// (`start + duration`) bounded by `end_max`.
#[derive(Debug, Clone)]
pub struct IntervalVar {
    /// Unique interval identifier.
    pub id: String,
    /// Earliest admissible start.
    pub start_min: i64,
    /// Latest admissible start.
    pub start_max: i64,
    /// Fixed processing duration (≥ 0).
    pub duration: i64,
    /// Latest admissible end.
    pub end_max: i64,
}

impl IntervalVar {
    /// Creates a new interval variable.
    pub fn new(
        id: impl Into<String>,
        start_min: i64,
        start_max: i64,
        duration: i64,
        end_max: i64,
    ) -> Self {
        Self {
            id: id.into(),
            start_min,
            start_max,
            duration,
            end_max,
        }
    }
}

/// A constraint over interval variables.
#[derive(Debug, Clone)]
pub enum CpConstraint {
    /// `after` cannot start until `before` ends + `min_delay`.
    Precedence {
        before: String,
        after: String,
        min_delay: i64,
    },

    /// Listed intervals are mutually exclusive in time
    /// (a disjunctive resource of capacity 1).
    NoOverlap { interval_ids: Vec<String> },

    /// At any instant, at most `capacity` of the listed intervals may be
    /// in progress. Each interval demands exactly one unit for its
    /// whole duration.
    Cumulative {
        interval_ids: Vec<String>,
        capacity: i32,
    },
}

/// The optimization objective.
#[derive(Debug, Clone)]
pub enum Objective {
    /// Minimize the maximum end time over the listed intervals.
    MinimizeMaxEnd(Vec<String>),
}

/// A constraint model over interval variables.
#[derive(Debug, Clone)]
pub struct CpModel {
    name: String,
    horizon: i64,
    intervals: Vec<IntervalVar>,
    index: HashMap<String, usize>,
    constraints: Vec<CpConstraint>,
    objective: Option<Objective>,
}

impl CpModel {
    /// Creates an empty model with the given planning horizon.
    pub fn new(name: impl Into<String>, horizon: i64) -> Self {
        Self {
            name: name.into(),
            horizon,
            intervals: Vec::new(),
            index: HashMap::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Model name (diagnostics only).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Planning horizon: upper bound on any end time.
    pub fn horizon(&self) -> i64 {
        self.horizon
    }

    /// Adds an interval variable. Interval ids must be unique.
    pub fn add_interval(&mut self, interval: IntervalVar) {
        self.index.insert(interval.id.clone(), self.intervals.len());
        self.intervals.push(interval);
    }

    /// Adds a precedence constraint: `after` starts ≥ `before`'s end + delay.
    pub fn add_precedence(
        &mut self,
        before: impl Into<String>,
        after: impl Into<String>,
        min_delay: i64,
    ) {
        self.constraints.push(CpConstraint::Precedence {
            before: before.into(),
            after: after.into(),
            min_delay,
        });
    }

    /// Adds a mutual-exclusion constraint over the given intervals.
    pub fn add_no_overlap(&mut self, interval_ids: Vec<String>) {
        self.constraints.push(CpConstraint::NoOverlap { interval_ids });
    }

    /// Adds a unit-demand cumulative constraint over the given intervals.
    pub fn add_cumulative(&mut self, interval_ids: Vec<String>, capacity: i32) {
        self.constraints.push(CpConstraint::Cumulative {
            interval_ids,
            capacity,
        });
    }

    /// Sets the objective.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// The objective, if one was set.
    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// All interval variables, in insertion order.
    pub fn intervals(&self) -> &[IntervalVar] {
        &self.intervals
    }

    /// Looks up an interval by id.
    pub fn interval(&self, id: &str) -> Option<&IntervalVar> {
        self.index.get(id).map(|&i| &self.intervals[i])
    }

    /// Index of an interval id in [`intervals`](Self::intervals).
    pub fn interval_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// All constraints.
    pub fn constraints(&self) -> &[CpConstraint] {
        &self.constraints
    }

    /// Number of interval variables.
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
