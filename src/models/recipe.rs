//! Recipe (job) model.
//!
//! A recipe is an ordered sequence of steps. Steps execute strictly
//! sequentially in ascending `order_number`; each step occupies exactly
//! one resource for its whole duration.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};

/// A single step of a recipe.
///
/// The smallest schedulable unit of work: a fixed duration on a fixed
/// resource, positioned within its recipe by `order_number`.
///
/// # Time Representation
/// All times are in milliseconds relative to a scheduling epoch (t=0).
/// The consumer defines what t=0 means (e.g., shift start, midnight UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeStep {
    /// Unique step identifier (across all recipes).
    pub id: String,
    /// Parent recipe identifier.
    pub recipe_id: String,
    /// Position within the recipe. Steps run in ascending order;
    /// ties fall back to step id, deterministically.
    pub order_number: i32,
    /// Processing duration (ms). Zero-duration steps are valid.
    pub duration_ms: i64,
    /// Resource this step occupies for its whole duration.
    pub resource_id: String,
}

impl RecipeStep {
    /// Creates a new step.
    pub fn new(
        id: impl Into<String>,
        recipe_id: impl Into<String>,
        order_number: i32,
    ) -> Self {
        Self {
            id: id.into(),
            recipe_id: recipe_id.into(),
            order_number,
            duration_ms: 0,
            resource_id: String::new(),
        }
    }

    /// Sets the processing duration.
    pub fn with_duration(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Sets the resource this step runs on.
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    /// End time for a given start time.
    #[inline]
    pub fn end_for(&self, start_ms: i64) -> i64 {
        start_ms + self.duration_ms
    }
}

/// A recipe (job) to be scheduled.
///
/// Contains one or more steps linked by a strict sequential order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier.
    pub id: String,
    /// Steps composing this recipe.
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    /// Creates a new recipe with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            steps: Vec::new(),
        }
    }

    /// Adds a step to this recipe.
    pub fn with_step(mut self, step: RecipeStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Steps sorted by `order_number` ascending, ties by step id.
    ///
    /// The sequencing constraints and the makespan objective both rely
    /// on this order being a deterministic total order.
    pub fn steps_in_order(&self) -> Vec<&RecipeStep> {
        let mut steps: Vec<&RecipeStep> = self.steps.iter().collect();
        steps.sort_by(|a, b| {
            a.order_number
                .cmp(&b.order_number)
                .then_with(|| a.id.cmp(&b.id))
        });
        steps
    }

    /// Total processing duration across all steps (ms).
    pub fn total_duration_ms(&self) -> i64 {
        self.steps.iter().map(|s| s.duration_ms).sum()
    }

    /// Whether this recipe has any steps.
    pub fn has_steps(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Number of steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
