//! Builds a constraint model from scheduling domain objects.
//!
//! Translates recipes and resources into a [`CpModel`]: one interval
//! variable per step, sequencing constraints within each recipe, a
//! capacity constraint per resource, and a makespan objective.

use std::collections::HashMap;

use crate::models::{Recipe, Resource};

use super::model::{CpModel, IntervalVar, Objective};

/// Builds a CP model from recipes and resources.
///
/// # Example
/// ```
/// use laneplan::models::{Recipe, RecipeStep, Resource};
/// use laneplan::cp::ScheduleModelBuilder;
///
/// let recipes = vec![Recipe::new("R1").with_step(
///     RecipeStep::new("S1", "R1", 1).with_duration(1000).with_resource("M1"),
/// )];
/// let resources = vec![Resource::new("M1")];
/// let model = ScheduleModelBuilder::new(&recipes, &resources).build();
/// assert_eq!(model.interval_count(), 1);
/// ```
pub struct ScheduleModelBuilder<'a> {
    recipes: &'a [Recipe],
    resources: &'a [Resource],
}

impl<'a> ScheduleModelBuilder<'a> {
    /// Creates a new builder.
    pub fn new(recipes: &'a [Recipe], resources: &'a [Resource]) -> Self {
        Self { recipes, resources }
    }

    /// Planning horizon: the sum of all step durations.
    ///
    /// Serializing every step back to back always fits, so this is an
    /// admissible upper bound on the optimal makespan. It must never be
    /// tighter, or a solvable instance would be reported infeasible.
    pub fn horizon(&self) -> i64 {
        self.recipes.iter().map(|r| r.total_duration_ms()).sum()
    }

    /// Builds the model.
    ///
    /// Creates:
    /// - an interval variable per step, start bounded in `[0, horizon − duration]`
    /// - `Precedence` constraints linking consecutive steps of each recipe
    /// - per resource, `NoOverlap` (capacity 1) or a unit-demand
    ///   `Cumulative` (capacity > 1) over the steps using it
    /// - a `MinimizeMaxEnd` objective over each recipe's final step
    ///
    /// Constraints that cannot bind are omitted: `NoOverlap` needs at
    /// least two intervals, `Cumulative` more intervals than capacity.
    pub fn build(&self) -> CpModel {
        let horizon = self.horizon();
        let mut model = CpModel::new("recipe-scheduling", horizon);

        let mut resource_intervals: HashMap<&str, Vec<String>> = HashMap::new();
        let mut final_step_ids = Vec::new();

        for recipe in self.recipes {
            let ordered = recipe.steps_in_order();

            for step in &ordered {
                model.add_interval(IntervalVar::new(
                    step.id.as_str(),
                    0,
                    horizon - step.duration_ms,
                    step.duration_ms,
                    horizon,
                ));
                resource_intervals
                    .entry(step.resource_id.as_str())
                    .or_default()
                    .push(step.id.clone());
            }

            // Next step does not start until the current step ends.
            for pair in ordered.windows(2) {
                model.add_precedence(pair[0].id.as_str(), pair[1].id.as_str(), 0);
            }

            if let Some(last) = ordered.last() {
                final_step_ids.push(last.id.clone());
            }
        }

        for resource in self.resources {
            let Some(ids) = resource_intervals.get(resource.id.as_str()) else {
                continue;
            };
            if resource.capacity == 1 {
                if ids.len() > 1 {
                    model.add_no_overlap(ids.clone());
                }
            } else if ids.len() > resource.capacity as usize {
                model.add_cumulative(ids.clone(), resource.capacity);
            }
        }

        model.set_objective(Objective::MinimizeMaxEnd(final_step_ids));

        model
    }
}
