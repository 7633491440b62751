//! Lane assignment for multi-capacity resources.
//!
//! The solver enforces only an aggregate capacity bound — at most C
//! steps of a capacity-C resource in progress at once — without giving
//! each step a concrete slot. This module partitions a resource's
//! solved steps into `capacity` non-overlapping lanes so the schedule
//! can be consumed as C parallel timelines.
//!
//! # Algorithm
//!
//! Greedy first-fit over steps sorted by start time: each step takes
//! the lowest-indexed lane that is empty or whose last step has already
//! ended. First-fit by increasing start time never uses more lanes than
//! the maximum number of simultaneously running steps, so whenever the
//! solved schedule honors its capacity a valid partition is found, in
//! O(n·C) after the sort.
//!
//! # Reference
//! Kleinberg & Tardos (2006), "Algorithm Design", Ch. 4.1
//! (interval partitioning)

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::StepOutput;

/// A step with its solver-assigned timing, before lane assignment.
///
/// Bundles the static recipe data and the solved start so the lane pass
/// never has to re-derive which variable belonged to which step.
#[derive(Debug, Clone)]
pub struct TimedStep {
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
}

impl TimedStep {
    /// End time (start + duration) in ms.
    #[inline]
    pub fn end_ms(&self) -> i64 {
        self.start_ms + self.duration_ms
    }

    fn into_output(self, lane: i32) -> StepOutput {
        StepOutput {
            recipe_id: self.recipe_id,
            step_id: self.step_id,
            resource_id: self.resource_id,
            duration_ms: self.duration_ms,
            start_ms: self.start_ms,
            lane,
        }
    }
}

/// Assigns each step of one resource to a lane in `0..capacity`.
///
/// Steps are processed in ascending start time; ties break by end time,
/// then by (recipe id, step id), making the assignment a deterministic
/// function of the solved timings.
///
/// # Errors
/// `ScheduleError::LaneOverflow` when some step fits no lane. That
/// means more than `capacity` steps were in progress at once — the
/// solved schedule violates the capacity it was solved under, which is
/// an internal defect rather than a property of the input.
pub fn assign_lanes(capacity: i32, mut steps: Vec<TimedStep>) -> ScheduleResult<Vec<StepOutput>> {
    steps.sort_by(|a, b| {
        a.start_ms
            .cmp(&b.start_ms)
            .then_with(|| a.end_ms().cmp(&b.end_ms()))
            .then_with(|| a.recipe_id.cmp(&b.recipe_id))
            .then_with(|| a.step_id.cmp(&b.step_id))
    });

    // Each lane remembers the end time of the last step placed in it.
    let mut lane_ends: Vec<Option<i64>> = vec![None; capacity.max(0) as usize];
    let mut outputs = Vec::with_capacity(steps.len());

    for step in steps {
        let lane = lane_ends
            .iter()
            .position(|end| end.map_or(true, |e| e <= step.start_ms));

        match lane {
            Some(lane) => {
                lane_ends[lane] = Some(step.end_ms());
                outputs.push(step.into_output(lane as i32));
            }
            None => {
                return Err(ScheduleError::LaneOverflow {
                    resource_id: step.resource_id,
                    step_id: step.step_id,
                });
            }
        }
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(recipe: &str, step: &str, duration: i64, start: i64) -> TimedStep {
        TimedStep {
            recipe_id: recipe.into(),
            step_id: step.into(),
            resource_id: "M".into(),
            duration_ms: duration,
            start_ms: start,
        }
    }

    fn lane_of<'a>(outputs: &'a [StepOutput], step_id: &str) -> i32 {
        outputs.iter().find(|o| o.step_id == step_id).unwrap().lane
    }

    #[test]
    fn test_reuses_freed_lane() {
        // Starts 0, 0, 2 with duration 2 on capacity 2: the third step
        // reuses lane 0 once the first finishes at t=2.
        let steps = vec![
            timed("R1", "a", 2, 0),
            timed("R2", "b", 2, 0),
            timed("R3", "c", 2, 2),
        ];

        let outputs = assign_lanes(2, steps).unwrap();
        assert_eq!(lane_of(&outputs, "a"), 0);
        assert_eq!(lane_of(&outputs, "b"), 1);
        assert_eq!(lane_of(&outputs, "c"), 0);
    }

    #[test]
    fn test_capacity_one_all_lane_zero() {
        let steps = vec![timed("R1", "a", 2, 0), timed("R2", "b", 2, 2)];
        let outputs = assign_lanes(1, steps).unwrap();
        assert!(outputs.iter().all(|o| o.lane == 0));
    }

    #[test]
    fn test_no_lane_exceeds_capacity_and_no_same_lane_overlap() {
        let steps = vec![
            timed("R1", "a", 3, 0),
            timed("R2", "b", 4, 1),
            timed("R3", "c", 2, 3),
            timed("R4", "d", 5, 4),
            timed("R5", "e", 1, 5),
        ];
        let capacity = 3;

        let outputs = assign_lanes(capacity, steps).unwrap();
        for o in &outputs {
            assert!(o.lane < capacity);
        }
        for a in &outputs {
            for b in &outputs {
                if a.step_id != b.step_id && a.lane == b.lane {
                    assert!(!a.overlaps(b), "{} and {} overlap in lane {}", a.step_id, b.step_id, a.lane);
                }
            }
        }
    }

    #[test]
    fn test_equal_interval_tie_break_is_by_recipe_then_step() {
        // Identical [0, 2) intervals: lane order follows (recipe, step) id.
        let steps = vec![
            timed("R2", "y", 2, 0),
            timed("R1", "x", 2, 0),
            timed("R1", "z", 2, 0),
        ];

        let outputs = assign_lanes(3, steps).unwrap();
        assert_eq!(lane_of(&outputs, "x"), 0);
        assert_eq!(lane_of(&outputs, "z"), 1);
        assert_eq!(lane_of(&outputs, "y"), 2);
    }

    #[test]
    fn test_deterministic_regardless_of_input_order() {
        let forward = vec![
            timed("R1", "a", 2, 0),
            timed("R2", "b", 3, 1),
            timed("R3", "c", 2, 2),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let mut first = assign_lanes(2, forward).unwrap();
        let mut second = assign_lanes(2, reversed).unwrap();
        first.sort_by(|a, b| a.step_id.cmp(&b.step_id));
        second.sort_by(|a, b| a.step_id.cmp(&b.step_id));

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.step_id, b.step_id);
            assert_eq!(a.lane, b.lane);
        }
    }

    #[test]
    fn test_overflow_is_an_error() {
        // Three concurrent steps on capacity 2.
        let steps = vec![
            timed("R1", "a", 4, 0),
            timed("R2", "b", 4, 0),
            timed("R3", "c", 4, 1),
        ];

        let err = assign_lanes(2, steps).unwrap_err();
        match err {
            ScheduleError::LaneOverflow {
                resource_id,
                step_id,
            } => {
                assert_eq!(resource_id, "M");
                assert_eq!(step_id, "c");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_touching_intervals_share_a_lane() {
        let steps = vec![timed("R1", "a", 2, 0), timed("R2", "b", 2, 2)];
        let outputs = assign_lanes(2, steps).unwrap();
        assert_eq!(lane_of(&outputs, "a"), 0);
        assert_eq!(lane_of(&outputs, "b"), 0);
    }

    #[test]
    fn test_zero_duration_step_does_not_block_its_lane() {
        let steps = vec![timed("R1", "flash", 0, 1), timed("R2", "long", 5, 1)];
        let outputs = assign_lanes(2, steps).unwrap();
        // The zero-duration step ends at its own start, so the long step
        // still fits in lane 0 behind it.
        assert_eq!(lane_of(&outputs, "flash"), 0);
        assert_eq!(lane_of(&outputs, "long"), 0);
    }

    #[test]
    fn test_empty_input() {
        let outputs = assign_lanes(2, Vec::new()).unwrap();
        assert!(outputs.is_empty());
    }
}
