//! Error types for the scheduling pipeline.

use thiserror::Error;

use crate::validation::ValidationError;

/// Failures reported by the scheduling pipeline.
///
/// `NoSolution` and `Timeout` are deliberately distinct so callers can
/// tell "provably impossible" from "gave up within the time budget".
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Malformed input, rejected before model construction.
    #[error("invalid input: {} ({} issue(s))", first_message(.0), .0.len())]
    Invalid(Vec<ValidationError>),

    /// The constraint model has no valid assignment.
    #[error("no solution found: the model is infeasible")]
    NoSolution,

    /// The solver exhausted its time budget without finding any solution.
    #[error("solver timed out before finding a solution")]
    Timeout,

    /// The solved schedule needs more lanes than the resource's capacity.
    ///
    /// This cannot happen if the solver honored the capacity constraint
    /// it was given; it indicates an internal defect, not a user error.
    #[error("lane assignment overflow on resource '{resource_id}' at step '{step_id}': \
             solved schedule violates the capacity it was solved under")]
    LaneOverflow {
        resource_id: String,
        step_id: String,
    },

    /// Internal defect (should not occur in normal operation).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for scheduling operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("none")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_display_carries_first_message() {
        let err = ScheduleError::Invalid(vec![ValidationError {
            kind: ValidationErrorKind::EmptyInput,
            message: "Recipe list is empty".into(),
        }]);
        let text = err.to_string();
        assert!(text.contains("Recipe list is empty"));
        assert!(text.contains("1 issue"));
    }

    #[test]
    fn test_lane_overflow_names_resource_and_step() {
        let err = ScheduleError::LaneOverflow {
            resource_id: "M2".into(),
            step_id: "S4".into(),
        };
        let text = err.to_string();
        assert!(text.contains("M2"));
        assert!(text.contains("S4"));
    }
}
