//! Input validation for scheduling requests.
//!
//! Checks structural integrity of recipes and resources before any
//! model construction. Detects:
//! - Duplicate IDs
//! - Missing resource references
//! - Empty recipes and empty input lists
//! - Invalid capacities and durations

use crate::models::{Recipe, Resource};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A step references a resource that doesn't exist.
    InvalidResourceReference,
    /// A recipe has no steps, or the recipe/resource list is empty.
    EmptyInput,
    /// A resource has capacity < 1.
    InvalidCapacity,
    /// A step has a negative duration.
    InvalidDuration,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a scheduling request.
///
/// Checks:
/// 1. Non-empty recipe and resource lists
/// 2. No duplicate recipe IDs
/// 3. No duplicate step IDs (across all recipes)
/// 4. No duplicate resource IDs
/// 5. All recipes have at least one step
/// 6. All step resource references point to existing resources
/// 7. All capacities are ≥ 1, all durations are ≥ 0
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(recipes: &[Recipe], resources: &[Resource]) -> ValidationResult {
    let mut errors = Vec::new();

    if recipes.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "Recipe list is empty",
        ));
    }
    if resources.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "Resource list is empty",
        ));
    }

    // Collect resource IDs
    let mut resource_ids = HashSet::new();
    for r in resources {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", r.id),
            ));
        }
        if r.capacity < 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Resource '{}' has capacity {} (must be ≥ 1)", r.id, r.capacity),
            ));
        }
    }

    // Collect recipe and step IDs
    let mut recipe_ids = HashSet::new();
    let mut step_ids = HashSet::new();

    for recipe in recipes {
        if !recipe_ids.insert(recipe.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate recipe ID: {}", recipe.id),
            ));
        }

        if recipe.steps.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyInput,
                format!("Recipe '{}' has no steps", recipe.id),
            ));
        }

        for step in &recipe.steps {
            if !step_ids.insert(step.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate step ID: {}", step.id),
                ));
            }
            if step.duration_ms < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDuration,
                    format!(
                        "Step '{}' has negative duration {}",
                        step.id, step.duration_ms
                    ),
                ));
            }
        }
    }

    // Check resource references
    for recipe in recipes {
        for step in &recipe.steps {
            if !resource_ids.contains(step.resource_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!(
                        "Step '{}' references unknown resource '{}'",
                        step.id, step.resource_id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
