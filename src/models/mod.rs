//! Scheduling domain models.
//!
//! Core data types for recipe scheduling problems and their solutions.
//!
//! # Domain Mappings
//!
//! | laneplan | Manufacturing | Batch Processing | Kitchen |
//! |----------|---------------|------------------|---------|
//! | Recipe | Job/Order | Batch | Dish |
//! | RecipeStep | Operation | Phase | Cooking Step |
//! | Resource | Machine | Vessel | Station/Oven |
//! | Lane | — | Vessel Slot | Burner |

mod recipe;
mod resource;
mod schedule;

pub use recipe::{Recipe, RecipeStep};
pub use resource::Resource;
pub use schedule::{ResourceInfo, SolvedSchedule, StepOutput};
