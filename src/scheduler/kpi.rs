//! Schedule quality metrics (KPIs).
//!
//! Computes performance indicators from a solved schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Avg Utilization | Mean resource busyness over the makespan |
//! | Concurrent Resources | Resources that needed more than one lane |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use crate::models::SolvedSchedule;

/// Schedule performance indicators.
///
/// All time values are in milliseconds.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time (ms).
    pub makespan_ms: i64,
    /// Average resource utilization over the makespan.
    /// Can exceed 1.0 for resources running several lanes at once.
    pub avg_utilization: f64,
    /// Per-resource utilization.
    pub utilization_by_resource: HashMap<String, f64>,
    /// Number of resources that actually ran steps concurrently.
    pub concurrent_resource_count: usize,
    /// Total busy time summed across all steps (ms).
    pub total_busy_ms: i64,
}

impl ScheduleKpi {
    /// Computes KPIs from a solved schedule.
    pub fn calculate(schedule: &SolvedSchedule) -> Self {
        let utilization_by_resource = schedule.all_utilizations();
        let avg_utilization = if utilization_by_resource.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_resource.values().sum();
            sum / utilization_by_resource.len() as f64
        };

        let concurrent_resource_count = schedule
            .resources
            .iter()
            .filter(|r| r.concurrent)
            .count();

        let total_busy_ms = schedule.steps.iter().map(|s| s.duration_ms).sum();

        Self {
            makespan_ms: schedule.makespan_ms,
            avg_utilization,
            utilization_by_resource,
            concurrent_resource_count,
            total_busy_ms,
        }
    }
}
