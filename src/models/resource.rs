//! Resource model.
//!
//! Resources are capacity-limited facilities that steps occupy: machines,
//! vessels, ovens, workers. Capacity 1 means mutually exclusive use;
//! capacity C > 1 allows up to C steps in progress at once.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

use serde::{Deserialize, Serialize};

/// A shared, capacity-limited resource.
///
/// Immutable for the duration of one scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Number of units usable simultaneously (default: 1, must be ≥ 1).
    pub capacity: i32,
}

impl Resource {
    /// Creates a new resource with capacity 1.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            capacity: 1,
        }
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether this resource admits concurrent use.
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.capacity > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let r = Resource::new("M1").with_capacity(3);
        assert_eq!(r.id, "M1");
        assert_eq!(r.capacity, 3);
        assert!(r.is_shared());
    }

    #[test]
    fn test_resource_default_capacity() {
        let r = Resource::new("M1");
        assert_eq!(r.capacity, 1);
        assert!(!r.is_shared());
    }

    #[test]
    fn test_resource_serde_round_trip() {
        let r = Resource::new("oven").with_capacity(2);
        let json = serde_json::to_string(&r).unwrap();
        let back: Resource = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "oven");
        assert_eq!(back.capacity, 2);
    }
}
