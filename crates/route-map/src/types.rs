//! Route and vehicle position types

use serde::{Deserialize, Serialize};

/// One point of the fixed route, identified by its sequence position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Map-frame x coordinate (meters)
    pub x: f64,
    /// Map-frame y coordinate (meters)
    pub y: f64,
    /// Position within the route sequence
    pub index: usize,
}

impl Waypoint {
    /// Squared Euclidean distance to a point
    pub fn dist_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Current vehicle position
///
/// Updated asynchronously; may be stale relative to the latest camera frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
