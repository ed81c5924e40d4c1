//! Route Map
//!
//! Immutable view of the vehicle's fixed route:
//! - Ordered waypoint sequence (index position is the unit of distance)
//! - Spatial nearest-waypoint index, built once per route
//! - Circular forward distance between route positions

pub mod geometry;
pub mod kdtree;
pub mod types;

pub use geometry::RouteGeometry;
pub use kdtree::{KdTree, SpatialIndex};
pub use types::{Pose, Waypoint};

use thiserror::Error;

/// Route map error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Route has no waypoints")]
    EmptyRoute,
}

/// The fixed route with its spatial index
///
/// Built once when the route is first received; the waypoint sequence is
/// never reordered or resized afterwards, which keeps both the index and
/// circular-distance arithmetic valid.
pub struct RouteMap {
    waypoints: Vec<Waypoint>,
    index: KdTree,
    geometry: RouteGeometry,
}

impl RouteMap {
    /// Build a route map from ordered (x, y) positions
    pub fn from_positions(positions: &[(f64, f64)]) -> Result<Self, RouteError> {
        let geometry = RouteGeometry::new(positions.len())?;
        let waypoints = positions
            .iter()
            .enumerate()
            .map(|(index, &(x, y))| Waypoint { x, y, index })
            .collect();

        Ok(Self {
            waypoints,
            index: KdTree::build(positions),
            geometry,
        })
    }

    /// Number of waypoints in the route
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The ordered waypoint sequence
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Index of the waypoint closest to (x, y)
    pub fn nearest_waypoint(&self, x: f64, y: f64) -> Option<usize> {
        self.index.nearest(x, y)
    }

    /// Waypoints travelled going forward from `from` to `to`, wrapping at
    /// the route's end
    pub fn forward_distance(&self, from: usize, to: usize) -> usize {
        self.geometry.circular_forward_distance(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loop_route(n: usize) -> Vec<(f64, f64)> {
        (0..n)
            .map(|i| {
                let theta = i as f64 * std::f64::consts::TAU / n as f64;
                (50.0 * theta.cos(), 50.0 * theta.sin())
            })
            .collect()
    }

    #[test]
    fn test_empty_positions_rejected() {
        assert!(matches!(
            RouteMap::from_positions(&[]),
            Err(RouteError::EmptyRoute)
        ));
    }

    #[test]
    fn test_waypoints_keep_sequence_order() {
        let map = RouteMap::from_positions(&loop_route(10)).unwrap();
        assert_eq!(map.len(), 10);
        for (i, wp) in map.waypoints().iter().enumerate() {
            assert_eq!(wp.index, i);
        }
    }

    #[test]
    fn test_nearest_and_forward_distance() {
        let positions = loop_route(10);
        let map = RouteMap::from_positions(&positions).unwrap();

        let (x, y) = positions[7];
        assert_eq!(map.nearest_waypoint(x + 0.5, y), Some(7));
        assert_eq!(map.forward_distance(2, 7), 5);
        assert_eq!(map.forward_distance(8, 7), 9);
    }
}
