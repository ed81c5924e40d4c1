//! Route-relative distance arithmetic

use crate::RouteError;

/// Forward-only distance between route positions
///
/// The vehicle loops the route, so distance is measured in the direction of
/// travel and wraps at the route's end back to its start. A target behind
/// the vehicle therefore scores almost a full loop, which deprioritizes it
/// against genuinely upcoming targets.
#[derive(Debug, Clone, Copy)]
pub struct RouteGeometry {
    len: usize,
}

impl RouteGeometry {
    /// Create geometry for a route of `len` waypoints
    pub fn new(len: usize) -> Result<Self, RouteError> {
        if len == 0 {
            return Err(RouteError::EmptyRoute);
        }
        Ok(Self { len })
    }

    /// Number of waypoints in the route
    pub fn len(&self) -> usize {
        self.len
    }

    /// Waypoints travelled going forward from `from` to `to`
    ///
    /// Always in `[0, len)`. Both indices must be valid route positions.
    pub fn circular_forward_distance(&self, from: usize, to: usize) -> usize {
        debug_assert!(from < self.len && to < self.len);
        (to + self.len - from) % self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_empty_route() {
        assert!(RouteGeometry::new(0).is_err());
    }

    #[test]
    fn test_forward_distance() {
        let geom = RouteGeometry::new(10).unwrap();
        assert_eq!(geom.circular_forward_distance(2, 7), 5);
        assert_eq!(geom.circular_forward_distance(7, 2), 5);
        assert_eq!(geom.circular_forward_distance(9, 0), 1);
        // A target just behind wraps to nearly a full loop
        assert_eq!(geom.circular_forward_distance(8, 7), 9);
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(len in 1usize..1000, a in 0usize..1000) {
            let geom = RouteGeometry::new(len).unwrap();
            let a = a % len;
            prop_assert_eq!(geom.circular_forward_distance(a, a), 0);
        }

        #[test]
        fn prop_distance_within_route_length(
            len in 1usize..1000,
            a in 0usize..1000,
            b in 0usize..1000,
        ) {
            let geom = RouteGeometry::new(len).unwrap();
            let d = geom.circular_forward_distance(a % len, b % len);
            prop_assert!(d < len);
        }
    }
}
