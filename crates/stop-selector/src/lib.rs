//! Stop Selector
//!
//! Finds the nearest *upcoming* stop line for the vehicle: resolves the
//! vehicle and every configured stop line to their closest route
//! waypoints, then picks the stop line with the smallest circular forward
//! distance. Stop lines already passed on this loop wrap to nearly a full
//! loop and lose to genuinely upcoming ones.

use route_map::{Pose, RouteMap};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configured stop-line position for one intersection
///
/// The stop-line list is static configuration, index-aligned 1:1 with the
/// externally reported traffic-light list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLine {
    pub x: f64,
    pub y: f64,
}

impl StopLine {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for StopLine {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Result of a stop-line selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Index into the stop-line (and traffic-light) list
    pub stop_line: usize,
    /// Route waypoint closest to the selected stop line
    pub waypoint: usize,
}

/// Nearest-upcoming-stop-line selector
///
/// Route and stop lines are both immutable once configured, so each stop
/// line's closest waypoint is resolved once at construction.
pub struct StopSelector {
    stop_lines: Vec<StopLine>,
    line_waypoints: Vec<usize>,
}

impl StopSelector {
    /// Create a selector for a fixed route and stop-line configuration
    pub fn new(stop_lines: Vec<StopLine>, route: &RouteMap) -> Self {
        // RouteMap guarantees at least one waypoint, so nearest always
        // resolves
        let line_waypoints = stop_lines
            .iter()
            .map(|line| route.nearest_waypoint(line.x, line.y).unwrap_or(0))
            .collect();

        Self {
            stop_lines,
            line_waypoints,
        }
    }

    /// Number of configured stop lines
    pub fn len(&self) -> usize {
        self.stop_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stop_lines.is_empty()
    }

    /// The configured stop lines
    pub fn stop_lines(&self) -> &[StopLine] {
        &self.stop_lines
    }

    /// Select the nearest upcoming stop line for the given pose
    ///
    /// Returns `None` with no stop lines configured. Deterministic: the
    /// scan starts with a bound of one full loop and only a strictly
    /// closer candidate wins, so distance ties resolve to the lowest
    /// stop-line index.
    pub fn select(&self, route: &RouteMap, pose: &Pose) -> Option<Selection> {
        let car_waypoint = route.nearest_waypoint(pose.x, pose.y)?;

        let mut best = None;
        let mut min_dist = route.len();
        for (i, &line_waypoint) in self.line_waypoints.iter().enumerate() {
            let dist = route.forward_distance(car_waypoint, line_waypoint);
            if dist < min_dist {
                min_dist = dist;
                best = Some(Selection {
                    stop_line: i,
                    waypoint: line_waypoint,
                });
            }
        }

        if let Some(sel) = best {
            debug!(
                "Car at waypoint {}, stop line {} at waypoint {} ({} ahead)",
                car_waypoint, sel.stop_line, sel.waypoint, min_dist
            );
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ten waypoints evenly spaced on a circle
    fn loop_route() -> RouteMap {
        let positions: Vec<(f64, f64)> = (0..10)
            .map(|i| {
                let theta = i as f64 * std::f64::consts::TAU / 10.0;
                (100.0 * theta.cos(), 100.0 * theta.sin())
            })
            .collect();
        RouteMap::from_positions(&positions).unwrap()
    }

    fn pose_at(route: &RouteMap, index: usize) -> Pose {
        let wp = route.waypoints()[index];
        Pose::new(wp.x, wp.y)
    }

    fn line_at(route: &RouteMap, index: usize) -> StopLine {
        let wp = route.waypoints()[index];
        StopLine::new(wp.x + 0.5, wp.y - 0.5)
    }

    #[test]
    fn test_selects_upcoming_stop_line() {
        let route = loop_route();
        let selector = StopSelector::new(vec![line_at(&route, 7)], &route);

        let sel = selector.select(&route, &pose_at(&route, 2)).unwrap();
        assert_eq!(sel.stop_line, 0);
        assert_eq!(sel.waypoint, 7);
    }

    #[test]
    fn test_passed_stop_line_scores_nearly_full_loop() {
        let route = loop_route();
        let selector =
            StopSelector::new(vec![line_at(&route, 7), line_at(&route, 0)], &route);

        // Car at 8: line 7 is 9 waypoints away around the loop, line 0
        // only 2 ahead
        let sel = selector.select(&route, &pose_at(&route, 8)).unwrap();
        assert_eq!(sel.stop_line, 1);
        assert_eq!(sel.waypoint, 0);
    }

    #[test]
    fn test_passed_stop_line_still_returned_as_only_option() {
        let route = loop_route();
        let selector = StopSelector::new(vec![line_at(&route, 7)], &route);

        let sel = selector.select(&route, &pose_at(&route, 8)).unwrap();
        assert_eq!(sel.waypoint, 7);
    }

    #[test]
    fn test_distance_tie_takes_lowest_stop_line_index() {
        let route = loop_route();
        // Both lines resolve to waypoint 5
        let selector =
            StopSelector::new(vec![line_at(&route, 5), line_at(&route, 5)], &route);

        let sel = selector.select(&route, &pose_at(&route, 1)).unwrap();
        assert_eq!(sel.stop_line, 0);
    }

    #[test]
    fn test_empty_stop_lines_yield_no_selection() {
        let route = loop_route();
        let selector = StopSelector::new(vec![], &route);
        assert!(selector.select(&route, &pose_at(&route, 2)).is_none());
    }

    #[test]
    fn test_selection_is_deterministic() {
        let route = loop_route();
        let selector =
            StopSelector::new(vec![line_at(&route, 3), line_at(&route, 7)], &route);
        let pose = pose_at(&route, 2);

        let first = selector.select(&route, &pose);
        for _ in 0..10 {
            assert_eq!(selector.select(&route, &pose), first);
        }
    }
}
