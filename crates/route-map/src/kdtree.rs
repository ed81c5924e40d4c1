//! Static 2-d tree for nearest-waypoint queries

/// Nearest-neighbor capability over a fixed set of 2D points
///
/// The route is immutable once received, so implementations are built once
/// and never mutated. Queries must return the exact Euclidean nearest
/// neighbor, with ties broken by the lowest point index.
pub trait SpatialIndex {
    /// Number of indexed points
    fn len(&self) -> usize;

    /// Check if the index holds no points
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the closest point to (x, y), or `None` for an empty index
    fn nearest(&self, x: f64, y: f64) -> Option<usize>;
}

/// One tree node, stored in a flat arena
#[derive(Debug, Clone)]
struct Node {
    x: f64,
    y: f64,
    /// Index of this point in the original input sequence
    item: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Balanced 2-d tree over a fixed point set
///
/// Built by median split on alternating axes, so lookups are O(log n)
/// expected on route-shaped data.
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl KdTree {
    /// Build the tree from a sequence of (x, y) positions
    ///
    /// The position of each point in `points` becomes its query result
    /// index. An empty slice builds a degenerate tree whose `nearest`
    /// always returns `None`.
    pub fn build(points: &[(f64, f64)]) -> Self {
        let mut items: Vec<(f64, f64, usize)> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| (x, y, i))
            .collect();

        let mut nodes = Vec::with_capacity(points.len());
        let root = Self::build_subtree(&mut items, 0, &mut nodes);
        Self { nodes, root }
    }

    fn build_subtree(
        items: &mut [(f64, f64, usize)],
        depth: usize,
        nodes: &mut Vec<Node>,
    ) -> Option<usize> {
        if items.is_empty() {
            return None;
        }

        // Split on x at even depths, y at odd depths
        items.sort_unstable_by(|a, b| {
            let (ka, kb) = if depth % 2 == 0 { (a.0, b.0) } else { (a.1, b.1) };
            ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = items.len() / 2;
        let (x, y, item) = items[mid];
        let (lower, rest) = items.split_at_mut(mid);
        let upper = &mut rest[1..];

        let left = Self::build_subtree(lower, depth + 1, nodes);
        let right = Self::build_subtree(upper, depth + 1, nodes);

        let id = nodes.len();
        nodes.push(Node { x, y, item, left, right });
        Some(id)
    }

    fn search(&self, node_id: usize, depth: usize, qx: f64, qy: f64, best: &mut Option<(f64, usize)>) {
        let node = &self.nodes[node_id];
        let d_sq = {
            let dx = node.x - qx;
            let dy = node.y - qy;
            dx * dx + dy * dy
        };

        let improves = match *best {
            None => true,
            Some((best_sq, best_item)) => {
                d_sq < best_sq || (d_sq == best_sq && node.item < best_item)
            }
        };
        if improves {
            *best = Some((d_sq, node.item));
        }

        let plane_delta = if depth % 2 == 0 { qx - node.x } else { qy - node.y };
        let (near, far) = if plane_delta < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = near {
            self.search(child, depth + 1, qx, qy, best);
        }
        if let Some(child) = far {
            // The far side can still hold the nearest point (or an
            // equal-distance point with a lower index) when the splitting
            // plane is within the current best radius.
            let within = match *best {
                None => true,
                Some((best_sq, _)) => plane_delta * plane_delta <= best_sq,
            };
            if within {
                self.search(child, depth + 1, qx, qy, best);
            }
        }
    }
}

impl SpatialIndex for KdTree {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn nearest(&self, x: f64, y: f64) -> Option<usize> {
        let root = self.root?;
        let mut best = None;
        self.search(root, 0, x, y, &mut best);
        best.map(|(_, item)| item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Reference implementation: linear scan with the same tie rule
    fn brute_force(points: &[(f64, f64)], x: f64, y: f64) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;
        for (i, &(px, py)) in points.iter().enumerate() {
            let d_sq = (px - x).powi(2) + (py - y).powi(2);
            match best {
                Some((bd, _)) if d_sq >= bd => {}
                _ => best = Some((d_sq, i)),
            }
        }
        best.map(|(_, i)| i)
    }

    #[test]
    fn test_empty_tree_returns_none() {
        let tree = KdTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.nearest(0.0, 0.0), None);
    }

    #[test]
    fn test_single_point() {
        let tree = KdTree::build(&[(3.0, 4.0)]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nearest(0.0, 0.0), Some(0));
        assert_eq!(tree.nearest(100.0, -7.0), Some(0));
    }

    #[test]
    fn test_exact_nearest_on_loop() {
        // Ten waypoints on a rough loop
        let points: Vec<(f64, f64)> = (0..10)
            .map(|i| {
                let theta = i as f64 * std::f64::consts::TAU / 10.0;
                (100.0 * theta.cos(), 100.0 * theta.sin())
            })
            .collect();
        let tree = KdTree::build(&points);

        for (i, &(px, py)) in points.iter().enumerate() {
            assert_eq!(tree.nearest(px + 0.1, py - 0.1), Some(i));
        }
    }

    #[test]
    fn test_tie_breaks_to_lowest_index() {
        // Two points equidistant from the query
        let points = vec![(0.0, 1.0), (0.0, -1.0), (5.0, 5.0)];
        let tree = KdTree::build(&points);
        assert_eq!(tree.nearest(0.0, 0.0), Some(0));

        // Duplicate positions: still the lowest index
        let points = vec![(2.0, 2.0), (1.0, 1.0), (1.0, 1.0)];
        let tree = KdTree::build(&points);
        assert_eq!(tree.nearest(1.0, 1.0), Some(1));
    }

    proptest! {
        #[test]
        fn prop_matches_brute_force(
            points in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..64),
            qx in -600.0f64..600.0,
            qy in -600.0f64..600.0,
        ) {
            let tree = KdTree::build(&points);
            prop_assert_eq!(tree.nearest(qx, qy), brute_force(&points, qx, qy));
        }
    }
}
