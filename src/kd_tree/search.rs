//! Exact searches over a [`KdTree`]: nearest neighbor, k nearest neighbors and radius queries.
//!
//! Every search runs the same traversal. It descends from the root to a leaf, following the
//! side of each split the goal falls on, then climbs back through the parent handles. At each
//! ancestor the ancestor's own point is offered as a candidate, and the opposite subtree is
//! searched (again by descent and climb, confined to that subtree) only when the splitting
//! hyperplane is close enough to the goal to possibly hold a better candidate. Nested subtree
//! searches live on an explicit frame stack.

use std::cmp::Ordering;

use num_traits::AsPrimitive;
use ordered_float::OrderedFloat;

use super::{KdTree, NodeId};
use crate::common_types::{Coordinate, NearestResult, first_incomparable_axis};
use crate::error::KdTreeError;
use crate::heap_utils::KBestNeighbors;
use crate::metric::{axis_distance, squared_euclidean};

/// Collects candidates during a traversal and decides which subtrees are worth visiting.
///
/// Distances are `None` when they do not fit in the coordinate type; such a distance is
/// farther than every representable one.
trait CandidateSink<T> {
    fn offer(&mut self, node: NodeId, squared_distance: Option<T>);

    /// Whether a subtree whose splitting hyperplane lies `plane_squared_distance` away from the
    /// goal could still hold a candidate this sink would accept.
    fn must_explore(&self, plane_squared_distance: Option<T>) -> bool;
}

/// Single best candidate. Only strict improvements replace it, so the earliest wins ties.
struct BestSoFar<T> {
    best: Option<(NodeId, T)>,
}

impl<T: Coordinate> CandidateSink<T> for BestSoFar<T> {
    fn offer(&mut self, node: NodeId, squared_distance: Option<T>) {
        let Some(squared_distance) = squared_distance else {
            return;
        };
        match self.best {
            Some((_, best_distance)) if squared_distance >= best_distance => {}
            _ => self.best = Some((node, squared_distance)),
        }
    }

    fn must_explore(&self, plane_squared_distance: Option<T>) -> bool {
        match self.best {
            None => true,
            Some((_, best_distance)) => plane_squared_distance.is_some_and(|plane| plane < best_distance),
        }
    }
}

/// Heap key for a squared distance. The `f64` image orders most pairs; the exact value settles
/// pairs whose images collide, which happens for integer distances above 2^53.
#[derive(Debug, Clone, Copy)]
struct DistanceKey<T> {
    approximate: OrderedFloat<f64>,
    exact: T,
}

impl<T: Coordinate> DistanceKey<T> {
    fn new(exact: T) -> Self {
        DistanceKey { approximate: OrderedFloat(exact.as_()), exact }
    }
}

impl<T: Coordinate> PartialEq for DistanceKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl<T: Coordinate> Eq for DistanceKey<T> {}

impl<T: Coordinate> PartialOrd for DistanceKey<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Coordinate> Ord for DistanceKey<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Distances are never NaN, so the exact comparison always succeeds.
        self.approximate
            .cmp(&other.approximate)
            .then_with(|| self.exact.partial_cmp(&other.exact).unwrap_or(Ordering::Equal))
    }
}

/// The `n` best candidates.
struct NBest<T> {
    heap: KBestNeighbors<DistanceKey<T>, NodeId>,
}

impl<T: Coordinate> CandidateSink<T> for NBest<T> {
    fn offer(&mut self, node: NodeId, squared_distance: Option<T>) {
        if let Some(squared_distance) = squared_distance {
            self.heap.add(DistanceKey::new(squared_distance), node);
        }
    }

    fn must_explore(&self, plane_squared_distance: Option<T>) -> bool {
        match self.heap.current_farthest_distance() {
            None => true,
            Some(farthest) => plane_squared_distance.is_some_and(|plane| plane < farthest.exact),
        }
    }
}

/// Every candidate within a fixed squared radius (boundary included).
struct WithinRadius<T> {
    radius_squared: T,
    found: Vec<(NodeId, T)>,
}

impl<T: Coordinate> CandidateSink<T> for WithinRadius<T> {
    fn offer(&mut self, node: NodeId, squared_distance: Option<T>) {
        match squared_distance {
            Some(squared_distance) if squared_distance <= self.radius_squared => {
                self.found.push((node, squared_distance));
            }
            _ => {}
        }
    }

    fn must_explore(&self, plane_squared_distance: Option<T>) -> bool {
        plane_squared_distance.is_some_and(|plane| plane <= self.radius_squared)
    }
}

/// A descent-and-climb in progress inside the subtree rooted at `subtree_root`.
/// `node` has already been offered; `depth` is its depth in the whole tree.
#[derive(Debug, Clone, Copy)]
struct Frame {
    subtree_root: NodeId,
    node: NodeId,
    depth: usize,
}

impl<T: Coordinate> KdTree<T> {
    /// Finds the stored point closest to `goal` by squared Euclidean distance.
    ///
    /// When several points are equally close, the one discovered first wins; the leaf reached by
    /// the initial descent takes priority over later discoveries.
    ///
    /// Fails with [`KdTreeError::DistanceOverflow`] when no stored point's squared distance
    /// fits in `T`. Points whose distance overflows are never returned while another fits.
    pub fn nearest(&self, goal: &[T]) -> Result<NearestResult<T>, KdTreeError> {
        let (root, k_dimensions) = self.check_goal(goal)?;
        let mut sink = BestSoFar { best: None };
        self.traverse(root, goal, k_dimensions, &mut sink);

        let (node, squared_distance) = sink.best.ok_or(KdTreeError::DistanceOverflow)?;
        Ok(self.to_result(node, squared_distance))
    }

    /// Finds the `n_neighbors` stored points closest to `goal`, closest first.
    ///
    /// Returns every point when `n_neighbors` exceeds the tree size and nothing when it is 0.
    /// Results are ordered by exact squared distance, including integer distances too large
    /// for an `f64` to tell apart. Equal distances keep discovery order.
    ///
    /// Fails with [`KdTreeError::DistanceOverflow`] when fewer than `n_neighbors` (or fewer
    /// than all) points have a squared distance that fits in `T`.
    pub fn k_nearest(&self, goal: &[T], n_neighbors: usize) -> Result<Vec<NearestResult<T>>, KdTreeError> {
        let (root, k_dimensions) = self.check_goal(goal)?;
        if n_neighbors == 0 {
            return Ok(Vec::new());
        }

        let mut sink = NBest { heap: KBestNeighbors::new(n_neighbors.min(self.len())) };
        self.traverse(root, goal, k_dimensions, &mut sink);
        if !sink.heap.is_full() {
            return Err(KdTreeError::DistanceOverflow);
        }
        Ok(sink
            .heap
            .into_sorted_elements()
            .into_iter()
            .map(|elem| self.to_result(elem.data, elem.distance.exact))
            .collect())
    }

    /// Finds every stored point whose squared distance to `goal` is at most `radius_squared`,
    /// closest first (ties in discovery order). A negative radius matches nothing, and points
    /// whose squared distance does not fit in `T` are always outside the radius.
    pub fn within_radius(&self, goal: &[T], radius_squared: T) -> Result<Vec<NearestResult<T>>, KdTreeError> {
        let (root, k_dimensions) = self.check_goal(goal)?;
        if radius_squared < T::zero() {
            return Ok(Vec::new());
        }

        let mut sink = WithinRadius { radius_squared, found: Vec::new() };
        self.traverse(root, goal, k_dimensions, &mut sink);

        let mut found = sink.found;
        // Stable sort keeps discovery order among equal distances.
        found.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        Ok(found
            .into_iter()
            .map(|(node, squared_distance)| self.to_result(node, squared_distance))
            .collect())
    }

    /// Validates `goal` against the tree, returning the root and the dimensionality.
    fn check_goal(&self, goal: &[T]) -> Result<(NodeId, usize), KdTreeError> {
        let (root, k_dimensions) = match (self.root, self.dimensions) {
            (Some(root), Some(k)) => (root, k),
            _ => return Err(KdTreeError::EmptyTree),
        };
        if goal.len() != k_dimensions {
            return Err(KdTreeError::DimensionMismatch { expected: k_dimensions, found: goal.len() });
        }
        if let Some(axis) = first_incomparable_axis(goal) {
            return Err(KdTreeError::IncomparableCoordinate { point_index: None, axis });
        }
        Ok((root, k_dimensions))
    }

    fn to_result(&self, node: NodeId, squared_distance: T) -> NearestResult<T> {
        NearestResult::new(self.node(node).point.clone(), squared_distance)
    }

    /// Runs the descend-then-backtrack search over the subtree rooted at `root` (depth 0).
    fn traverse<S: CandidateSink<T>>(&self, root: NodeId, goal: &[T], k_dimensions: usize, sink: &mut S) {
        let mut frames = vec![self.descend(root, 0, goal, k_dimensions, sink)];

        while let Some(frame) = frames.last_mut() {
            if frame.node == frame.subtree_root {
                frames.pop();
                continue;
            }
            let arrived_from = frame.node;
            let Some(ancestor) = self.node(arrived_from).parent else {
                frames.pop();
                continue;
            };
            let depth = frame.depth - 1;
            frame.node = ancestor;
            frame.depth = depth;

            let ancestor_node = self.node(ancestor);
            sink.offer(ancestor, squared_euclidean(goal, &ancestor_node.point));

            let opposite = if ancestor_node.left == Some(arrived_from) {
                ancestor_node.right
            } else {
                ancestor_node.left
            };
            let Some(opposite) = opposite else {
                continue;
            };

            let splitting_dimension = depth % k_dimensions;
            let plane_squared_distance = axis_distance(goal[splitting_dimension], ancestor_node.point[splitting_dimension])
                .and_then(|plane_distance| plane_distance.try_mul(plane_distance));
            if sink.must_explore(plane_squared_distance) {
                let nested = self.descend(opposite, depth + 1, goal, k_dimensions, sink);
                frames.push(nested);
            }
        }
    }

    /// Descends from `start` to a leaf, preferring the side of each split the goal lies on and
    /// taking the other child when the preferred one is absent. Offers the leaf to `sink`.
    fn descend<S: CandidateSink<T>>(
        &self,
        start: NodeId,
        start_depth: usize,
        goal: &[T],
        k_dimensions: usize,
        sink: &mut S,
    ) -> Frame {
        let mut node = start;
        let mut depth = start_depth;
        loop {
            let current = self.node(node);
            let splitting_dimension = depth % k_dimensions;
            let (preferred, other) = if goal[splitting_dimension] < current.point[splitting_dimension] {
                (current.left, current.right)
            } else {
                (current.right, current.left)
            };
            match preferred.or(other) {
                Some(next) => {
                    node = next;
                    depth += 1;
                }
                None => break,
            }
        }

        sink.offer(node, squared_euclidean(goal, &self.node(node).point));
        Frame { subtree_root: start, node, depth }
    }
}
