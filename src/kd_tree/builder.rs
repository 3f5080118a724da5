//! Median-split construction of a [`KdTree`].

use log::{debug, trace};

use super::{KdTree, NodeId, Side, TreeNode};
use crate::common_types::{Coordinate, first_incomparable_axis};
use crate::error::KdTreeError;
use crate::median::median_value;

/// Summary of a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub nodes: usize,
    pub height: usize,
    /// Steps whose whole subset shared the split value. Each such step still consumes one
    /// point, so the remaining points form a chain instead of a balanced subtree.
    pub degenerate_splits: usize,
}

/// A subset of points waiting to become a subtree.
struct PendingSubset<T> {
    points: Vec<Vec<T>>,
    depth: usize,
    parent: Option<(NodeId, Side)>,
}

/// Result of splitting one subset around its median value.
struct MedianSplit<T> {
    point: Vec<T>,
    left: Vec<Vec<T>>,
    right: Vec<Vec<T>>,
}

impl<T: Coordinate> KdTree<T> {
    /// Builds a tree from `points`, rotating the split axis with depth.
    ///
    /// An empty input yields an empty tree. All points must share the dimensionality of the
    /// first one, which must be at least 1.
    pub fn build(points: Vec<Vec<T>>) -> Result<Self, KdTreeError> {
        Self::build_with_stats(points).map(|(tree, _)| tree)
    }

    /// Same as [`KdTree::build`], also reporting the shape of the result.
    pub fn build_with_stats(points: Vec<Vec<T>>) -> Result<(Self, BuildStats), KdTreeError> {
        let Some(k_dimensions) = validate_points(&points)? else {
            return Ok((KdTree::empty(), BuildStats::default()));
        };

        let mut nodes: Vec<TreeNode<T>> = Vec::with_capacity(points.len());
        let mut stats = BuildStats::default();
        let mut pending = vec![PendingSubset { points, depth: 0, parent: None }];

        while let Some(PendingSubset { points, depth, parent }) = pending.pop() {
            let splitting_dimension = depth % k_dimensions;
            let subset_len = points.len();
            let split = split_at_median(points, splitting_dimension)?;

            if subset_len > 1 && split.left.is_empty() && split.right.len() + 1 == subset_len {
                let shares_value = split
                    .right
                    .iter()
                    .all(|p| p[splitting_dimension] == split.point[splitting_dimension]);
                if shares_value {
                    stats.degenerate_splits += 1;
                    trace!(
                        "Degenerate split at depth {}: {} points share value {:?} on axis {}",
                        depth, subset_len, split.point[splitting_dimension], splitting_dimension
                    );
                }
            }

            // The node is allocated before its children so they can record the back-reference.
            let id = NodeId(nodes.len());
            nodes.push(TreeNode {
                point: split.point,
                parent: parent.map(|(parent_id, _)| parent_id),
                left: None,
                right: None,
            });
            if let Some((parent_id, side)) = parent {
                let parent_node = &mut nodes[parent_id.0];
                match side {
                    Side::Left => parent_node.left = Some(id),
                    Side::Right => parent_node.right = Some(id),
                }
            }
            stats.height = stats.height.max(depth + 1);

            // Left is pushed last so it is built first.
            if !split.right.is_empty() {
                pending.push(PendingSubset { points: split.right, depth: depth + 1, parent: Some((id, Side::Right)) });
            }
            if !split.left.is_empty() {
                pending.push(PendingSubset { points: split.left, depth: depth + 1, parent: Some((id, Side::Left)) });
            }
        }

        stats.nodes = nodes.len();
        debug!(
            "Built k-d tree: {} nodes, {} dimensions, height {}, {} degenerate splits",
            stats.nodes, k_dimensions, stats.height, stats.degenerate_splits
        );

        let root = Some(NodeId(0));
        Ok((KdTree { nodes, root, dimensions: Some(k_dimensions) }, stats))
    }
}

/// Checks dimensionality and comparability of every point.
/// Returns the shared dimensionality, or `None` when there are no points.
pub(crate) fn validate_points<T: Coordinate>(points: &[Vec<T>]) -> Result<Option<usize>, KdTreeError> {
    let k = match points.first() {
        Some(p) => p.len(),
        None => return Ok(None),
    };
    if k == 0 {
        return Err(KdTreeError::ZeroDimensional);
    }

    for (point_index, p) in points.iter().enumerate() {
        if p.len() != k {
            return Err(KdTreeError::DimensionMismatch { expected: k, found: p.len() });
        }
        if let Some(axis) = first_incomparable_axis(p) {
            return Err(KdTreeError::IncomparableCoordinate { point_index: Some(point_index), axis });
        }
    }
    Ok(Some(k))
}

/// Splits `points` around the median value of `splitting_dimension`.
///
/// The first point (in input order) holding the median value becomes the node point. Points
/// below the median go left; points above it, and the remaining ties, go right. Assignment is
/// decided by each point's own value, never by its rank in the sorted column.
fn split_at_median<T: Coordinate>(
    points: Vec<Vec<T>>,
    splitting_dimension: usize,
) -> Result<MedianSplit<T>, KdTreeError> {
    let mut column: Vec<T> = points.iter().map(|p| p[splitting_dimension]).collect();
    let incomparable = KdTreeError::IncomparableCoordinate { point_index: None, axis: splitting_dimension };
    let median = median_value(&mut column).ok_or_else(|| incomparable.clone())?;

    let mut node_point: Option<Vec<T>> = None;
    let mut left = Vec::new();
    let mut right = Vec::new();
    for point in points {
        let value = point[splitting_dimension];
        if node_point.is_none() && value == median {
            node_point = Some(point);
        } else if value < median {
            left.push(point);
        } else {
            right.push(point);
        }
    }

    // The median is drawn from the column itself, so a match exists for comparable values.
    let point = node_point.ok_or(incomparable)?;
    Ok(MedianSplit { point, left, right })
}
