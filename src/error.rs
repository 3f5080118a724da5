//! Error types for building and querying k-d trees.

use thiserror::Error;

/// Errors reported by tree construction and search.
///
/// Building from an empty point set is not an error: it yields an empty tree, and only
/// querying that tree fails with [`KdTreeError::EmptyTree`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KdTreeError {
    /// The tree has no root, so there is nothing to search.
    #[error("cannot search an empty tree")]
    EmptyTree,

    /// A point's coordinate count differs from the tree's dimensionality.
    #[error("dimension mismatch: expected {expected} coordinates, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// The points carry no coordinates at all, so no split dimension exists.
    #[error("points must have at least one coordinate")]
    ZeroDimensional,

    /// A coordinate does not compare equal to itself (a float NaN).
    /// `point_index` is `None` when the offending point is a query goal.
    #[error("coordinate on axis {axis} of point {point_index:?} is not comparable")]
    IncomparableCoordinate { point_index: Option<usize>, axis: usize },

    /// No candidate, or fewer than the requested number, has a squared distance to the goal
    /// that fits in the coordinate type.
    #[error("squared distance to the goal overflows the coordinate type")]
    DistanceOverflow,
}

#[cfg(test)]
mod tests {
    use super::KdTreeError;

    #[test]
    fn test_display_messages() {
        assert_eq!(KdTreeError::EmptyTree.to_string(), "cannot search an empty tree");
        assert_eq!(
            KdTreeError::DimensionMismatch { expected: 2, found: 3 }.to_string(),
            "dimension mismatch: expected 2 coordinates, found 3"
        );
        assert_eq!(
            KdTreeError::IncomparableCoordinate { point_index: Some(4), axis: 1 }.to_string(),
            "coordinate on axis 1 of point Some(4) is not comparable"
        );
        assert_eq!(
            KdTreeError::DistanceOverflow.to_string(),
            "squared distance to the goal overflows the coordinate type"
        );
    }
}
