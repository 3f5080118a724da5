//! Linear-scan searches over a plain point set.
//!
//! Used by [`crate::index::NearestNeighborIndex`] for small inputs and as the reference the
//! tree searches are checked against. Results follow the same conventions as the tree: squared
//! distances, closest first, and the earliest point wins ties. Every query validates the whole
//! point set first, so a mixed-dimension set is rejected rather than scanned.

use crate::common_types::{Coordinate, NearestResult, first_incomparable_axis};
use crate::error::KdTreeError;
use crate::kd_tree::builder::validate_points;
use crate::metric::squared_euclidean;
use std::cmp::Ordering;

fn check_goal<T: Coordinate>(points: &[Vec<T>], goal: &[T]) -> Result<(), KdTreeError> {
    let k_dimensions = validate_points(points)?.ok_or(KdTreeError::EmptyTree)?;
    if goal.len() != k_dimensions {
        return Err(KdTreeError::DimensionMismatch { expected: k_dimensions, found: goal.len() });
    }
    if let Some(axis) = first_incomparable_axis(goal) {
        return Err(KdTreeError::IncomparableCoordinate { point_index: None, axis });
    }
    Ok(())
}

/// Distances from `goal` to every point whose squared distance fits in `T`, sorted ascending;
/// input order breaks ties.
fn sorted_distances<T: Coordinate>(points: &[Vec<T>], goal: &[T]) -> Vec<(usize, T)> {
    let mut distances: Vec<(usize, T)> = points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| squared_euclidean(goal, p).map(|d| (i, d)))
        .collect();
    distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    distances
}

pub fn nearest<T: Coordinate>(points: &[Vec<T>], goal: &[T]) -> Result<NearestResult<T>, KdTreeError> {
    check_goal(points, goal)?;
    let mut best: Option<(usize, T)> = None;
    for (i, p) in points.iter().enumerate() {
        let Some(distance) = squared_euclidean(goal, p) else {
            continue;
        };
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((i, distance));
        }
    }
    let (i, squared_distance) = best.ok_or(KdTreeError::DistanceOverflow)?;
    Ok(NearestResult::new(points[i].clone(), squared_distance))
}

pub fn k_nearest<T: Coordinate>(
    points: &[Vec<T>],
    goal: &[T],
    n_neighbors: usize,
) -> Result<Vec<NearestResult<T>>, KdTreeError> {
    check_goal(points, goal)?;
    let found: Vec<NearestResult<T>> = sorted_distances(points, goal)
        .into_iter()
        .take(n_neighbors)
        .map(|(i, d)| NearestResult::new(points[i].clone(), d))
        .collect();
    if found.len() < n_neighbors.min(points.len()) {
        return Err(KdTreeError::DistanceOverflow);
    }
    Ok(found)
}

pub fn within_radius<T: Coordinate>(
    points: &[Vec<T>],
    goal: &[T],
    radius_squared: T,
) -> Result<Vec<NearestResult<T>>, KdTreeError> {
    check_goal(points, goal)?;
    Ok(sorted_distances(points, goal)
        .into_iter()
        .take_while(|&(_, d)| d <= radius_squared)
        .map(|(i, d)| NearestResult::new(points[i].clone(), d))
        .collect())
}
