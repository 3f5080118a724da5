//! A nearest-neighbor index that picks between a linear scan and a k-d tree.

use log::debug;

use crate::brute_force;
use crate::common_types::{Coordinate, NearestResult};
use crate::error::KdTreeError;
use crate::kd_tree::KdTree;
use crate::kd_tree::builder::validate_points;

/// Defines the search strategy used by a [`NearestNeighborIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    BruteForce,
    KdTree,
}

/// Construction options for a [`NearestNeighborIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Point sets smaller than this are scanned linearly instead of indexed by a tree.
    pub brute_force_threshold: usize,
    /// Forces a strategy regardless of the point count.
    pub strategy_override: Option<SearchStrategy>,
}

impl IndexConfig {
    pub const DEFAULT_BRUTE_FORCE_THRESHOLD: usize = 32;

    pub fn new(brute_force_threshold_opt: Option<usize>, strategy_override: Option<SearchStrategy>) -> Self {
        IndexConfig {
            brute_force_threshold: brute_force_threshold_opt.unwrap_or(Self::DEFAULT_BRUTE_FORCE_THRESHOLD),
            strategy_override,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig::new(None, None)
    }
}

/// The structure queries run against. Each variant owns the only copy of the points.
#[derive(Debug, Clone)]
enum Backend<T> {
    BruteForce(Vec<Vec<T>>),
    KdTree(KdTree<T>),
}

/// Owns a point set and answers exact nearest-neighbor queries over it.
#[derive(Debug, Clone)]
pub struct NearestNeighborIndex<T> {
    backend: Backend<T>,
}

impl<T: Coordinate> NearestNeighborIndex<T> {
    /// Validates `points` and builds the search structure chosen by `config`:
    /// - Brute force if `points.len()` is below `config.brute_force_threshold`.
    /// - K-d tree otherwise.
    ///
    /// `config.strategy_override`, when set, wins over the threshold.
    pub fn fit(points: Vec<Vec<T>>, config: IndexConfig) -> Result<Self, KdTreeError> {
        validate_points(&points)?;

        let n_points = points.len();
        let search_strategy = config.strategy_override.unwrap_or(if n_points < config.brute_force_threshold {
            SearchStrategy::BruteForce
        } else {
            SearchStrategy::KdTree
        });

        let backend = match search_strategy {
            SearchStrategy::BruteForce => Backend::BruteForce(points),
            SearchStrategy::KdTree => Backend::KdTree(KdTree::build(points)?),
        };
        debug!("Fitted nearest-neighbor index over {} points using {:?}", n_points, search_strategy);

        Ok(NearestNeighborIndex { backend })
    }

    /// Returns the currently active search strategy.
    pub fn search_strategy(&self) -> SearchStrategy {
        match self.backend {
            Backend::BruteForce(_) => SearchStrategy::BruteForce,
            Backend::KdTree(_) => SearchStrategy::KdTree,
        }
    }

    pub fn len(&self) -> usize {
        match &self.backend {
            Backend::BruteForce(points) => points.len(),
            Backend::KdTree(tree) => tree.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The tree backing the index, when the k-d tree strategy is active.
    pub fn tree(&self) -> Option<&KdTree<T>> {
        match &self.backend {
            Backend::BruteForce(_) => None,
            Backend::KdTree(tree) => Some(tree),
        }
    }

    pub fn nearest(&self, goal: &[T]) -> Result<NearestResult<T>, KdTreeError> {
        match &self.backend {
            Backend::BruteForce(points) => brute_force::nearest(points, goal),
            Backend::KdTree(tree) => tree.nearest(goal),
        }
    }

    pub fn k_nearest(&self, goal: &[T], n_neighbors: usize) -> Result<Vec<NearestResult<T>>, KdTreeError> {
        match &self.backend {
            Backend::BruteForce(points) => brute_force::k_nearest(points, goal, n_neighbors),
            Backend::KdTree(tree) => tree.k_nearest(goal, n_neighbors),
        }
    }

    pub fn within_radius(&self, goal: &[T], radius_squared: T) -> Result<Vec<NearestResult<T>>, KdTreeError> {
        match &self.backend {
            Backend::BruteForce(points) => brute_force::within_radius(points, goal, radius_squared),
            Backend::KdTree(tree) => tree.within_radius(goal, radius_squared),
        }
    }
}
