//! Exact nearest-neighbor search over k-dimensional points with a median-split k-d tree.
//!
//! The tree is built once from a complete point set and never changes afterwards. Nodes live
//! in an arena and refer to their children and parent through [`NodeId`] handles, so searches
//! can backtrack from a leaf to the root without recursion.
//!
//! ```
//! use kd_nearest::KdTree;
//!
//! let tree = KdTree::build(vec![
//!     vec![2.0, 3.0],
//!     vec![5.0, 4.0],
//!     vec![9.0, 6.0],
//!     vec![4.0, 7.0],
//!     vec![8.0, 1.0],
//!     vec![7.0, 2.0],
//! ])?;
//!
//! let nearest = tree.nearest(&[3.0, 4.5])?;
//! assert_eq!(nearest.point, vec![2.0, 3.0]);
//! assert_eq!(nearest.squared_distance, 3.25);
//! # Ok::<(), kd_nearest::KdTreeError>(())
//! ```

pub mod brute_force;
pub mod common_types;
pub mod error;
pub mod heap_utils;
pub mod index;
pub mod kd_tree;
pub mod median;
pub mod metric;
pub mod render;

#[cfg(feature = "python")]
mod python;

pub use common_types::{Coordinate, NearestResult};
pub use error::KdTreeError;
pub use index::{IndexConfig, NearestNeighborIndex, SearchStrategy};
pub use kd_tree::{BuildStats, KdTree, NodeId, NodeVisit, Side, TreeNode};
pub use render::render_tree;
