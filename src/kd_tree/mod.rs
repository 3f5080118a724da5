//! This module contains the k-d tree: an arena of nodes addressed by [`NodeId`] handles.
//!
//! Children are stored as handles owned by the arena, and every node keeps a handle to its
//! parent so searches can walk back up without recursion. The split dimension of a node is
//! not stored; traversals derive it as `depth % dimensions`.

pub mod builder;
pub mod search;

pub use builder::BuildStats;

/// Handle of a node inside a [`KdTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which side of its parent a node hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<T> {
    point: Vec<T>,
    /// Lookup handle used for backtracking. Ownership stays with the arena.
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<T> TreeNode<T> {
    pub fn point(&self) -> &[T] {
        &self.point
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// An immutable k-d tree built once from a complete point set.
///
/// Two trees compare equal when they hold the same points in the same shape, so building the
/// same input twice yields equal trees.
#[derive(Debug, Clone, PartialEq)]
pub struct KdTree<T> {
    nodes: Vec<TreeNode<T>>,
    root: Option<NodeId>,
    dimensions: Option<usize>,
}

impl<T> KdTree<T> {
    /// A tree without points. Searching it fails with `KdTreeError::EmptyTree`.
    pub fn empty() -> Self {
        KdTree { nodes: Vec::new(), root: None, dimensions: None }
    }

    /// Number of stored points (one per node).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Dimensionality shared by all stored points, or `None` for an empty tree.
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Looks up a node. Returns `None` for a handle that does not belong to this tree.
    pub fn get(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.nodes.get(id.0)
    }

    /// Split axis used by nodes at `depth`.
    pub fn split_dimension(&self, depth: usize) -> Option<usize> {
        self.dimensions.map(|k| depth % k)
    }

    /// Iterates over the stored points in arena order.
    pub fn points(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.nodes.iter().map(|node| node.point.as_slice())
    }

    /// Number of levels in the tree; `0` for an empty tree, `1` for a single leaf.
    pub fn height(&self) -> usize {
        self.pre_order().map(|visit| visit.depth + 1).max().unwrap_or(0)
    }

    /// Depth-first, pre-order walk (node, then left subtree, then right subtree).
    pub fn pre_order(&self) -> PreOrder<'_, T> {
        PreOrder {
            tree: self,
            stack: self.root.map(|root| (root, 0, None)).into_iter().collect(),
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &TreeNode<T> {
        &self.nodes[id.0]
    }
}

/// One step of a [`PreOrder`] walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeVisit {
    pub id: NodeId,
    pub depth: usize,
    /// Side of the parent this node hangs on; `None` for the root.
    pub side: Option<Side>,
}

/// Iterator returned by [`KdTree::pre_order`]. Uses an explicit stack, so chains produced by
/// duplicate-heavy inputs do not grow the call stack.
#[derive(Debug)]
pub struct PreOrder<'a, T> {
    tree: &'a KdTree<T>,
    stack: Vec<(NodeId, usize, Option<Side>)>,
}

impl<T> Iterator for PreOrder<'_, T> {
    type Item = NodeVisit;

    fn next(&mut self) -> Option<NodeVisit> {
        let (id, depth, side) = self.stack.pop()?;
        let node = self.tree.node(id);
        // Right is pushed first so the left subtree is visited first.
        if let Some(right) = node.right {
            self.stack.push((right, depth + 1, Some(Side::Right)));
        }
        if let Some(left) = node.left {
            self.stack.push((left, depth + 1, Some(Side::Left)));
        }
        Some(NodeVisit { id, depth, side })
    }
}
