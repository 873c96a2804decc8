//! Merge tree (dendrogram) and its exports.
//!
//! Every cluster ever created is a [`Node`]. Parents own their children, so the
//! finished tree is a single owned value rooted at the last merge:
//!
//! ```text
//!             8 (h=0.50)
//!            / \
//!   (h=0.02) 5   7 (h=0.31)
//!           / \  | \
//!          0  1  4  6 (h=0.01)
//!                   / \
//!                  2   3
//! ```
//!
//! Branch length from a child to its parent is `parent.height - child.height`.
//! It is not asserted to be non-negative.

use core::fmt;
use std::fmt::Write as _;

use super::util::{relabel, UnionFind};
use crate::error::{Error, Result};

/// A node in the merge tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Cluster id (`0..n` for leaves, `n..` for merges).
    pub id: usize,

    /// Merge height (0.0 for leaves).
    pub height: f64,

    /// Number of leaf points under this node.
    pub size: usize,

    /// Children in attachment order (empty for leaves, two for merges).
    pub children: Vec<Node>,
}

impl Node {
    /// A leaf for point `id`.
    pub fn leaf(id: usize) -> Self {
        Self {
            id,
            height: 0.0,
            size: 1,
            children: Vec::new(),
        }
    }

    /// An internal node owning `first` and `second`.
    pub fn merge(id: usize, height: f64, first: Node, second: Node) -> Self {
        Self {
            id,
            height,
            size: first.size + second.size,
            children: vec![first, second],
        }
    }

    /// True when the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaf ids under this node, in depth-first order.
    pub fn leaves(&self) -> Vec<usize> {
        self.iter().filter(|n| n.is_leaf()).map(|n| n.id).collect()
    }

    /// Pre-order walk of this subtree.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// Branch length from `child` up to this node.
    #[inline]
    pub fn branch_length(&self, child: &Node) -> f64 {
        self.height - child.height
    }
}

/// Pre-order iterator over a subtree, see [`Node::iter`].
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// One merge event, in the order it happened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Merge {
    /// Id assigned to the merged cluster.
    pub id: usize,
    /// First merged id (the smaller one).
    pub left: usize,
    /// Second merged id.
    pub right: usize,
    /// Linkage distance between the two clusters.
    pub distance: f64,
    /// Height recorded on the new node.
    pub height: f64,
    /// Number of leaves in the merged cluster.
    pub size: usize,
}

/// A `(parent, child, length)` edge of the exported tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// Parent id.
    pub parent: usize,
    /// Child id.
    pub child: usize,
    /// `parent.height - child.height`.
    pub length: f64,
}

/// Finished agglomerative clustering: the root node plus the merge history.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeTree {
    root: Node,
    merges: Vec<Merge>,
    n_leaves: usize,
}

impl MergeTree {
    pub(crate) fn new(root: Node, merges: Vec<Merge>, n_leaves: usize) -> Self {
        debug_assert_eq!(merges.len() + 1, n_leaves);
        Self {
            root,
            merges,
            n_leaves,
        }
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Consume the tree and return the root node.
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Merge history in creation order.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Number of original points.
    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    /// Number of merges (always `n_leaves - 1`).
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Heights of internal nodes, in merge order.
    pub fn heights(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.height).collect()
    }

    /// Look up a node by id.
    pub fn find(&self, id: usize) -> Option<&Node> {
        self.root.iter().find(|n| n.id == id)
    }

    /// True if no node sits higher than its parent.
    pub fn is_monotone(&self) -> bool {
        self.root
            .iter()
            .all(|n| n.children.iter().all(|c| c.height <= n.height))
    }

    /// Depth-first edge list from the root.
    ///
    /// Each child's edge is emitted right before that child's own subtree;
    /// children are visited in the order they were attached.
    pub fn edges(&self) -> Vec<Edge> {
        let mut out = Vec::with_capacity(self.merges.len() * 2);
        let mut stack: Vec<(&Node, &Node)> =
            self.root.children.iter().rev().map(|c| (&self.root, c)).collect();

        while let Some((parent, child)) = stack.pop() {
            out.push(Edge {
                parent: parent.id,
                child: child.id,
                length: parent.branch_length(child),
            });
            stack.extend(child.children.iter().rev().map(|c| (child, c)));
        }
        out
    }

    /// Indented text rendering: one line per node, one line per edge.
    ///
    /// ```text
    /// 6
    ///   |-- 5 (len=0.0000)
    ///     5
    ///       |-- 0 (len=0.0050)
    ///         0
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        // (node, depth, parent height)
        let mut stack: Vec<(&Node, usize, Option<f64>)> = vec![(&self.root, 0, None)];

        while let Some((node, depth, parent_height)) = stack.pop() {
            if let Some(ph) = parent_height {
                let _ = writeln!(
                    out,
                    "{}|-- {} (len={:.4})",
                    "  ".repeat(depth - 1),
                    node.id,
                    ph - node.height
                );
            }
            let _ = writeln!(out, "{}{}", "  ".repeat(depth), node.id);
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .map(|c| (c, depth + 2, Some(node.height))),
            );
        }
        out
    }

    /// Flat labels for `k` clusters: undo the last `k - 1` merges.
    ///
    /// Labels are consecutive, numbered by first appearance in point order.
    pub fn cut_to_k(&self, k: usize) -> Result<Vec<usize>> {
        if k == 0 || k > self.n_leaves {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: self.n_leaves,
            });
        }
        let applied = self.n_leaves - k;
        Ok(self.labels_after(self.merges.iter().take(applied)))
    }

    /// Flat labels keeping only merges whose height is at most `height`.
    pub fn cut_at_height(&self, height: f64) -> Vec<usize> {
        self.labels_after(self.merges.iter().filter(|m| m.height <= height))
    }

    fn labels_after<'a>(&self, merges: impl Iterator<Item = &'a Merge>) -> Vec<usize> {
        let mut uf = UnionFind::new(self.n_leaves + self.merges.len());
        for m in merges {
            uf.union(m.left, m.id);
            uf.union(m.right, m.id);
        }
        let roots: Vec<usize> = (0..self.n_leaves).map(|i| uf.find(i)).collect();
        relabel(&roots)
    }
}

impl fmt::Display for MergeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
