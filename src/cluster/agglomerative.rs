//! Agglomerative (bottom-up) hierarchical clustering.
//!
//! Start with every point as its own cluster and repeatedly merge the two
//! closest active clusters until one remains. The merges form a
//! [`MergeTree`].
//!
//! # The loop
//!
//! ```text
//! matrix <- pairwise metric over points (leaf ids 0..n)
//! while more than one active id:
//!     (i, j, d) <- closest active pair, ascending (i, j) order, first wins ties
//!     new       <- next id, members(new) = members(i) ++ members(j)
//!     node(new) <- owns node(i), node(j); height = d / 2
//!     retire i and j
//!     row(new)  <- linkage(members(new), members(k)) for every other active k
//! ```
//!
//! Exactly `n - 1` iterations run. Each scan is O(active²), so the whole run is
//! O(n³); no Lance–Williams update is attempted.
//!
//! # Heights
//!
//! By default a node's height is **half** the merge distance (the UPGMA
//! convention for a symmetric dendrogram). Disable with
//! [`Agglomerative::with_halved_heights`] to record the raw distance.

use std::collections::BTreeMap;

use super::linkage::Linkage;
use super::matrix::DistanceMatrix;
use super::metric::{Metric, Pearson};
use super::traits::Clustering;
use super::tree::{Merge, MergeTree, Node};
use crate::error::{Error, Result};

/// Agglomerative clustering configuration.
#[derive(Debug, Clone)]
pub struct Agglomerative<M = Pearson> {
    linkage: Linkage,
    metric: M,
    halve_heights: bool,
    n_clusters: usize,
}

impl Agglomerative<Pearson> {
    /// Create a clusterer with the given linkage and the Pearson metric.
    pub fn new(linkage: Linkage) -> Self {
        Self {
            linkage,
            metric: Pearson,
            halve_heights: true,
            n_clusters: 2,
        }
    }
}

impl Default for Agglomerative<Pearson> {
    fn default() -> Self {
        Self::new(Linkage::default())
    }
}

impl<M: Metric> Agglomerative<M> {
    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Replace the point metric.
    pub fn with_metric<N: Metric>(self, metric: N) -> Agglomerative<N> {
        Agglomerative {
            linkage: self.linkage,
            metric,
            halve_heights: self.halve_heights,
            n_clusters: self.n_clusters,
        }
    }

    /// Record `distance / 2` (default) or the raw distance as node height.
    pub fn with_halved_heights(mut self, halve: bool) -> Self {
        self.halve_heights = halve;
        self
    }

    /// Number of flat clusters produced by [`Clustering::fit_predict`].
    pub fn with_n_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    /// Configured linkage.
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Build the full merge tree for `data`.
    ///
    /// The dataset shape is validated before any distance is computed.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<MergeTree> {
        validate(data)?;
        let matrix = DistanceMatrix::build(data, &self.metric)?;
        self.fit_matrix(matrix)
    }

    /// Run the merge loop on a prebuilt matrix (all leaf ids active).
    pub fn fit_matrix(&self, matrix: DistanceMatrix) -> Result<MergeTree> {
        let n = matrix.n_leaves();
        if matrix.n_active() != n || matrix.version() != 0 {
            return Err(Error::InvalidParameter {
                name: "matrix",
                message: "must be freshly built with every leaf active",
            });
        }

        log::info!(
            "agglomerative clustering: {} points, linkage={}",
            n,
            self.linkage
        );

        let mut engine = Engine::new(matrix, self.linkage, self.halve_heights);
        while let State::Running = engine.state() {
            engine.step()?;
        }
        let tree = engine.finish()?;

        log::info!(
            "agglomerative clustering done: {} merges, root height {:.6}",
            tree.n_merges(),
            tree.root().height
        );
        Ok(tree)
    }
}

impl<M: Metric> Clustering for Agglomerative<M> {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        validate(data)?;
        if self.n_clusters == 0 || self.n_clusters > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: data.len(),
            });
        }
        self.fit(data)?.cut_to_k(self.n_clusters)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

fn validate(data: &[Vec<f32>]) -> Result<()> {
    if data.len() < 2 {
        return Err(Error::TooFewPoints { found: data.len() });
    }
    let d = data[0].len();
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "must be at least 1",
        });
    }
    for point in data.iter().skip(1) {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Done,
}

/// Mutable state of one run. Owns the matrix and the node forest.
struct Engine {
    matrix: DistanceMatrix,
    linkage: Linkage,
    halve_heights: bool,
    // Active id -> leaf members / subtree.
    members: BTreeMap<usize, Vec<usize>>,
    nodes: BTreeMap<usize, Node>,
    merges: Vec<Merge>,
}

impl Engine {
    fn new(matrix: DistanceMatrix, linkage: Linkage, halve_heights: bool) -> Self {
        let n = matrix.n_leaves();
        Self {
            members: (0..n).map(|i| (i, vec![i])).collect(),
            nodes: (0..n).map(|i| (i, Node::leaf(i))).collect(),
            merges: Vec::with_capacity(n.saturating_sub(1)),
            matrix,
            linkage,
            halve_heights,
        }
    }

    fn state(&self) -> State {
        if self.matrix.n_active() > 1 {
            State::Running
        } else {
            State::Done
        }
    }

    fn step(&mut self) -> Result<()> {
        let (i, j, distance) = self.matrix.closest_pair().ok_or(Error::TooFewPoints {
            found: self.matrix.n_active(),
        })?;

        let new_id = self.matrix.next_id();
        let height = if self.halve_heights {
            distance / 2.0
        } else {
            distance
        };

        let first = self.take(i)?;
        let second = self.take(j)?;
        let mut merged = first.0;
        merged.extend(second.0);

        // Retire first so the new row covers exactly the surviving ids.
        self.matrix.retire(i)?;
        self.matrix.retire(j)?;
        let distances: BTreeMap<usize, f64> = self
            .members
            .iter()
            .map(|(&k, other)| -> Result<(usize, f64)> {
                Ok((k, self.linkage.combine(&merged, other, &self.matrix)?))
            })
            .collect::<Result<_>>()?;
        self.matrix.extend_with(new_id, &distances)?;

        log::debug!(
            "merge {} + {} -> {} (distance {:.6}, height {:.6}, size {})",
            i,
            j,
            new_id,
            distance,
            height,
            merged.len()
        );

        self.merges.push(Merge {
            id: new_id,
            left: i,
            right: j,
            distance,
            height,
            size: merged.len(),
        });
        self.nodes
            .insert(new_id, Node::merge(new_id, height, first.1, second.1));
        self.members.insert(new_id, merged);
        Ok(())
    }

    /// Remove an active cluster's members and node from the forest.
    fn take(&mut self, id: usize) -> Result<(Vec<usize>, Node)> {
        let members = self
            .members
            .remove(&id)
            .ok_or(Error::InactiveCluster { id })?;
        let node = self.nodes.remove(&id).ok_or(Error::InactiveCluster { id })?;
        Ok((members, node))
    }

    fn finish(mut self) -> Result<MergeTree> {
        debug_assert_eq!(self.state(), State::Done);
        let n = self.matrix.n_leaves();
        let root_id = self
            .matrix
            .active_ids()
            .next()
            .ok_or(Error::TooFewPoints { found: 0 })?;
        let root = self
            .nodes
            .remove(&root_id)
            .ok_or(Error::InactiveCluster { id: root_id })?;
        Ok(MergeTree::new(root, self.merges, n))
    }
}
