//! Agglomerative hierarchical clustering.
//!
//! Bottom-up: start with each point as its own cluster, repeatedly merge the
//! two closest clusters until one remains. The merge history forms a
//! **dendrogram**: a binary tree you can export as an edge list, render as
//! text, or cut at any level to get flat clusters.
//!
//! ## Building blocks
//!
//! | Piece | Type | Role |
//! |-------|------|------|
//! | Metric | [`Metric`], [`Pearson`], [`Euclidean`] | Point-to-point dissimilarity |
//! | Distance matrix | [`DistanceMatrix`] | Symmetric table over active cluster ids, grows by one row per merge |
//! | Linkage | [`Linkage`] | Cluster-to-cluster distance from leaf distances |
//! | Engine | [`Agglomerative`] | Closest-pair merge loop |
//! | Tree | [`MergeTree`], [`Node`] | Owned dendrogram, edge list, text rendering |
//!
//! ## Linkage methods
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single (`min`) | min(pairwise) | Chaining; elongated clusters |
//! | Complete (`max`) | max(pairwise) | Compact clusters |
//! | Average (`avg`) | mean(pairwise) | Balanced compromise (UPGMA) |
//!
//! ## Usage
//!
//! ```rust
//! use agglo::cluster::{Agglomerative, Clustering, Euclidean, Linkage};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let hc = Agglomerative::new(Linkage::Average).with_metric(Euclidean);
//! let tree = hc.fit(&data).unwrap();
//! assert_eq!(tree.n_merges(), 3);
//! assert_eq!(tree.edges().len(), 6);
//!
//! // Flat labels from the same configuration.
//! let labels = hc.with_n_clusters(2).fit_predict(&data).unwrap();
//! assert_eq!(labels, vec![0, 0, 1, 1]);
//! ```

mod agglomerative;
mod linkage;
mod matrix;
mod metric;
mod traits;
mod tree;
mod util;

pub use agglomerative::Agglomerative;
pub use linkage::Linkage;
pub use matrix::DistanceMatrix;
pub use metric::{pearson_correlation, pearson_distance, Euclidean, Metric, Pearson};
pub use traits::Clustering;
pub use tree::{Edge, Merge, MergeTree, Node, Nodes};
