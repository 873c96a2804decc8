//! Agglomerative hierarchical clustering.
//!
//! `agglo` builds a dendrogram over dense vectors: pairwise dissimilarities,
//! a closest-pair merge loop with a pluggable linkage rule, and an owned merge
//! tree with derived branch lengths.
//!
//! The primary public API is under [`cluster`], which provides:
//! - point metrics (Pearson correlation distance, Euclidean)
//! - a growing, id-keyed distance matrix
//! - single / complete / average linkage
//! - the merge tree, its edge list and a text rendering
//!
//! The library logs through the [`log`](https://docs.rs/log) facade and installs
//! no logger of its own.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    Agglomerative, Clustering, DistanceMatrix, Edge, Euclidean, Linkage, Merge, MergeTree,
    Metric, Node, Pearson,
};
pub use error::{Error, Result};
