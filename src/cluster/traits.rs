use crate::error::Result;

/// Flat (one label per point) view of a clustering algorithm.
pub trait Clustering {
    /// Fit on `data` and return one cluster label per input point.
    ///
    /// Labels are consecutive integers starting at 0.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// The configured number of flat clusters.
    fn n_clusters(&self) -> usize;
}
