use thiserror::Error;

/// Errors returned by the clustering engine and its building blocks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Fewer than two points were supplied; there is nothing to merge.
    #[error("too few points: need at least 2, found {found}")]
    TooFewPoints {
        /// Number of points supplied.
        found: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Linkage policy name not recognized.
    #[error("unknown linkage policy {0:?} (expected one of: min, max, avg)")]
    UnknownLinkage(String),

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// A dissimilarity evaluated to NaN or infinity.
    #[error("non-finite distance between {a} and {b}")]
    NonFiniteDistance {
        /// First id of the offending pair.
        a: usize,
        /// Second id of the offending pair.
        b: usize,
    },

    /// A distance lookup referenced a cluster id that is not active.
    #[error("cluster {id} is not active")]
    InactiveCluster {
        /// The retired or unknown id.
        id: usize,
    },
}

impl Error {
    /// True for errors caused by the input or configuration (never retriable).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::TooFewPoints { .. }
                | Error::DimensionMismatch { .. }
                | Error::UnknownLinkage(_)
                | Error::InvalidParameter { .. }
                | Error::InvalidClusterCount { .. }
        )
    }

    /// True for degenerate numeric results surfaced during computation.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Error::NonFiniteDistance { .. })
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
