//! Growing dissimilarity table keyed by cluster id.
//!
//! The matrix holds two things:
//!
//! - a **leaf table**: the condensed (upper-triangle, row-major) distances
//!   between the original points. It is written once and never changes.
//! - **active rows**: one sparse row per active cluster id, holding its
//!   distance to every other active id.
//!
//! Ids are only ever added. A merge appends one row for the new id
//! ([`DistanceMatrix::extend_with`]) and retires the two merged ids
//! ([`DistanceMatrix::retire`]); a retired id is never looked up or reused.
//!
//! ```text
//!            leaf table (fixed)          active rows (after merging 0 and 1 into 5)
//!          0    1    2    3    4               2    3    4    5
//!     0    .   d01  d02  d03  d04         2    0   d23  d24  d25
//!     1         .   d12  d13  d14         3         0   d34  d35
//!     2              .   d23  d24         4              0   d45
//!     3                   .   d34         5                   0
//! ```

use std::collections::BTreeMap;

use super::metric::Metric;
use super::util::condensed_index;
use crate::error::{Error, Result};

/// Symmetric dissimilarity table over active cluster ids.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n_leaves: usize,
    leaf: Vec<f64>,
    // rows[i][j] for i != j, stored in both directions.
    rows: BTreeMap<usize, BTreeMap<usize, f64>>,
    next_id: usize,
    version: usize,
}

impl DistanceMatrix {
    /// Evaluate `metric` over every pair of points.
    ///
    /// Leaf ids `0..n` start active. The diagonal is fixed at zero and never
    /// computed. Callers validate the dataset shape first.
    pub fn build<M: Metric + ?Sized>(data: &[Vec<f32>], metric: &M) -> Result<Self> {
        let n = data.len();
        let mut condensed = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric.distance(&data[i], &data[j]);
                if !d.is_finite() {
                    return Err(Error::NonFiniteDistance { a: i, b: j });
                }
                condensed.push(d);
            }
        }
        Self::from_condensed(n, condensed)
    }

    /// Build from precomputed condensed distances (length `n * (n - 1) / 2`).
    pub fn from_condensed(n: usize, condensed: Vec<f64>) -> Result<Self> {
        if n < 2 {
            return Err(Error::TooFewPoints { found: n });
        }
        if condensed.len() != n * (n - 1) / 2 {
            return Err(Error::DimensionMismatch {
                expected: n * (n - 1) / 2,
                found: condensed.len(),
            });
        }

        let mut rows: BTreeMap<usize, BTreeMap<usize, f64>> =
            (0..n).map(|i| (i, BTreeMap::new())).collect();
        for i in 0..n {
            for j in (i + 1)..n {
                let d = condensed[condensed_index(n, i, j)];
                if !d.is_finite() {
                    return Err(Error::NonFiniteDistance { a: i, b: j });
                }
                if let Some(row) = rows.get_mut(&i) {
                    row.insert(j, d);
                }
                if let Some(row) = rows.get_mut(&j) {
                    row.insert(i, d);
                }
            }
        }

        Ok(Self {
            n_leaves: n,
            leaf: condensed,
            rows,
            next_id: n,
            version: 0,
        })
    }

    /// Distance between two active ids. `get(i, i)` is zero.
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        let row = self
            .rows
            .get(&i)
            .ok_or(Error::InactiveCluster { id: i })?;
        if i == j {
            return Ok(0.0);
        }
        row.get(&j)
            .copied()
            .ok_or(Error::InactiveCluster { id: j })
    }

    /// Base distance between two original points. Available after retirement.
    ///
    /// Ids outside `0..n_leaves` are rejected with [`Error::InactiveCluster`].
    #[inline]
    pub fn leaf(&self, a: usize, b: usize) -> Result<f64> {
        if let Some(id) = [a, b].into_iter().find(|&id| id >= self.n_leaves) {
            return Err(Error::InactiveCluster { id });
        }
        Ok(match a.cmp(&b) {
            std::cmp::Ordering::Less => self.leaf[condensed_index(self.n_leaves, a, b)],
            std::cmp::Ordering::Greater => self.leaf[condensed_index(self.n_leaves, b, a)],
            std::cmp::Ordering::Equal => 0.0,
        })
    }

    /// Append a row for `new_id` with its distance to every active id.
    ///
    /// `new_id` must be the next sequential id and `distances` must cover
    /// exactly the currently active ids.
    pub fn extend_with(&mut self, new_id: usize, distances: &BTreeMap<usize, f64>) -> Result<()> {
        if new_id != self.next_id {
            return Err(Error::InvalidParameter {
                name: "new_id",
                message: "must be the next sequential cluster id",
            });
        }
        if distances.len() != self.rows.len() || distances.keys().any(|k| !self.rows.contains_key(k))
        {
            return Err(Error::InvalidParameter {
                name: "distances",
                message: "must cover exactly the active cluster ids",
            });
        }
        if let Some((&id, _)) = distances.iter().find(|(_, d)| !d.is_finite()) {
            return Err(Error::NonFiniteDistance { a: new_id, b: id });
        }

        for (&id, &d) in distances {
            if let Some(row) = self.rows.get_mut(&id) {
                row.insert(new_id, d);
            }
        }
        self.rows.insert(new_id, distances.clone());
        self.next_id += 1;
        self.version += 1;
        log::trace!(
            "matrix v{}: appended row {} ({} active)",
            self.version,
            new_id,
            self.rows.len()
        );
        Ok(())
    }

    /// Remove `id` from the active set and drop its row.
    pub fn retire(&mut self, id: usize) -> Result<()> {
        if self.rows.remove(&id).is_none() {
            return Err(Error::InactiveCluster { id });
        }
        for row in self.rows.values_mut() {
            row.remove(&id);
        }
        Ok(())
    }

    /// Active ids in ascending order.
    pub fn active_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.keys().copied()
    }

    /// Whether `id` is currently active.
    pub fn is_active(&self, id: usize) -> bool {
        self.rows.contains_key(&id)
    }

    /// Number of active ids.
    pub fn n_active(&self) -> usize {
        self.rows.len()
    }

    /// Number of original points.
    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    /// The id the next [`extend_with`](Self::extend_with) must use.
    pub fn next_id(&self) -> usize {
        self.next_id
    }

    /// Number of rows appended since the initial build.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Globally closest active pair `(i, j, distance)` with `i < j`.
    ///
    /// Pairs are scanned in ascending `(i, j)` order and only a strictly
    /// smaller distance replaces the current best, so ties go to the first
    /// pair encountered.
    pub fn closest_pair(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for (&i, row) in &self.rows {
            for (&j, &d) in row.range((i + 1)..) {
                if best.map_or(true, |(_, _, b)| d < b) {
                    best = Some((i, j, d));
                }
            }
        }
        best
    }
}
