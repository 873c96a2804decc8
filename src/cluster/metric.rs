//! Point-to-point dissimilarities.
//!
//! The engine only needs a symmetric function `d(a, b) >= 0`. Two are
//! provided:
//!
//! | Metric | Formula | Notes |
//! |--------|---------|-------|
//! | [`Pearson`] | `1 - corr(a, b)` | Shape similarity; ignores offset and scale |
//! | [`Euclidean`] | `sqrt(Σ (a - b)²)` | Absolute position |
//!
//! Pearson distance ranges over `[0, 2]`. A constant vector has zero variance,
//! so its correlation with anything is defined as `0` (distance `1`) instead of
//! dividing by zero.
//!
//! Distances are accumulated in `f64` even though points are `f32`.

use super::util;

/// A dissimilarity between two points of equal length.
pub trait Metric {
    /// Distance between `a` and `b`. Callers guarantee `a.len() == b.len()`.
    fn distance(&self, a: &[f32], b: &[f32]) -> f64;
}

/// Pearson correlation distance, `1 - corr(a, b)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pearson;

impl Metric for Pearson {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f64 {
        pearson_distance(a, b)
    }
}

/// Euclidean (L2) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Metric for Euclidean {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f64 {
        util::squared_euclidean(a, b).sqrt()
    }
}

/// Pearson correlation coefficient of two equal-length vectors.
///
/// Returns `0.0` when either vector has zero variance.
pub fn pearson_correlation(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return 0.0;
    }

    let n = a.len() as f64;
    let mean_a = a.iter().map(|&x| x as f64).sum::<f64>() / n;
    let mean_b = b.iter().map(|&x| x as f64).sum::<f64>() / n;

    let mut num = 0.0;
    let mut ss_a = 0.0;
    let mut ss_b = 0.0;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let da = x as f64 - mean_a;
        let db = y as f64 - mean_b;
        num += da * db;
        ss_a += da * da;
        ss_b += db * db;
    }

    let den = (ss_a * ss_b).sqrt();
    if den == 0.0 {
        return 0.0;
    }
    num / den
}

/// Pearson distance, `1 - pearson_correlation(a, b)`.
#[inline]
pub fn pearson_distance(a: &[f32], b: &[f32]) -> f64 {
    1.0 - pearson_correlation(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_correlated_is_zero() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        assert!(pearson_distance(&a, &b).abs() < 1e-12);
    }

    #[test]
    fn anti_correlated_is_two() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 2.0, 1.0];
        assert!((pearson_distance(&a, &b) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn constant_vector_has_distance_one() {
        let a = [5.0, 5.0, 5.0, 5.0];
        let b = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(pearson_correlation(&a, &b), 0.0);
        assert_eq!(pearson_distance(&a, &b), 1.0);
        assert_eq!(pearson_distance(&a, &a), 1.0);
    }

    #[test]
    fn pearson_is_symmetric() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [1.1, 2.1, 2.9, 4.1];
        assert_eq!(Pearson.distance(&a, &b), Pearson.distance(&b, &a));
    }

    #[test]
    fn nan_propagates() {
        let a = [1.0, f32::NAN, 3.0];
        let b = [1.0, 2.0, 3.0];
        assert!(pearson_distance(&a, &b).is_nan());
    }

    #[test]
    fn euclidean_three_four_five() {
        let d = Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-12);
    }
}
