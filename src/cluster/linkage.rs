//! Linkage rules: how two clusters' leaf distances collapse into one number.
//!
//! | Linkage | Name | Formula |
//! |---------|------|---------|
//! | Single | `min` | min d(a, b) for a ∈ A, b ∈ B |
//! | Complete | `max` | max d(a, b) |
//! | Average | `avg` | Σ d(a, b) / (\|A\| · \|B\|) |
//!
//! All three are evaluated from the original leaf-to-leaf distances, never
//! from the distances stored for intermediate merged ids.

use core::fmt;
use std::str::FromStr;

use super::matrix::DistanceMatrix;
use crate::error::{Error, Result};

/// Linkage method for agglomerative clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    /// Single linkage: minimum distance between members.
    Single,
    /// Complete linkage: maximum distance between members.
    Complete,
    /// Average linkage (UPGMA): mean distance between members.
    #[default]
    Average,
}

impl Linkage {
    /// Combined distance between two member sets (leaf ids).
    ///
    /// Both sets must be non-empty and hold only leaf ids of `base`.
    pub fn combine(
        &self,
        members_i: &[usize],
        members_j: &[usize],
        base: &DistanceMatrix,
    ) -> Result<f64> {
        if members_i.is_empty() || members_j.is_empty() {
            return Err(Error::InvalidParameter {
                name: "members",
                message: "must be non-empty",
            });
        }

        let (mut min, mut max, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);
        for &a in members_i {
            for &b in members_j {
                let d = base.leaf(a, b)?;
                min = min.min(d);
                max = max.max(d);
                sum += d;
            }
        }

        Ok(match self {
            Linkage::Single => min,
            Linkage::Complete => max,
            Linkage::Average => sum / (members_i.len() * members_j.len()) as f64,
        })
    }

    /// Short policy name: `min`, `max` or `avg`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Linkage::Single => "min",
            Linkage::Complete => "max",
            Linkage::Average => "avg",
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Linkage {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" | "single" => Ok(Linkage::Single),
            "max" | "complete" => Ok(Linkage::Complete),
            "avg" | "average" => Ok(Linkage::Average),
            _ => Err(Error::UnknownLinkage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::metric::Euclidean;

    fn base() -> DistanceMatrix {
        // 0 and 1 on the left, 2 and 3 on the right.
        let data = vec![vec![0.0], vec![1.0], vec![4.0], vec![6.0]];
        DistanceMatrix::build(&data, &Euclidean).unwrap()
    }

    #[test]
    fn single_complete_average() {
        let m = base();
        let a = [0, 1];
        let b = [2, 3];
        assert_eq!(Linkage::Single.combine(&a, &b, &m).unwrap(), 3.0);
        assert_eq!(Linkage::Complete.combine(&a, &b, &m).unwrap(), 6.0);
        // (4 + 6 + 3 + 5) / 4
        assert_eq!(Linkage::Average.combine(&a, &b, &m).unwrap(), 4.5);
    }

    #[test]
    fn singletons_reduce_to_leaf_distance() {
        let m = base();
        for linkage in [Linkage::Single, Linkage::Complete, Linkage::Average] {
            assert_eq!(linkage.combine(&[1], &[3], &m).unwrap(), 5.0);
        }
    }

    #[test]
    fn empty_member_set_is_an_error() {
        let m = base();
        for linkage in [Linkage::Single, Linkage::Complete, Linkage::Average] {
            assert!(matches!(
                linkage.combine(&[], &[0], &m),
                Err(Error::InvalidParameter { name: "members", .. })
            ));
            assert!(linkage.combine(&[0, 1], &[], &m).is_err());
        }
    }

    #[test]
    fn non_leaf_member_is_an_error() {
        let m = base();
        assert_eq!(
            Linkage::Average.combine(&[5], &[0], &m),
            Err(Error::InactiveCluster { id: 5 })
        );
        assert_eq!(
            Linkage::Single.combine(&[0, 1], &[2, 7], &m),
            Err(Error::InactiveCluster { id: 7 })
        );
    }

    #[test]
    fn parse_names() {
        assert_eq!("min".parse::<Linkage>().unwrap(), Linkage::Single);
        assert_eq!("MAX".parse::<Linkage>().unwrap(), Linkage::Complete);
        assert_eq!(" average ".parse::<Linkage>().unwrap(), Linkage::Average);
        let err = "ward".parse::<Linkage>().unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err, Error::UnknownLinkage("ward".to_string()));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for linkage in [Linkage::Single, Linkage::Complete, Linkage::Average] {
            assert_eq!(linkage.to_string().parse::<Linkage>().unwrap(), linkage);
        }
    }
}
