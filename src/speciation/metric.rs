//! Genetic distance metrics.
//!
//! A [`DistanceMetric`] measures the distance between two positions and
//! computes the centroid of a group of positions. The speciation engine
//! uses the metric as-is and never inspects genomes beyond their position.
//!
//! # Built-in Metrics
//!
//! - [`EuclideanDistance`]: L2 distance, centroid is the per-key mean
//! - [`ManhattanDistance`]: L1 distance, centroid is the per-key median

use super::coordinate::CoordinateVector;

/// Distance and centroid computation over [`CoordinateVector`]s.
///
/// `distance` must be symmetric and non-negative, and return `0.0` for
/// identical positions.
pub trait DistanceMetric: Send + Sync {
    /// Distance between two positions.
    fn distance(&self, a: &CoordinateVector, b: &CoordinateVector) -> f64;

    /// Centroid of a group of positions.
    ///
    /// Returns the empty vector for an empty group.
    fn centroid(&self, points: &[&CoordinateVector]) -> CoordinateVector;
}

/// Euclidean (L2) distance.
///
/// # Examples
///
/// ```
/// use neat_speciation::speciation::{CoordinateVector, DistanceMetric, EuclideanDistance};
///
/// let a = CoordinateVector::from_dense(&[0.0, 0.0]);
/// let b = CoordinateVector::from_dense(&[3.0, 4.0]);
/// assert!((EuclideanDistance.distance(&a, &b) - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EuclideanDistance;

impl DistanceMetric for EuclideanDistance {
    fn distance(&self, a: &CoordinateVector, b: &CoordinateVector) -> f64 {
        let mut sum = 0.0;
        a.merge_with(b, |x, y| {
            let d = x - y;
            sum += d * d;
        });
        sum.sqrt()
    }

    fn centroid(&self, points: &[&CoordinateVector]) -> CoordinateVector {
        if points.is_empty() {
            return CoordinateVector::default();
        }
        let n = points.len() as f64;
        let summed = CoordinateVector::new(
            points
                .iter()
                .flat_map(|p| p.iter().copied())
                .collect(),
        );
        CoordinateVector::from_sorted(summed.iter().map(|&(k, v)| (k, v / n)).collect())
    }
}

/// Manhattan (L1) distance.
///
/// The centroid is the per-key median, the point minimising summed L1
/// distance to the group. Keys absent from a position count as zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManhattanDistance;

impl DistanceMetric for ManhattanDistance {
    fn distance(&self, a: &CoordinateVector, b: &CoordinateVector) -> f64 {
        let mut sum = 0.0;
        a.merge_with(b, |x, y| sum += (x - y).abs());
        sum
    }

    fn centroid(&self, points: &[&CoordinateVector]) -> CoordinateVector {
        if points.is_empty() {
            return CoordinateVector::default();
        }
        let n = points.len();
        let mut all: Vec<(u64, f64)> = points.iter().flat_map(|p| p.iter().copied()).collect();
        all.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let mut elements = Vec::new();
        let mut start = 0;
        while start < all.len() {
            let key = all[start].0;
            let mut end = start;
            while end < all.len() && all[end].0 == key {
                end += 1;
            }
            let median = median_with_zeros(&all[start..end], n);
            if median != 0.0 {
                elements.push((key, median));
            }
            start = end;
        }
        CoordinateVector::from_sorted(elements)
    }
}

/// Median of `present` (sorted by value) padded with implicit zeros up to `n`.
fn median_with_zeros(present: &[(u64, f64)], n: usize) -> f64 {
    let zeros = n - present.len();
    let negatives = present.iter().take_while(|&&(_, v)| v < 0.0).count();
    let nth = |i: usize| -> f64 {
        if i < negatives {
            present[i].1
        } else if i < negatives + zeros {
            0.0
        } else {
            present[i - zeros].1
        }
    };
    if n % 2 == 1 {
        nth(n / 2)
    } else {
        (nth(n / 2 - 1) + nth(n / 2)) / 2.0
    }
}
