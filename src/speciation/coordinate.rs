//! Sparse positions in genetic-distance space.

/// A sparse coordinate vector.
///
/// Elements are `(key, value)` pairs kept sorted by key with no duplicate
/// keys; absent keys are implicit zeros. For NEAT genomes the keys are
/// typically connection innovation ids and the values connection weights.
///
/// # Examples
///
/// ```
/// use neat_speciation::speciation::CoordinateVector;
///
/// let v = CoordinateVector::new(vec![(7, 0.5), (2, 1.0), (7, 0.25)]);
/// assert_eq!(v.len(), 2);
/// assert_eq!(v.get(7), 0.75);
/// assert_eq!(v.get(3), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordinateVector {
    elements: Vec<(u64, f64)>,
}

impl CoordinateVector {
    /// Builds a vector from unordered pairs. Values sharing a key are summed.
    pub fn new(mut pairs: Vec<(u64, f64)>) -> Self {
        pairs.sort_by_key(|&(k, _)| k);
        let mut elements: Vec<(u64, f64)> = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            match elements.last_mut() {
                Some(last) if last.0 == key => last.1 += value,
                _ => elements.push((key, value)),
            }
        }
        Self { elements }
    }

    /// Builds a vector from a dense slice; element `i` gets key `i`.
    pub fn from_dense(values: &[f64]) -> Self {
        Self {
            elements: values
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as u64, v))
                .collect(),
        }
    }

    /// Builds a vector from pairs already sorted by strictly increasing key.
    pub(crate) fn from_sorted(elements: Vec<(u64, f64)>) -> Self {
        debug_assert!(elements.windows(2).all(|w| w[0].0 < w[1].0));
        Self { elements }
    }

    /// Value stored under `key`, or `0.0` when absent.
    pub fn get(&self, key: u64) -> f64 {
        self.elements
            .binary_search_by_key(&key, |&(k, _)| k)
            .map(|i| self.elements[i].1)
            .unwrap_or(0.0)
    }

    /// Number of explicitly stored elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Stored elements in key order.
    pub fn elements(&self) -> &[(u64, f64)] {
        &self.elements
    }

    pub fn iter(&self) -> impl Iterator<Item = &(u64, f64)> {
        self.elements.iter()
    }

    /// Visits every key present in either vector, in key order, with the
    /// pair of values (zero where absent).
    pub(crate) fn merge_with<F>(&self, other: &Self, mut f: F)
    where
        F: FnMut(f64, f64),
    {
        let (a, b) = (&self.elements, &other.elements);
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let (ka, va) = a[i];
            let (kb, vb) = b[j];
            if ka < kb {
                f(va, 0.0);
                i += 1;
            } else if kb < ka {
                f(0.0, vb);
                j += 1;
            } else {
                f(va, vb);
                i += 1;
                j += 1;
            }
        }
        for &(_, va) in &a[i..] {
            f(va, 0.0);
        }
        for &(_, vb) in &b[j..] {
            f(0.0, vb);
        }
    }
}
