//! Ordered collection of species for one generation.

use super::coordinate::CoordinateVector;
use super::error::{Result, SpeciationError};
use super::metric::DistanceMetric;
use super::specie::{Specie, SpecieStats};
use super::types::{Genome, SpecieId};

/// The species of one generation, in index order.
///
/// Invariants maintained by every mutating operation:
///
/// - `idx` values form the contiguous range `[0, len)`.
/// - Ids strictly increase in index order. New species take the next id
///   from a counter that only grows, and compaction is stable, so this
///   holds for the lifetime of the population. [`find_by_id`] relies on it
///   for binary search.
///
/// A set produced for generation N is handed downstream as a read-only
/// snapshot. Generation N+1 starts from [`carry_forward`], which builds a
/// fresh set instead of mutating this one.
///
/// [`find_by_id`]: SpecieSet::find_by_id
/// [`carry_forward`]: SpecieSet::carry_forward
#[derive(Debug)]
pub struct SpecieSet<'a, G> {
    species: Vec<Specie<'a, G>>,
    next_id: SpecieId,
}

impl<G> Clone for SpecieSet<'_, G> {
    fn clone(&self) -> Self {
        Self {
            species: self.species.clone(),
            next_id: self.next_id,
        }
    }
}

impl<G> Default for SpecieSet<'_, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, G> SpecieSet<'a, G> {
    /// Empty set whose first specie will get id 0.
    pub fn new() -> Self {
        Self {
            species: Vec::new(),
            next_id: 0,
        }
    }

    /// Creates an empty specie centred on `centroid`, appends it and
    /// returns its freshly allocated id.
    pub fn add(&mut self, centroid: CoordinateVector) -> SpecieId {
        let id = self.next_id;
        self.next_id += 1;
        let idx = self.species.len();
        self.species.push(Specie::new(id, idx, centroid));
        id
    }

    /// Removes every specie without members and re-indexes the survivors.
    ///
    /// Survivors keep their relative order. Returns how many were removed.
    pub fn remove_extinct(&mut self) -> usize {
        let before = self.species.len();
        self.species.retain(|s| !s.is_empty());
        for (idx, s) in self.species.iter_mut().enumerate() {
            s.set_idx(idx);
        }
        before - self.species.len()
    }

    /// Looks up a specie by id in `O(log n)`.
    ///
    /// Returns `None` for ids that never existed or have gone extinct.
    pub fn find_by_id(&self, id: SpecieId) -> Option<&Specie<'a, G>> {
        self.position_of(id).map(|i| &self.species[i])
    }

    /// Specie at index `idx`.
    pub fn get(&self, idx: usize) -> Option<&Specie<'a, G>> {
        self.species.get(idx)
    }

    /// Species in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Specie<'a, G>> {
        self.species.iter()
    }

    pub fn as_slice(&self) -> &[Specie<'a, G>] {
        &self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Id the next created specie will receive.
    pub fn next_id(&self) -> SpecieId {
        self.next_id
    }

    /// Total number of genomes across all species.
    pub fn genome_count(&self) -> usize {
        self.species.iter().map(|s| s.len()).sum()
    }

    /// Checks the index and id invariants.
    ///
    /// # Errors
    /// [`SpeciationError::NonContiguousIdx`] or [`SpeciationError::IdOrder`].
    pub fn validate(&self) -> Result<()> {
        for (expected, s) in self.species.iter().enumerate() {
            if s.idx() != expected {
                return Err(SpeciationError::NonContiguousIdx {
                    expected,
                    found: s.idx(),
                });
            }
        }
        for w in self.species.windows(2) {
            if w[1].id() <= w[0].id() {
                return Err(SpeciationError::IdOrder {
                    previous: w[0].id(),
                    found: w[1].id(),
                });
            }
        }
        Ok(())
    }

    /// Overwrites the centroid of one specie.
    ///
    /// For callers that compute centroids with their own function.
    ///
    /// # Errors
    /// [`SpeciationError::UnknownSpecie`] if no specie has this id.
    pub fn set_centroid(&mut self, id: SpecieId, centroid: CoordinateVector) -> Result<()> {
        let i = self
            .position_of(id)
            .ok_or(SpeciationError::UnknownSpecie(id))?;
        self.species[i].set_centroid(centroid);
        Ok(())
    }

    /// Builds next generation's starting set: same ids, order and
    /// centroids, no members.
    pub fn carry_forward<'b>(&self) -> SpecieSet<'b, G>
    where
        G: 'b,
    {
        SpecieSet {
            species: self
                .species
                .iter()
                .map(|s| Specie::new(s.id(), s.idx(), s.centroid().clone()))
                .collect(),
            next_id: self.next_id,
        }
    }

    pub(crate) fn push_genome(&mut self, idx: usize, genome: &'a G) {
        self.species[idx].push(genome);
    }

    pub(crate) fn species_mut(&mut self) -> &mut [Specie<'a, G>] {
        &mut self.species
    }

    fn position_of(&self, id: SpecieId) -> Option<usize> {
        self.species.binary_search_by_key(&id, |s| s.id()).ok()
    }
}

impl<'a, G: Genome> SpecieSet<'a, G> {
    /// Recomputes the centroid of every non-empty specie from its members.
    ///
    /// Empty species keep their previous centroid.
    pub fn recenter<M: DistanceMetric>(&mut self, metric: &M) {
        for s in &mut self.species {
            if s.is_empty() {
                continue;
            }
            let points: Vec<&CoordinateVector> = s.genomes().iter().map(|g| g.position()).collect();
            let centroid = metric.centroid(&points);
            s.set_centroid(centroid);
        }
    }

    /// Statistics for every specie in index order.
    ///
    /// # Errors
    /// [`SpeciationError::EmptySpecie`] if extinct species were not removed.
    pub fn stats(&self) -> Result<Vec<SpecieStats>> {
        self.species.iter().map(|s| s.stats()).collect()
    }
}

impl<'s, 'a, G> IntoIterator for &'s SpecieSet<'a, G> {
    type Item = &'s Specie<'a, G>;
    type IntoIter = std::slice::Iter<'s, Specie<'a, G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.species.iter()
    }
}
