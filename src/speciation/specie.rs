//! A single specie: a cluster of genetically similar genomes.

use super::coordinate::CoordinateVector;
use super::error::{Result, SpeciationError};
use super::types::{Genome, SpecieId};

/// A cluster of genomes sharing a centroid.
///
/// Members are borrowed from the population snapshot of one generation;
/// the specie never owns genome lifetimes.
///
/// The centroid may be **stale** relative to the membership. Adding or
/// moving genomes never recomputes it; only the owning
/// [`SpecieSet`](super::SpecieSet) recentering operations do.
///
/// `idx` is derived state maintained by the owning set and has no public
/// setter.
#[derive(Debug)]
pub struct Specie<'a, G> {
    id: SpecieId,
    idx: usize,
    genomes: Vec<&'a G>,
    centroid: CoordinateVector,
}

impl<G> Clone for Specie<'_, G> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            idx: self.idx,
            genomes: self.genomes.clone(),
            centroid: self.centroid.clone(),
        }
    }
}

/// Aggregate statistics of one specie at one point in time.
///
/// This is the view consumed by offspring allocation and stagnation
/// tracking, which compare species across generations by `id`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecieStats {
    pub id: SpecieId,
    pub idx: usize,
    pub size: usize,
    pub total_fitness: f64,
    pub mean_fitness: f64,
    pub total_complexity: f64,
    pub mean_complexity: f64,
}

impl<'a, G> Specie<'a, G> {
    pub(crate) fn new(id: SpecieId, idx: usize, centroid: CoordinateVector) -> Self {
        Self {
            id,
            idx,
            genomes: Vec::new(),
            centroid,
        }
    }

    /// Unique id; never changes.
    pub fn id(&self) -> SpecieId {
        self.id
    }

    /// Position within the containing set.
    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Member genomes. Order carries no meaning.
    pub fn genomes(&self) -> &[&'a G] {
        &self.genomes
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Last centroid assigned by the owning set. May be stale.
    pub fn centroid(&self) -> &CoordinateVector {
        &self.centroid
    }

    pub(crate) fn set_idx(&mut self, idx: usize) {
        self.idx = idx;
    }

    pub(crate) fn set_centroid(&mut self, centroid: CoordinateVector) {
        self.centroid = centroid;
    }

    pub(crate) fn push(&mut self, genome: &'a G) {
        self.genomes.push(genome);
    }

    pub(crate) fn set_genomes(&mut self, genomes: Vec<&'a G>) {
        self.genomes = genomes;
    }
}

impl<'a, G: Genome> Specie<'a, G> {
    /// Sum of member fitness.
    ///
    /// Recomputed on every call; cache the result in hot loops.
    pub fn calc_total_fitness(&self) -> f64 {
        self.genomes.iter().map(|g| g.fitness()).sum()
    }

    /// Mean member fitness.
    ///
    /// # Errors
    /// [`SpeciationError::EmptySpecie`] when the specie has no members.
    pub fn calc_mean_fitness(&self) -> Result<f64> {
        self.mean(self.calc_total_fitness())
    }

    /// Sum of member complexity. Recomputed on every call.
    pub fn calc_total_complexity(&self) -> f64 {
        self.genomes.iter().map(|g| g.complexity()).sum()
    }

    /// Mean member complexity.
    ///
    /// # Errors
    /// [`SpeciationError::EmptySpecie`] when the specie has no members.
    pub fn calc_mean_complexity(&self) -> Result<f64> {
        self.mean(self.calc_total_complexity())
    }

    /// Fittest member (highest fitness, first in membership order on ties).
    pub fn best_genome(&self) -> Option<&'a G> {
        self.genomes.iter().copied().reduce(|best, g| {
            if g.fitness() > best.fitness() {
                g
            } else {
                best
            }
        })
    }

    /// Snapshot of all aggregate statistics.
    ///
    /// # Errors
    /// [`SpeciationError::EmptySpecie`] when the specie has no members.
    pub fn stats(&self) -> Result<SpecieStats> {
        let total_fitness = self.calc_total_fitness();
        let total_complexity = self.calc_total_complexity();
        Ok(SpecieStats {
            id: self.id,
            idx: self.idx,
            size: self.genomes.len(),
            total_fitness,
            mean_fitness: self.mean(total_fitness)?,
            total_complexity,
            mean_complexity: self.mean(total_complexity)?,
        })
    }

    fn mean(&self, total: f64) -> Result<f64> {
        if self.genomes.is_empty() {
            return Err(SpeciationError::EmptySpecie { id: self.id });
        }
        Ok(total / self.genomes.len() as f64)
    }
}
