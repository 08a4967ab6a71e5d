//! Centroid clustering with creation on miss.
//!
//! [`SpeciationStrategy`] partitions a population into species:
//!
//! 1. Carry every specie of the previous set forward with its centroid and
//!    no members. Continuity comes from reusing centroids keyed by id.
//! 2. Visit genomes in population order. Each joins the nearest centroid if
//!    that distance is within the threshold; otherwise it founds a new
//!    specie centred on its own position.
//! 3. Remove species that attracted no genome and compact indices.
//!
//! Centroids are **not** recomputed. The returned set still carries the
//! seed centroids so the caller can recenter eagerly
//! ([`SpecieSet::recenter`]) or lazily.
//!
//! # References
//!
//! - Stanley & Miikkulainen (2002), "Evolving Neural Networks through
//!   Augmenting Topologies"
//! - MacQueen (1967), "Some Methods for Classification and Analysis of
//!   Multivariate Observations"

use log::{debug, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::SpeciationConfig;
use super::coordinate::CoordinateVector;
use super::error::{Result, SpeciationError};
use super::metric::DistanceMetric;
use super::set::SpecieSet;
use super::types::Genome;

/// Assigns genomes to species by distance to specie centroids.
///
/// # Usage
///
/// ```
/// use neat_speciation::speciation::{
///     CoordinateVector, EuclideanDistance, Genome, SpeciationStrategy, SpecieSet,
/// };
///
/// struct G(CoordinateVector);
/// impl Genome for G {
///     fn fitness(&self) -> f64 { 1.0 }
///     fn complexity(&self) -> f64 { 1.0 }
///     fn position(&self) -> &CoordinateVector { &self.0 }
/// }
///
/// let population: Vec<G> = [0.0, 0.2, 5.0]
///     .iter()
///     .map(|&x| G(CoordinateVector::from_dense(&[x])))
///     .collect();
///
/// let strategy = SpeciationStrategy::with_metric(EuclideanDistance);
/// let species = strategy
///     .speciate(&population, &SpecieSet::new(), 1.0)
///     .unwrap();
/// assert_eq!(species.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SpeciationStrategy<M> {
    metric: M,
    config: SpeciationConfig,
}

impl<M: DistanceMetric> SpeciationStrategy<M> {
    /// Creates a strategy.
    ///
    /// # Errors
    /// [`SpeciationError::InvalidConfig`] if `config` does not validate.
    pub fn new(metric: M, config: SpeciationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { metric, config })
    }

    /// Creates a strategy with the default configuration.
    pub fn with_metric(metric: M) -> Self {
        Self {
            metric,
            config: SpeciationConfig::default(),
        }
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn config(&self) -> &SpeciationConfig {
        &self.config
    }

    /// Partitions `population` into species, continuing the identities of
    /// `previous`.
    ///
    /// Every genome lands in exactly one specie. Species of `previous` that
    /// attract no genome are dropped; new species get ids from
    /// `previous.next_id()` upward in population order. The result is
    /// deterministic in its inputs.
    ///
    /// # Errors
    /// [`SpeciationError::InvalidConfig`] for a negative or non-finite
    /// threshold.
    pub fn speciate<'a, G: Genome>(
        &self,
        population: &'a [G],
        previous: &SpecieSet<'_, G>,
        threshold: f64,
    ) -> Result<SpecieSet<'a, G>> {
        check_threshold(threshold)?;

        let mut set = previous.carry_forward();
        let carried = set.len();
        self.assign(population, &mut set, threshold);
        let created = set.len() - carried;
        let extinct = set.remove_extinct();
        set.validate()?;

        debug!(
            "speciated {} genomes into {} species at threshold {:.4} ({} new, {} extinct)",
            population.len(),
            set.len(),
            threshold,
            created,
            extinct
        );
        Ok(set)
    }

    /// Adds `offspring` to an existing set without clearing it.
    ///
    /// Uses the same nearest-centroid-or-create rule as
    /// [`speciate`](Self::speciate) and likewise leaves centroids untouched.
    ///
    /// # Errors
    /// [`SpeciationError::InvalidConfig`] for a negative or non-finite
    /// threshold.
    pub fn speciate_offspring<'a, G: Genome>(
        &self,
        offspring: &'a [G],
        set: &mut SpecieSet<'a, G>,
        threshold: f64,
    ) -> Result<()> {
        check_threshold(threshold)?;
        let before = set.len();
        self.assign(offspring, set, threshold);
        debug!(
            "placed {} offspring, {} new species",
            offspring.len(),
            set.len() - before
        );
        Ok(())
    }

    /// Runs k-means refinement over an existing set.
    ///
    /// Each iteration recenters every specie, then moves each genome to its
    /// nearest centroid. Stops after an iteration with no moves or after
    /// `max_iterations`, recenters once more and removes species left
    /// empty. Returns the total number of moves.
    ///
    /// This is never invoked by [`speciate`](Self::speciate).
    ///
    /// # Errors
    /// Invariant violations reported by [`SpecieSet::validate`].
    pub fn refine<'a, G: Genome>(
        &self,
        set: &mut SpecieSet<'a, G>,
        max_iterations: usize,
    ) -> Result<usize> {
        set.validate()?;
        let mut total_moves = 0;

        for iteration in 0..max_iterations {
            set.recenter(&self.metric);

            let centroids: Vec<&CoordinateVector> = set.iter().map(|s| s.centroid()).collect();
            let mut targets: Vec<Vec<&'a G>> = vec![Vec::new(); set.len()];
            let mut moves = 0;
            for (i, specie) in set.iter().enumerate() {
                for &genome in specie.genomes() {
                    let distances: Vec<f64> = centroids
                        .iter()
                        .map(|c| self.metric.distance(genome.position(), c))
                        .collect();
                    let j = self.nearest(&distances, f64::INFINITY).map_or(i, |(j, _)| j);
                    if j != i {
                        moves += 1;
                    }
                    targets[j].push(genome);
                }
            }

            for (specie, members) in set.species_mut().iter_mut().zip(targets) {
                specie.set_genomes(members);
            }
            total_moves += moves;
            trace!("refine iteration {}: {} moves", iteration, moves);
            if moves == 0 {
                break;
            }
        }

        set.recenter(&self.metric);
        let extinct = set.remove_extinct();
        debug!(
            "refinement moved {} genomes, {} species extinct",
            total_moves, extinct
        );
        Ok(total_moves)
    }

    fn assign<'a, G: Genome>(&self, genomes: &'a [G], set: &mut SpecieSet<'a, G>, threshold: f64) {
        let seeds = set.len();
        let seed_distances = self.seed_distances(genomes, set);

        for (genome, mut distances) in genomes.iter().zip(seed_distances) {
            let position = genome.position();
            distances.extend(
                set.as_slice()[seeds..]
                    .iter()
                    .map(|s| self.metric.distance(position, s.centroid())),
            );
            match self.nearest(&distances, threshold) {
                Some((idx, _)) => set.push_genome(idx, genome),
                None => {
                    set.add(position.clone());
                    set.push_genome(set.len() - 1, genome);
                }
            }
        }
    }

    /// Distances from every genome to every centroid present before the
    /// pass started. These centroids do not change during the pass.
    #[cfg(feature = "parallel")]
    fn seed_distances<G: Genome>(&self, genomes: &[G], set: &SpecieSet<'_, G>) -> Vec<Vec<f64>> {
        if !self.config.parallel {
            return self.seed_distances_seq(genomes, set);
        }
        let centroids: Vec<&CoordinateVector> = set.iter().map(|s| s.centroid()).collect();
        genomes
            .par_iter()
            .map(|g| {
                centroids
                    .iter()
                    .map(|c| self.metric.distance(g.position(), c))
                    .collect::<Vec<f64>>()
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn seed_distances<G: Genome>(&self, genomes: &[G], set: &SpecieSet<'_, G>) -> Vec<Vec<f64>> {
        self.seed_distances_seq(genomes, set)
    }

    fn seed_distances_seq<G: Genome>(
        &self,
        genomes: &[G],
        set: &SpecieSet<'_, G>,
    ) -> Vec<Vec<f64>> {
        let centroids: Vec<&CoordinateVector> = set.iter().map(|s| s.centroid()).collect();
        genomes
            .iter()
            .map(|g| {
                centroids
                    .iter()
                    .map(|c| self.metric.distance(g.position(), c))
                    .collect::<Vec<f64>>()
            })
            .collect()
    }

    /// Index of the nearest centroid within `limit`, and its distance.
    ///
    /// `distances` is in index order, which is also id order, so the first
    /// entry within `tie_tolerance` of the minimum has the lowest id. A tie
    /// candidate must itself lie within `limit`. NaN distances never win.
    fn nearest(&self, distances: &[f64], limit: f64) -> Option<(usize, f64)> {
        let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
        if !min.is_finite() || min > limit {
            return None;
        }
        let bound = (min + self.config.tie_tolerance).min(limit);
        distances
            .iter()
            .position(|&d| d <= bound)
            .map(|idx| (idx, distances[idx]))
    }
}

fn check_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(SpeciationError::InvalidConfig(format!(
            "threshold must be finite and non-negative, got {threshold}"
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
