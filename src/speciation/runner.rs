//! Per-generation speciation step.
//!
//! [`SpeciationRunner`] wires the pieces together in generation order:
//! threshold → clustering → optional recentering → threshold update.

use log::info;

use super::error::Result;
use super::metric::DistanceMetric;
use super::set::SpecieSet;
use super::strategy::SpeciationStrategy;
use super::threshold::ThresholdController;
use super::types::{Genome, SpecieId};

/// Result of one generation's speciation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome<'a, G> {
    /// Species of this generation, ready to hand downstream.
    pub species: SpecieSet<'a, G>,

    /// Threshold used for this generation's clustering.
    pub threshold: f64,

    /// Threshold the next generation will use.
    pub next_threshold: f64,

    /// Ids of species founded this generation, in index order.
    pub created: Vec<SpecieId>,

    /// Ids of previous species with no members this generation.
    pub extinct: Vec<SpecieId>,
}

/// Runs speciation once per generation and keeps the threshold controller
/// in step with the realised specie count.
///
/// # Usage
///
/// ```ignore
/// let strategy = SpeciationStrategy::with_metric(EuclideanDistance);
/// let controller = ThresholdController::new(ThresholdConfig::default())?;
/// let mut runner = SpeciationRunner::new(strategy, controller);
///
/// let gen0 = runner.run_generation(&population0, &SpecieSet::new())?;
/// let gen1 = runner.run_generation(&population1, &gen0.species)?;
/// ```
#[derive(Debug, Clone)]
pub struct SpeciationRunner<M> {
    strategy: SpeciationStrategy<M>,
    controller: ThresholdController,
}

impl<M: DistanceMetric> SpeciationRunner<M> {
    pub fn new(strategy: SpeciationStrategy<M>, controller: ThresholdController) -> Self {
        Self {
            strategy,
            controller,
        }
    }

    pub fn strategy(&self) -> &SpeciationStrategy<M> {
        &self.strategy
    }

    pub fn controller(&self) -> &ThresholdController {
        &self.controller
    }

    /// Speciates `population` against `previous`.
    ///
    /// The population must be fully evaluated. `previous` is only read; the
    /// outcome holds a new set. An empty population yields an empty set and
    /// leaves the threshold where it was.
    ///
    /// # Errors
    /// Propagates errors from [`SpeciationStrategy::speciate`]. The
    /// controller is not advanced when an error occurs.
    pub fn run_generation<'a, G: Genome>(
        &mut self,
        population: &'a [G],
        previous: &SpecieSet<'_, G>,
    ) -> Result<GenerationOutcome<'a, G>> {
        let threshold = self.controller.threshold();
        let mut species = self.strategy.speciate(population, previous, threshold)?;
        if self.strategy.config().eager_recenter {
            species.recenter(self.strategy.metric());
        }

        let first_new = previous.next_id();
        let created: Vec<SpecieId> = species
            .iter()
            .map(|s| s.id())
            .filter(|&id| id >= first_new)
            .collect();
        let extinct: Vec<SpecieId> = previous
            .iter()
            .map(|s| s.id())
            .filter(|&id| species.find_by_id(id).is_none())
            .collect();

        let next_threshold = if population.is_empty() {
            threshold
        } else {
            self.controller.update(species.len())
        };

        info!(
            "{} species ({} new, {} extinct), threshold {:.4} -> {:.4}",
            species.len(),
            created.len(),
            extinct.len(),
            threshold,
            next_threshold
        );

        Ok(GenerationOutcome {
            species,
            threshold,
            next_threshold,
            created,
            extinct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speciation::{
        CoordinateVector, EuclideanDistance, SpeciationConfig, ThresholdConfig,
    };

    struct Point {
        position: CoordinateVector,
    }

    impl Genome for Point {
        fn fitness(&self) -> f64 {
            1.0
        }
        fn complexity(&self) -> f64 {
            1.0
        }
        fn position(&self) -> &CoordinateVector {
            &self.position
        }
    }

    fn pop(xs: &[f64]) -> Vec<Point> {
        xs.iter()
            .map(|&x| Point {
                position: CoordinateVector::from_dense(&[x]),
            })
            .collect()
    }

    fn runner(eager: bool, target: usize) -> SpeciationRunner<EuclideanDistance> {
        let strategy = SpeciationStrategy::new(
            EuclideanDistance,
            SpeciationConfig::default()
                .with_parallel(false)
                .with_eager_recenter(eager),
        )
        .unwrap();
        let controller = ThresholdController::new(
            ThresholdConfig::default()
                .with_target_specie_count(target)
                .with_initial_threshold(1.0),
        )
        .unwrap();
        SpeciationRunner::new(strategy, controller)
    }

    #[test]
    fn test_generation_tracks_created_and_extinct() {
        let mut r = runner(true, 2);
        let p0 = pop(&[0.0, 10.0, 20.0]);
        let g0 = r.run_generation(&p0, &SpecieSet::new()).unwrap();
        assert_eq!(g0.created, vec![0, 1, 2]);
        assert!(g0.extinct.is_empty());

        let p1 = pop(&[0.1, 20.1, 40.0]);
        let g1 = r.run_generation(&p1, &g0.species).unwrap();
        assert_eq!(g1.created, vec![3]);
        assert_eq!(g1.extinct, vec![1]);
    }

    #[test]
    fn test_threshold_follows_specie_count() {
        let mut r = runner(true, 1);
        let p0 = pop(&[0.0, 10.0, 20.0]);
        let g0 = r.run_generation(&p0, &SpecieSet::new()).unwrap();
        assert_eq!(g0.threshold, 1.0);
        assert!(g0.next_threshold > 1.0);
        assert_eq!(r.controller().threshold(), g0.next_threshold);
    }

    #[test]
    fn test_eager_recenter() {
        let p0 = pop(&[0.0, 0.5]);

        let mut eager = runner(true, 1);
        let g = eager.run_generation(&p0, &SpecieSet::new()).unwrap();
        assert_eq!(g.species.get(0).unwrap().centroid().get(0), 0.25);

        let mut lazy = runner(false, 1);
        let g = lazy.run_generation(&p0, &SpecieSet::new()).unwrap();
        assert_eq!(g.species.get(0).unwrap().centroid().get(0), 0.0);
    }

    #[test]
    fn test_empty_population_keeps_threshold() {
        let mut r = runner(true, 5);
        let p: Vec<Point> = Vec::new();
        let g = r.run_generation(&p, &SpecieSet::new()).unwrap();
        assert!(g.species.is_empty());
        assert_eq!(g.next_threshold, 1.0);
        assert_eq!(r.controller().threshold(), 1.0);
    }
}
