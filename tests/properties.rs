//! Property tests for speciation invariants.

use proptest::prelude::*;

use neat_speciation::speciation::{
    CoordinateVector, EuclideanDistance, Genome, SpeciationConfig, SpeciationStrategy, SpecieSet,
    ThresholdConfig, ThresholdController,
};

#[derive(Debug)]
struct Point {
    fitness: f64,
    complexity: f64,
    position: CoordinateVector,
}

impl Genome for Point {
    fn fitness(&self) -> f64 {
        self.fitness
    }
    fn complexity(&self) -> f64 {
        self.complexity
    }
    fn position(&self) -> &CoordinateVector {
        &self.position
    }
}

fn population(coords: &[(f64, f64)]) -> Vec<Point> {
    coords
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| Point {
            fitness: x.abs() + i as f64,
            complexity: (i % 7) as f64,
            position: CoordinateVector::from_dense(&[x, y]),
        })
        .collect()
}

fn strategy() -> SpeciationStrategy<EuclideanDistance> {
    SpeciationStrategy::new(
        EuclideanDistance,
        SpeciationConfig::default().with_parallel(false),
    )
    .unwrap()
}

/// Membership as population indices, per specie, in index order.
fn membership(set: &SpecieSet<'_, Point>, pop: &[Point]) -> Vec<Vec<usize>> {
    set.iter()
        .map(|s| {
            s.genomes()
                .iter()
                .map(|g| {
                    pop.iter()
                        .position(|p| std::ptr::eq(p, *g))
                        .expect("member comes from the population")
                })
                .collect()
        })
        .collect()
}

fn coords() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-20.0f64..20.0, -20.0f64..20.0), 0..60)
}

proptest! {
    #[test]
    fn every_genome_in_exactly_one_specie(
        prev_coords in coords(),
        cur_coords in coords(),
        threshold in 0.0f64..15.0,
    ) {
        let prev_pop = population(&prev_coords);
        let pop = population(&cur_coords);
        let s = strategy();
        let prev = s.speciate(&prev_pop, &SpecieSet::new(), threshold).unwrap();
        let set = s.speciate(&pop, &prev, threshold).unwrap();

        let mut seen: Vec<usize> = membership(&set, &pop).into_iter().flatten().collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..pop.len()).collect::<Vec<_>>());
        prop_assert!(set.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn idx_contiguous_and_ids_increasing(
        prev_coords in coords(),
        cur_coords in coords(),
        threshold in 0.0f64..15.0,
    ) {
        let prev_pop = population(&prev_coords);
        let pop = population(&cur_coords);
        let s = strategy();
        let prev = s.speciate(&prev_pop, &SpecieSet::new(), threshold).unwrap();
        let set = s.speciate(&pop, &prev, threshold).unwrap();

        let idxs: Vec<usize> = set.iter().map(|s| s.idx()).collect();
        prop_assert_eq!(idxs, (0..set.len()).collect::<Vec<_>>());
        prop_assert!(set.validate().is_ok());
        prop_assert!(set.next_id() >= prev.next_id());
        for sp in &set {
            prop_assert!(sp.id() < set.next_id());
            // surviving ids come from the previous set, new ones follow it
            if sp.id() < prev.next_id() {
                prop_assert!(prev.find_by_id(sp.id()).is_some());
            }
        }
    }

    #[test]
    fn speciation_is_deterministic(
        prev_coords in coords(),
        cur_coords in coords(),
        threshold in 0.0f64..15.0,
    ) {
        let prev_pop = population(&prev_coords);
        let pop = population(&cur_coords);
        let s = strategy();
        let prev = s.speciate(&prev_pop, &SpecieSet::new(), threshold).unwrap();

        let a = s.speciate(&pop, &prev, threshold).unwrap();
        let b = s.speciate(&pop, &prev, threshold).unwrap();
        prop_assert_eq!(membership(&a, &pop), membership(&b, &pop));
        let ids_a: Vec<u32> = a.iter().map(|s| s.id()).collect();
        let ids_b: Vec<u32> = b.iter().map(|s| s.id()).collect();
        prop_assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn mean_statistics_match_totals(
        cur_coords in coords(),
        threshold in 0.0f64..15.0,
    ) {
        let pop = population(&cur_coords);
        let set = strategy().speciate(&pop, &SpecieSet::new(), threshold).unwrap();
        for sp in &set {
            let n = sp.len() as f64;
            prop_assert_eq!(sp.calc_mean_fitness().unwrap(), sp.calc_total_fitness() / n);
            prop_assert_eq!(sp.calc_mean_complexity().unwrap(), sp.calc_total_complexity() / n);
        }
    }

    #[test]
    fn refine_preserves_partition(
        cur_coords in coords(),
        threshold in 0.5f64..15.0,
        iterations in 0usize..8,
    ) {
        let pop = population(&cur_coords);
        let s = strategy();
        let mut set = s.speciate(&pop, &SpecieSet::new(), threshold).unwrap();
        s.refine(&mut set, iterations).unwrap();

        let mut seen: Vec<usize> = membership(&set, &pop).into_iter().flatten().collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..pop.len()).collect::<Vec<_>>());
        prop_assert!(set.validate().is_ok());
    }

    #[test]
    fn threshold_responds_monotonically(
        current in 0.01f64..100.0,
        realized in 0usize..200,
        target in 1usize..100,
    ) {
        let ctl = ThresholdController::new(
            ThresholdConfig::default().with_bounds(0.01, 100.0),
        )
        .unwrap();
        let next = ctl.next_threshold(current, realized, target).unwrap();
        prop_assert!((0.01..=100.0).contains(&next));
        if realized > target {
            prop_assert!(next > current || next == 100.0);
        } else if realized < target {
            prop_assert!(next < current || next == 0.01);
        } else {
            prop_assert_eq!(next, current);
        }
    }

    #[test]
    fn damped_updates_stay_monotonic(
        counts in prop::collection::vec(0usize..40, 1..30),
    ) {
        let mut ctl = ThresholdController::new(
            ThresholdConfig::default()
                .with_target_specie_count(10)
                .with_bounds(0.01, 100.0),
        )
        .unwrap();
        for realized in counts {
            let before = ctl.threshold();
            let after = ctl.update(realized);
            if realized > 10 {
                prop_assert!(after > before || after == 100.0);
            } else if realized < 10 {
                prop_assert!(after < before || after == 0.01);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }
}

proptest! {
    #[test]
    fn extinction_keeps_idx_contiguous(survivors in prop::collection::vec(any::<bool>(), 0..30)) {
        // points 10 apart each found their own specie at threshold 1
        let coords: Vec<(f64, f64)> = (0..survivors.len()).map(|i| (i as f64 * 10.0, 0.0)).collect();
        let gen0 = population(&coords);
        let s = strategy();
        let prev = s.speciate(&gen0, &SpecieSet::new(), 1.0).unwrap();
        prop_assert_eq!(prev.len(), survivors.len());

        let kept: Vec<(f64, f64)> = coords
            .iter()
            .zip(&survivors)
            .filter(|(_, &keep)| keep)
            .map(|(&c, _)| c)
            .collect();
        let gen1 = population(&kept);
        let next = s.speciate(&gen1, &prev, 1.0).unwrap();

        let expected_ids: Vec<u32> = survivors
            .iter()
            .enumerate()
            .filter(|(_, &keep)| keep)
            .map(|(i, _)| i as u32)
            .collect();
        let ids: Vec<u32> = next.iter().map(|s| s.id()).collect();
        prop_assert_eq!(ids, expected_ids);
        let idxs: Vec<usize> = next.iter().map(|s| s.idx()).collect();
        prop_assert_eq!(idxs, (0..next.len()).collect::<Vec<_>>());
    }
}
