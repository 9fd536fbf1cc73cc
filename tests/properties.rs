use std::collections::HashSet;

use proptest::prelude::*;
use tour_ga::distance::CostModel;
use tour_ga::evaluation::TourEvaluator;
use tour_ga::ga::{split, SplitStrategy};
use tour_ga::models::{Address, Coordinates, Instance, VehicleConstraints};
use tour_ga::{optimize_with, EngineConfig};

const DEPOT: Coordinates = Coordinates::new(48.1067, 11.4247);

fn build(points: &[(f64, f64, u32)]) -> Vec<Address> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(dlat, dlon, load))| {
            Address::new(
                format!("P{i}"),
                Coordinates::new(DEPOT.lat + dlat, DEPOT.lon + dlon),
                load,
            )
        })
        .collect()
}

fn points(max: usize) -> impl Strategy<Value = Vec<(f64, f64, u32)>> {
    prop::collection::vec((-0.2f64..0.2, -0.2f64..0.2, 1u32..60), 0..max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_tours_partition_input_and_respect_limits(
        pts in points(14),
        max_load in 10u32..120,
        max_stops in 1u32..6,
        seed in any::<u64>(),
    ) {
        let input = build(&pts);
        let constraints = VehicleConstraints::default()
            .with_max_load(max_load)
            .with_max_stops(max_stops)
            .with_max_duration(f64::INFINITY);
        let config = EngineConfig::default()
            .with_population_size(12)
            .with_max_generations(8)
            .with_seed(seed);
        let result = optimize_with(&input, DEPOT, &constraints, &config).unwrap();

        let mut seen = HashSet::new();
        for tour in &result.tours {
            prop_assert!(!tour.is_empty());
            for id in tour.address_ids() {
                prop_assert!(seen.insert(id.to_string()));
            }
            prop_assert!(tour.len() <= max_stops as usize);
            let singleton_overload = tour.len() == 1 && tour.total_load() > u64::from(max_load);
            prop_assert!(tour.total_load() <= u64::from(max_load) || singleton_overload);
        }
        prop_assert_eq!(seen.len(), input.len());

        let s = &result.statistics;
        prop_assert_eq!(s.total_tours, result.tours.len());
        let sum: f64 = result.tours.iter().map(|t| t.estimated_distance()).sum();
        prop_assert!((s.total_distance - sum).abs() < 1e-6);
        prop_assert!(s.optimization_score > 0.0 && s.optimization_score <= 1.0);
        if !input.is_empty() {
            prop_assert!(result.metadata.iterations > 0);
        }
    }

    #[test]
    fn prop_tighter_capacity_never_fewer_tours(
        pts in points(20),
        loose in 40u32..200,
        cut in 1u32..40,
    ) {
        let input = build(&pts);
        let order: Vec<usize> = (0..input.len()).rev().collect();
        let tours = |max_load: u32| {
            let c = VehicleConstraints::unlimited().with_max_load(max_load);
            let inst = Instance::new(&input, DEPOT, &c, CostModel::default());
            let eval = TourEvaluator::new(&inst);
            split(&order, &eval, SplitStrategy::Greedy).routes.len()
        };
        prop_assert!(tours(loose - cut) >= tours(loose));
    }

    #[test]
    fn prop_optimal_split_no_longer_than_greedy(pts in points(16), max_load in 20u32..100) {
        let input = build(&pts);
        let c = VehicleConstraints::default().with_max_load(max_load).with_max_duration(f64::INFINITY);
        let inst = Instance::new(&input, DEPOT, &c, CostModel::default());
        let eval = TourEvaluator::new(&inst);
        let order: Vec<usize> = (0..input.len()).collect();
        let greedy = split(&order, &eval, SplitStrategy::Greedy);
        let optimal = split(&order, &eval, SplitStrategy::Optimal);
        prop_assert!(optimal.total_distance() <= greedy.total_distance() + 1e-9);
        let flat: Vec<usize> = optimal.routes.concat();
        prop_assert_eq!(flat, order);
    }
}
