//! Turns the best genome into the public result: tours, statistics, and
//! run metadata.

use std::time::Duration;

use chrono::Utc;
use tracing::{instrument, warn};

use crate::evaluation::FitnessEvaluator;
use crate::ga::split;
use crate::local_search::two_opt_improve;
use crate::models::{Metadata, OptimizationResult, Statistics, TerminationReason, Tour, ViolationType};

/// Algorithm identifier stamped on every result.
pub const ALGORITHM: &str = "genetic-giant-tour";

/// Facts about the run that produced the genome.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub generations: usize,
    pub termination: TerminationReason,
    pub seed: u64,
    pub population_size: usize,
    /// Best GA cost per generation, before polishing.
    pub convergence: Vec<f64>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Summary of a run that never started because there was nothing to route.
    pub fn trivial(seed: u64, population_size: usize, elapsed: Duration) -> Self {
        Self {
            generations: 0,
            termination: TerminationReason::Trivial,
            seed,
            population_size,
            convergence: Vec::new(),
            elapsed,
        }
    }
}

/// Splits `order` into tours, optionally polishes each with 2-opt, and
/// computes statistics and metadata.
#[instrument(level = "debug", skip_all, fields(addresses = order.len()))]
pub fn assemble(
    fitness: &FitnessEvaluator<'_>,
    order: &[usize],
    polish: bool,
    run: RunSummary,
) -> OptimizationResult {
    let evaluator = fitness.tour_evaluator();
    let instance = evaluator.instance();
    let cut = split(order, evaluator, fitness.strategy());

    let mut tours = Vec::with_capacity(cut.routes.len());
    let mut cost = 0.0;
    for (k, route) in cut.routes.into_iter().enumerate() {
        let route = if polish {
            two_opt_improve(&route, instance).0
        } else {
            route
        };
        let m = evaluator.measure(&route);
        cost += fitness.tour_cost(&route, &m);
        tours.push(evaluator.build_tour(k + 1, &route));
    }

    let statistics = statistics(fitness, &tours, cost);
    for tour in &tours {
        for v in tour.violations() {
            match &v.kind {
                ViolationType::InfeasibleStop {
                    address_id,
                    load,
                    max_load,
                } => warn!(tour = tour.id(), %address_id, load, max_load, "stop exceeds vehicle capacity on its own"),
                kind => warn!(tour = tour.id(), ?kind, "tour violates a constraint"),
            }
        }
    }

    OptimizationResult {
        tours,
        statistics,
        metadata: metadata(run, cost),
    }
}

/// Result of an empty address list.
pub fn empty_result(run: RunSummary) -> OptimizationResult {
    OptimizationResult {
        tours: Vec::new(),
        statistics: Statistics::empty(),
        metadata: metadata(run, 0.0),
    }
}

fn statistics(fitness: &FitnessEvaluator<'_>, tours: &[Tour], cost: f64) -> Statistics {
    let constraints = fitness.tour_evaluator().instance().constraints();
    let total_distance: f64 = tours.iter().map(Tour::estimated_distance).sum();
    let violation_count = tours.iter().map(|t| t.violations().len()).sum();
    let efficiency = constraints.fuel_efficiency();
    let estimated_fuel_litres = if efficiency.is_finite() && efficiency > 0.0 {
        total_distance / efficiency
    } else {
        0.0
    };

    Statistics {
        total_tours: tours.len(),
        total_addresses: tours.iter().map(Tour::len).sum(),
        total_load: tours.iter().map(Tour::total_load).sum(),
        total_distance,
        total_duration: tours.iter().map(Tour::estimated_duration).sum(),
        estimated_fuel_litres,
        optimization_score: fitness.score(cost),
        violation_count,
        feasible: violation_count == 0,
    }
}

fn metadata(run: RunSummary, best_cost: f64) -> Metadata {
    Metadata {
        algorithm: ALGORITHM.to_string(),
        optimization_time_ms: u64::try_from(run.elapsed.as_millis()).unwrap_or(u64::MAX),
        iterations: run.generations,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        seed: run.seed,
        population_size: run.population_size,
        termination: run.termination,
        best_cost,
        convergence: run.convergence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostModel;
    use crate::evaluation::CostWeights;
    use crate::ga::SplitStrategy;
    use crate::models::{Address, Coordinates, Instance, VehicleConstraints};

    const DEPOT: Coordinates = Coordinates::new(0.0, 0.0);

    fn run() -> RunSummary {
        RunSummary {
            generations: 3,
            termination: TerminationReason::MaxGenerations,
            seed: 9,
            population_size: 10,
            convergence: vec![3.0, 2.0, 1.0],
            elapsed: Duration::from_millis(12),
        }
    }

    fn addresses(loads: &[u32]) -> Vec<Address> {
        loads
            .iter()
            .enumerate()
            .map(|(i, &l)| Address::new(format!("S{i}"), Coordinates::new(0.0, 0.1 * (i + 1) as f64), l))
            .collect()
    }

    #[test]
    fn test_assemble_partitions_and_numbers_tours() {
        let addrs = addresses(&[10, 15, 8, 12, 20]);
        let c = VehicleConstraints::default().with_max_load(20);
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let fe = FitnessEvaluator::new(&inst, CostWeights::default(), SplitStrategy::Greedy);
        let result = assemble(&fe, &[4, 3, 2, 1, 0], true, run());

        let ids: Vec<usize> = result.tours.iter().map(Tour::id).collect();
        assert_eq!(ids, (1..=result.tours.len()).collect::<Vec<_>>());
        let mut served: Vec<usize> = result
            .tours
            .iter()
            .flat_map(|t| t.address_indices().to_vec())
            .collect();
        served.sort_unstable();
        assert_eq!(served, vec![0, 1, 2, 3, 4]);
        assert!(result.tours.iter().all(|t| t.total_load() <= 20));

        let s = &result.statistics;
        assert_eq!(s.total_tours, result.tours.len());
        assert_eq!(s.total_addresses, 5);
        assert_eq!(s.total_load, 65);
        let sum: f64 = result.tours.iter().map(Tour::estimated_distance).sum();
        assert!((s.total_distance - sum).abs() < 1e-6);
        assert!((s.estimated_fuel_litres - sum / 10.0).abs() < 1e-9);
        assert!(s.optimization_score > 0.0 && s.optimization_score <= 1.0);
        assert!(s.feasible);
    }

    #[test]
    fn test_assemble_reports_infeasible_stop() {
        let addrs = addresses(&[10, 120]);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let fe = FitnessEvaluator::new(&inst, CostWeights::default(), SplitStrategy::Greedy);
        let result = assemble(&fe, &[0, 1], false, run());
        assert_eq!(result.tours.len(), 2);
        assert_eq!(result.statistics.violation_count, 1);
        assert!(!result.statistics.feasible);
        assert!(result.statistics.optimization_score > 0.0);
        let (tour, v) = result.violations().next().unwrap();
        assert_eq!(tour, 2);
        assert!(matches!(v.kind, ViolationType::InfeasibleStop { load: 120, .. }));
    }

    #[test]
    fn test_metadata_stamped() {
        let result = empty_result(RunSummary::trivial(5, 100, Duration::from_millis(2)));
        let m = &result.metadata;
        assert_eq!(m.algorithm, ALGORITHM);
        assert_eq!(m.iterations, 0);
        assert_eq!(m.seed, 5);
        assert_eq!(m.termination, TerminationReason::Trivial);
        assert_eq!(m.optimization_time_ms, 2);
        assert_eq!(m.version, env!("CARGO_PKG_VERSION"));
        assert!(result.tours.is_empty());
        assert_eq!(result.statistics.total_distance, 0.0);
    }

    #[test]
    fn test_polish_never_lengthens_tours() {
        let addrs = addresses(&[5, 5, 5, 5, 5, 5]);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let fe = FitnessEvaluator::new(&inst, CostWeights::default(), SplitStrategy::Greedy);
        let order = [3, 0, 5, 1, 4, 2];
        let raw = assemble(&fe, &order, false, run());
        let polished = assemble(&fe, &order, true, run());
        assert!(polished.statistics.total_distance <= raw.statistics.total_distance + 1e-9);
        assert!(polished.statistics.optimization_score >= raw.statistics.optimization_score);
        assert!(polished.metadata.best_cost <= raw.metadata.best_cost + 1e-9);
    }

    #[test]
    fn test_best_cost_matches_returned_tours() {
        let addrs = addresses(&[5, 5, 5, 5, 5, 5]);
        let c = VehicleConstraints::default().with_max_load(15);
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let fe = FitnessEvaluator::new(&inst, CostWeights::default(), SplitStrategy::Greedy);
        let result = assemble(&fe, &[3, 0, 5, 1, 4, 2], true, run());

        let evaluator = fe.tour_evaluator();
        let cost: f64 = result
            .tours
            .iter()
            .map(|t| {
                let route = t.address_indices();
                fe.tour_cost(route, &evaluator.measure(route))
            })
            .sum();
        assert!((result.metadata.best_cost - cost).abs() < 1e-9);
        assert_eq!(result.statistics.optimization_score, fe.score(result.metadata.best_cost));
    }
}
