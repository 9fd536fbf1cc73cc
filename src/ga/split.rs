//! Split procedures partitioning a giant tour into depot-to-depot tours.
//!
//! # Greedy (default)
//!
//! Scans the giant tour left to right and closes the current tour the moment
//! the next address would break a limit: load, weight, volume, stop count,
//! projected duration, or a `MaxTourDistance` restriction. O(n). The genetic
//! search explores orderings, so good splits are found indirectly.
//!
//! # Optimal
//!
//! Models the problem as a shortest-path problem on an auxiliary graph where
//! node i represents the boundary after position i, and edge (i, j) represents
//! serving positions i+1..=j in one tour. O(n²) worst case, usually far less
//! because extension stops at the first broken limit.
//!
//! # Oversized stops
//!
//! Both procedures always admit a single address into an empty tour, so an
//! address whose own load exceeds the limit becomes a singleton tour and is
//! never dropped. The evaluator reports it as an infeasible stop.
//!
//! # Reference
//!
//! Prins, C. (2004). "A simple and effective evolutionary algorithm for the
//! vehicle routing problem", *Computers & Operations Research* 31(12), 1985-2002.

use serde::{Deserialize, Serialize};

use crate::evaluation::{OpenTour, TourEvaluator, TourMetrics};

/// How a giant tour is cut into tours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    #[default]
    Greedy,
    Optimal,
}

/// Result of a split.
#[derive(Debug, Clone, Default)]
pub struct SplitResult {
    /// Tours as sequences of address indices.
    pub routes: Vec<Vec<usize>>,
    /// Metrics of each tour, aligned with `routes`.
    pub metrics: Vec<TourMetrics>,
}

impl SplitResult {
    /// Total distance of all tours in km.
    pub fn total_distance(&self) -> f64 {
        self.metrics.iter().map(|m| m.distance).sum()
    }

    /// Total duration of all tours in minutes.
    pub fn total_duration(&self) -> f64 {
        self.metrics.iter().map(|m| m.duration).sum()
    }
}

/// Splits `tour` (address indices in visiting order) into contiguous tours.
///
/// # Examples
///
/// ```
/// use tour_ga::distance::CostModel;
/// use tour_ga::evaluation::TourEvaluator;
/// use tour_ga::ga::{split, SplitStrategy};
/// use tour_ga::models::{Address, Coordinates, Instance, VehicleConstraints};
///
/// let addresses: Vec<Address> = [10, 15, 8]
///     .iter()
///     .enumerate()
///     .map(|(i, &load)| Address::new(format!("A{i}"), Coordinates::new(0.0, 0.1 * (i + 1) as f64), load))
///     .collect();
/// let constraints = VehicleConstraints::default().with_max_load(25);
/// let inst = Instance::new(&addresses, Coordinates::new(0.0, 0.0), &constraints, CostModel::default());
/// let evaluator = TourEvaluator::new(&inst);
///
/// let result = split(&[0, 1, 2], &evaluator, SplitStrategy::Greedy);
/// assert_eq!(result.routes, vec![vec![0, 1], vec![2]]);
/// ```
pub fn split(tour: &[usize], evaluator: &TourEvaluator<'_>, strategy: SplitStrategy) -> SplitResult {
    match strategy {
        SplitStrategy::Greedy => split_greedy(tour, evaluator),
        SplitStrategy::Optimal => split_optimal(tour, evaluator),
    }
}

fn split_greedy(tour: &[usize], evaluator: &TourEvaluator<'_>) -> SplitResult {
    let instance = evaluator.instance();
    let mut result = SplitResult::default();
    let mut current = Vec::new();
    let mut open = OpenTour::default();

    for &next in tour {
        if !open.is_empty() && !evaluator.within_limits(&open.projected(instance, next)) {
            result.metrics.push(open.close(instance));
            result.routes.push(std::mem::take(&mut current));
            open = OpenTour::default();
        }
        open.push(instance, next);
        current.push(next);
    }

    if !open.is_empty() {
        result.metrics.push(open.close(instance));
        result.routes.push(current);
    }
    result
}

fn split_optimal(tour: &[usize], evaluator: &TourEvaluator<'_>) -> SplitResult {
    let instance = evaluator.instance();
    let n = tour.len();

    if n == 0 {
        return SplitResult::default();
    }

    // cost[i] = minimum total distance to serve tour[0..i]
    // pred[i] = start of the last tour ending at i
    let mut cost = vec![f64::INFINITY; n + 1];
    let mut pred = vec![0usize; n + 1];
    cost[0] = 0.0;

    for i in 0..n {
        if cost[i] == f64::INFINITY {
            continue;
        }

        let mut open = OpenTour::default();
        for j in i..n {
            let metrics = open.projected(instance, tour[j]);
            // A lone stop is always admitted; longer tours must fit.
            if j > i && !evaluator.within_limits(&metrics) {
                break;
            }
            open.push(instance, tour[j]);

            let new_cost = cost[i] + metrics.distance;
            if new_cost < cost[j + 1] {
                cost[j + 1] = new_cost;
                pred[j + 1] = i;
            }
        }
    }

    // Backtrack to find tours
    let mut routes = Vec::new();
    let mut j = n;
    while j > 0 {
        let i = pred[j];
        routes.push(tour[i..j].to_vec());
        j = i;
    }
    routes.reverse();

    let metrics = routes.iter().map(|r| evaluator.measure(r)).collect();
    SplitResult { routes, metrics }
}
