//! Fitness of a visiting order: split into tours, sum travel cost, and
//! penalize constraint violations.
//!
//! Lower cost is better. Cost ties (within a relative `1e-9`) are broken by
//! priority lateness, the urgency-weighted position of every address in the
//! visiting order, so that urgent stops drift towards the front without ever
//! outweighing a distance saving or accepting a higher cost.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{TourEvaluator, TourMetrics};
use crate::ga::split::{split, SplitStrategy};
use crate::models::{Instance, Priority};

const TIE_TOLERANCE: f64 = 1e-9;

/// Weights of the cost terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeights {
    /// Cost per km travelled.
    pub distance: f64,
    /// Cost per minute of tour duration.
    pub duration: f64,
    /// Cost of one violation, scaled by `1 + magnitude`.
    pub penalty: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            distance: 1.0,
            duration: 1.0,
            penalty: 1000.0,
        }
    }
}

/// Fitness of one genome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    /// Weighted distance + duration + penalty.
    pub cost: f64,
    pub distance: f64,
    pub duration: f64,
    pub penalty: f64,
    pub tours: usize,
    /// Urgency-weighted mean position of prioritized addresses.
    pub priority_lateness: f64,
}

impl Fitness {
    /// Fitness of a genome not yet evaluated.
    pub fn unevaluated() -> Self {
        Self {
            cost: f64::INFINITY,
            distance: 0.0,
            duration: 0.0,
            penalty: 0.0,
            tours: 0,
            priority_lateness: f64::INFINITY,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.cost.is_finite()
    }

    /// Strictly better than `other`: cheaper beyond the tie tolerance, or
    /// within it, no more expensive and less late on priority stops.
    ///
    /// The priority tie-break never accepts a higher cost, so the cost of a
    /// chain of successive improvements never rises.
    pub fn is_better_than(&self, other: &Fitness) -> bool {
        if !self.cost.is_finite() || !other.cost.is_finite() {
            return self.cost.total_cmp(&other.cost) == Ordering::Less;
        }
        let scale = self.cost.abs().max(other.cost.abs()).max(1.0);
        if (self.cost - other.cost).abs() <= TIE_TOLERANCE * scale {
            self.cost <= other.cost && self.priority_lateness < other.priority_lateness
        } else {
            self.cost < other.cost
        }
    }
}

/// Scores visiting orders for one instance. Pure and deterministic.
///
/// # Examples
///
/// ```
/// use tour_ga::distance::CostModel;
/// use tour_ga::evaluation::{CostWeights, FitnessEvaluator};
/// use tour_ga::ga::SplitStrategy;
/// use tour_ga::models::{Address, Coordinates, Instance, VehicleConstraints};
///
/// let addresses = vec![
///     Address::new("A", Coordinates::new(0.0, 0.1), 10),
///     Address::new("B", Coordinates::new(0.0, 0.2), 10),
/// ];
/// let constraints = VehicleConstraints::default();
/// let inst = Instance::new(&addresses, Coordinates::new(0.0, 0.0), &constraints, CostModel::default());
/// let fe = FitnessEvaluator::new(&inst, CostWeights::default(), SplitStrategy::Greedy);
///
/// let f = fe.evaluate(&[0, 1]);
/// assert_eq!(f.tours, 1);
/// assert_eq!(f.penalty, 0.0);
/// assert_eq!(f, fe.evaluate(&[0, 1]));
/// ```
pub struct FitnessEvaluator<'a> {
    evaluator: TourEvaluator<'a>,
    weights: CostWeights,
    strategy: SplitStrategy,
    reference_cost: f64,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(instance: &'a Instance<'a>, weights: CostWeights, strategy: SplitStrategy) -> Self {
        let evaluator = TourEvaluator::new(instance);
        // One tour per address: the no-consolidation baseline the score is
        // normalized against.
        let reference_cost = (0..instance.len())
            .map(|i| {
                let m = evaluator.measure(&[i]);
                weights.distance * m.distance + weights.duration * m.duration
            })
            .sum();
        Self {
            evaluator,
            weights,
            strategy,
            reference_cost,
        }
    }

    pub fn tour_evaluator(&self) -> &TourEvaluator<'a> {
        &self.evaluator
    }

    pub fn strategy(&self) -> SplitStrategy {
        self.strategy
    }

    /// Cost of serving every address on its own tour, penalties excluded.
    pub fn reference_cost(&self) -> f64 {
        self.reference_cost
    }

    /// Penalty of one tour: `weight × (1 + magnitude)` per violation.
    pub fn tour_penalty(&self, indices: &[usize], m: &TourMetrics) -> f64 {
        let instance = self.evaluator.instance();
        if self.evaluator.within_limits(m) && !indices.iter().any(|&i| instance.is_restricted(i)) {
            return 0.0;
        }
        self.evaluator
            .violations(indices, m)
            .iter()
            .map(|v| self.weights.penalty * (1.0 + v.kind.magnitude()))
            .sum()
    }

    /// Weighted distance, duration, and penalty of one tour.
    pub fn tour_cost(&self, indices: &[usize], m: &TourMetrics) -> f64 {
        self.weights.distance * m.distance
            + self.weights.duration * m.duration
            + self.tour_penalty(indices, m)
    }

    /// Splits `order` into tours and scores the result.
    pub fn evaluate(&self, order: &[usize]) -> Fitness {
        let result = split(order, &self.evaluator, self.strategy);
        let mut fitness = Fitness {
            cost: 0.0,
            distance: 0.0,
            duration: 0.0,
            penalty: 0.0,
            tours: result.routes.len(),
            priority_lateness: self.priority_lateness(order),
        };
        for (route, m) in result.routes.iter().zip(&result.metrics) {
            fitness.distance += m.distance;
            fitness.duration += m.duration;
            fitness.penalty += self.tour_penalty(route, m);
        }
        fitness.cost = self.weights.distance * fitness.distance
            + self.weights.duration * fitness.duration
            + fitness.penalty;
        fitness
    }

    /// Urgency-weighted mean position of addresses in `order`, in `[0, 3)`.
    pub fn priority_lateness(&self, order: &[usize]) -> f64 {
        if order.is_empty() {
            return 0.0;
        }
        let instance = self.evaluator.instance();
        let n = order.len() as f64;
        order
            .iter()
            .enumerate()
            .map(|(pos, &i)| Priority::urgency(instance.address(i).priority()) * pos as f64 / n)
            .sum::<f64>()
            / n
    }

    /// Maps a cost to a score in `(0, 1]`: `reference / (reference + cost)`.
    pub fn score(&self, cost: f64) -> f64 {
        if !cost.is_finite() {
            return f64::MIN_POSITIVE;
        }
        let cost = cost.max(0.0);
        let score = if self.reference_cost > 0.0 {
            self.reference_cost / (self.reference_cost + cost)
        } else {
            1.0 / (1.0 + cost)
        };
        score.clamp(f64::MIN_POSITIVE, 1.0)
    }
}
