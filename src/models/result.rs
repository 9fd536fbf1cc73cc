//! Optimization result, statistics, and violation types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tour;

/// A type of constraint violation on a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationType {
    /// Tour load exceeds the vehicle's maximum load.
    LoadExceeded { load: u64, max_load: u32 },
    /// A single address whose own load exceeds the maximum load. It is served
    /// alone on a dedicated tour.
    InfeasibleStop {
        address_id: String,
        load: u64,
        max_load: u32,
    },
    WeightExceeded { weight: f64, max_weight: f64 },
    VolumeExceeded { volume: f64, max_volume: f64 },
    StopsExceeded { stops: u32, max_stops: u32 },
    /// Tour duration (minutes) exceeds the shift limit.
    DurationExceeded { duration: f64, max_duration: f64 },
    /// Tour distance (km) exceeds a `MaxTourDistance` restriction.
    TourDistanceExceeded { distance: f64, max_distance: f64 },
    /// Address lies outside a service area or radius restriction.
    RestrictedArea { address_id: String },
}

impl ViolationType {
    /// Relative size of the breach: `(actual - limit) / limit`, or 1 for
    /// area restrictions.
    pub fn magnitude(&self) -> f64 {
        fn excess(actual: f64, limit: f64) -> f64 {
            if limit.is_finite() && limit > 0.0 {
                ((actual - limit) / limit).max(0.0)
            } else {
                0.0
            }
        }
        match self {
            ViolationType::LoadExceeded { load, max_load }
            | ViolationType::InfeasibleStop { load, max_load, .. } => {
                excess(*load as f64, f64::from(*max_load))
            }
            ViolationType::WeightExceeded { weight, max_weight } => excess(*weight, *max_weight),
            ViolationType::VolumeExceeded { volume, max_volume } => excess(*volume, *max_volume),
            ViolationType::StopsExceeded { stops, max_stops } => {
                excess(f64::from(*stops), f64::from(*max_stops))
            }
            ViolationType::DurationExceeded {
                duration,
                max_duration,
            } => excess(*duration, *max_duration),
            ViolationType::TourDistanceExceeded {
                distance,
                max_distance,
            } => excess(*distance, *max_distance),
            ViolationType::RestrictedArea { .. } => 1.0,
        }
    }
}

/// A constraint violation on a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationType,
}

impl Violation {
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// Why the evolution loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Generation cap reached.
    MaxGenerations,
    /// Best cost stalled for the configured number of generations.
    Converged,
    /// Caller cancelled; the result holds the best genome found so far.
    Cancelled,
    /// Empty input, no search performed.
    Trivial,
}

/// Aggregate figures over all tours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_tours: usize,
    pub total_addresses: usize,
    pub total_load: u64,
    /// Sum of every tour's `estimated_distance` (km).
    pub total_distance: f64,
    /// Sum of every tour's `estimated_duration` (minutes).
    pub total_duration: f64,
    pub estimated_fuel_litres: f64,
    /// Normalized inverse of the solution cost, in `(0, 1]`.
    pub optimization_score: f64,
    pub violation_count: usize,
    pub feasible: bool,
}

impl Statistics {
    /// Statistics of an empty result.
    pub fn empty() -> Self {
        Self {
            total_tours: 0,
            total_addresses: 0,
            total_load: 0,
            total_distance: 0.0,
            total_duration: 0.0,
            estimated_fuel_litres: 0.0,
            optimization_score: 1.0,
            violation_count: 0,
            feasible: true,
        }
    }
}

/// Run information stamped on every result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub algorithm: String,
    pub optimization_time_ms: u64,
    /// Generations actually run.
    pub iterations: usize,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    /// Seed of the run's random source; reuse it to reproduce the run.
    pub seed: u64,
    pub population_size: usize,
    pub termination: TerminationReason,
    /// Cost of the returned tours, after polishing. This is the cost the
    /// optimization score is computed from.
    pub best_cost: f64,
    /// Best genome cost after each generation, before polishing.
    pub convergence: Vec<f64>,
}

/// Tours, statistics, and metadata of one optimization call.
///
/// # Examples
///
/// ```
/// use tour_ga::models::{Coordinates, VehicleConstraints};
///
/// let result = tour_ga::optimize(&[], Coordinates::new(48.1067, 11.4247), &VehicleConstraints::default())
///     .unwrap();
/// assert!(result.tours.is_empty());
/// assert_eq!(result.statistics.total_tours, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub tours: Vec<Tour>,
    pub statistics: Statistics,
    pub metadata: Metadata,
}

impl OptimizationResult {
    /// All violations across tours, paired with their tour number.
    pub fn violations(&self) -> impl Iterator<Item = (usize, &super::Violation)> {
        self.tours
            .iter()
            .flat_map(|t| t.violations().iter().map(move |v| (t.id(), v)))
    }

    /// Total number of stops across tours.
    pub fn num_served(&self) -> usize {
        self.tours.iter().map(Tour::len).sum()
    }
}
