//! Tour feasibility checking and solution cost evaluation.
//!
//! - [`TourEvaluator`]: per-tour load, distance, duration, and violations
//! - [`FitnessEvaluator`]: scores a full visiting order via the split

mod evaluator;
mod fitness;

pub use evaluator::{OpenTour, TourEvaluator, TourMetrics};
pub use fitness::{CostWeights, Fitness, FitnessEvaluator};
