//! # tour-ga
//!
//! Delivery tour planning for a single depot: partitions a set of addresses
//! into capacity-feasible tours with a genetic algorithm over giant-tour
//! permutations.
//!
//! ## Modules
//!
//! - [`models`]: Domain types (Address, VehicleConstraints, Tour, OptimizationResult)
//! - [`distance`]: Haversine distance, travel-time model, and distance matrix
//! - [`evaluation`]: Tour metrics, constraint violations, and fitness
//! - [`constructive`]: Seed orderings (priority-first, nearest neighbor)
//! - [`local_search`]: 2-opt polishing of final tours
//! - [`ga`]: Genome, split procedure, operators, and the generation loop
//!
//! ## Example
//!
//! ```
//! use tour_ga::models::{Address, Coordinates, VehicleConstraints};
//! use tour_ga::EngineConfig;
//!
//! let depot = Coordinates::new(48.1067, 11.4247);
//! let addresses: Vec<Address> = [10, 15, 8, 12, 20]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &load)| Address::new(format!("A{i}"), Coordinates::new(48.12 + 0.01 * i as f64, 11.50), load))
//!     .collect();
//! let constraints = VehicleConstraints::default().with_max_load(20);
//! let config = EngineConfig::default().with_seed(42);
//!
//! let result = tour_ga::optimize_with(&addresses, depot, &constraints, &config).unwrap();
//! assert!(result.statistics.total_tours >= 2);
//! assert!(result.tours.iter().all(|t| t.total_load() <= 20));
//! ```

pub mod assembler;
mod cancel;
mod config;
pub mod constructive;
pub mod distance;
mod error;
pub mod evaluation;
pub mod ga;
#[cfg(feature = "json")]
mod json;
pub mod local_search;
pub mod models;
mod optimizer;

pub use cancel::CancellationToken;
pub use config::{EngineConfig, ENV_PREFIX};
pub use error::{Error, Result, ValidationError};
#[cfg(feature = "json")]
pub use json::optimize_json;
pub use optimizer::{optimize, optimize_with, Optimizer};
