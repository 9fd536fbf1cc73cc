//! Domain model types for delivery tour optimization.
//!
//! Provides the core abstractions: geographic coordinates, delivery addresses
//! with loads and priorities, the vehicle constraint profile, tours as
//! ordered stop sequences, and the result returned to callers.

mod address;
mod constraints;
mod coordinates;
mod instance;
mod result;
mod tour;

pub use address::{Address, Priority};
pub use constraints::{RestrictionRule, VehicleConstraints};
pub use coordinates::Coordinates;
pub use instance::Instance;
pub use result::{
    Metadata, OptimizationResult, Statistics, TerminationReason, Violation, ViolationType,
};
pub use tour::{Stop, Tour};
