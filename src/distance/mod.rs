//! Distances and travel times.
//!
//! Great-circle geometry, the cost model turning km into minutes, and a dense
//! distance matrix over the depot and all addresses.

mod haversine;
mod matrix;

pub use haversine::{haversine_km, CostModel, EARTH_RADIUS_KM};
pub use matrix::{DistanceMatrix, DEPOT};
