//! Constructive orderings used to seed the initial population.
//!
//! - [`nearest_neighbor_order`]: Greedy nearest-neighbor walk from the depot, O(n²)
//! - [`priority_order`]: Priority class first, then distance from the depot, O(n log n)

mod nearest_neighbor;
mod priority;

pub use nearest_neighbor::nearest_neighbor_order;
pub use priority::priority_order;
