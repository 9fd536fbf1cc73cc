//! Nearest-neighbor giant tour.
//!
//! Starting from the depot, always visit the nearest unvisited address. The
//! result is a single visiting order; the split procedure cuts it into tours.
//!
//! # Complexity
//!
//! O(n²) where n = number of addresses.

use crate::distance::DEPOT;
use crate::models::Instance;

/// Visiting order built by repeatedly moving to the nearest unvisited
/// address. Ties go to the lower input index.
///
/// # Examples
///
/// ```
/// use tour_ga::constructive::nearest_neighbor_order;
/// use tour_ga::distance::CostModel;
/// use tour_ga::models::{Address, Coordinates, Instance, VehicleConstraints};
///
/// let addresses = vec![
///     Address::new("far", Coordinates::new(0.0, 0.3), 5),
///     Address::new("near", Coordinates::new(0.0, 0.1), 5),
///     Address::new("mid", Coordinates::new(0.0, 0.2), 5),
/// ];
/// let constraints = VehicleConstraints::default();
/// let inst = Instance::new(&addresses, Coordinates::new(0.0, 0.0), &constraints, CostModel::default());
/// assert_eq!(nearest_neighbor_order(&inst), vec![1, 2, 0]);
/// ```
pub fn nearest_neighbor_order(instance: &Instance<'_>) -> Vec<usize> {
    let distances = instance.distances();
    // Matrix nodes: depot first, address i at i + 1.
    let mut unvisited: Vec<usize> = (1..=instance.len()).collect();
    let mut order = Vec::with_capacity(instance.len());
    let mut current = DEPOT;

    while let Some(next) = distances.nearest_neighbor(current, &unvisited) {
        unvisited.retain(|&node| node != next);
        order.push(next - 1);
        current = next;
    }

    order
}
