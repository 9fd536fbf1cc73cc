//! Priority-first giant tour: urgent addresses first, nearest to the depot
//! first within one priority class.

use std::cmp::Ordering;

use crate::models::{Instance, Priority};

/// Visiting order sorted by priority rank (high, medium, low, none), then by
/// distance from the depot. The sort is stable, so full ties keep input order.
///
/// # Examples
///
/// ```
/// use tour_ga::constructive::priority_order;
/// use tour_ga::distance::CostModel;
/// use tour_ga::models::{Address, Coordinates, Instance, Priority, VehicleConstraints};
///
/// let addresses = vec![
///     Address::new("plain", Coordinates::new(0.0, 0.1), 5),
///     Address::new("urgent", Coordinates::new(0.0, 0.5), 5).with_priority(Priority::High),
/// ];
/// let constraints = VehicleConstraints::default();
/// let inst = Instance::new(&addresses, Coordinates::new(0.0, 0.0), &constraints, CostModel::default());
/// assert_eq!(priority_order(&inst), vec![1, 0]);
/// ```
pub fn priority_order(instance: &Instance<'_>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..instance.len()).collect();
    order.sort_by(|&a, &b| {
        let rank = |i: usize| Priority::rank(instance.address(i).priority());
        rank(a).cmp(&rank(b)).then_with(|| {
            instance
                .depot_distance(a)
                .partial_cmp(&instance.depot_distance(b))
                .unwrap_or(Ordering::Equal)
        })
    });
    order
}
