//! Intra-tour 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions (i, j) in a tour, compute the change in
//! distance from reversing the segment between them:
//!
//! ```text
//! delta = d(prev_i, r[j]) + d(r[i], next_j) - d(prev_i, r[i]) - d(r[j], next_j)
//! ```
//!
//! If delta < 0, reverse `r[i..=j]` and accept the improvement. Repeat until
//! no further improvement is found (first-improvement strategy).
//!
//! Reversal keeps the tour's set of addresses, so load, stop count, and
//! area restrictions are unchanged and the distance never grows: polishing
//! can't turn a feasible tour infeasible.
//!
//! # Complexity
//!
//! O(n²) per pass.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::models::Instance;

const IMPROVEMENT_EPS: f64 = 1e-10;

/// Applies 2-opt to one tour of address indices. The tour starts and ends
/// at the depot. Returns the improved order and its depot-to-depot distance.
///
/// # Examples
///
/// ```
/// use tour_ga::distance::CostModel;
/// use tour_ga::local_search::two_opt_improve;
/// use tour_ga::models::{Address, Coordinates, Instance, VehicleConstraints};
///
/// let addresses: Vec<Address> = (1..=3)
///     .map(|k| Address::new(format!("S{k}"), Coordinates::new(0.0, 0.1 * k as f64), 1))
///     .collect();
/// let constraints = VehicleConstraints::default();
/// let inst = Instance::new(&addresses, Coordinates::new(0.0, 0.0), &constraints, CostModel::default());
///
/// let (improved, dist) = two_opt_improve(&[0, 2, 1], &inst);
/// assert!(dist <= inst.route_distance(&[0, 2, 1]));
/// assert!((dist - inst.route_distance(&[0, 1, 2])).abs() < 1e-9);
/// assert_eq!(improved.len(), 3);
/// ```
pub fn two_opt_improve(tour: &[usize], instance: &Instance<'_>) -> (Vec<usize>, f64) {
    let mut current = tour.to_vec();
    let n = current.len();

    if n >= 3 {
        let mut improved = true;
        while improved {
            improved = false;
            for i in 0..n - 1 {
                for j in i + 1..n {
                    if two_opt_delta(&current, instance, i, j) < -IMPROVEMENT_EPS {
                        current[i..=j].reverse();
                        improved = true;
                    }
                }
            }
        }
    }

    let dist = instance.route_distance(&current);
    (current, dist)
}

/// Distance change from reversing `tour[i..=j]`.
fn two_opt_delta(tour: &[usize], instance: &Instance<'_>, i: usize, j: usize) -> f64 {
    let leg = |a: Option<usize>, b: usize| match a {
        Some(a) => instance.distance(a, b),
        None => instance.depot_distance(b),
    };
    let prev_i = i.checked_sub(1).map(|p| tour[p]);
    let next_j = tour.get(j + 1).copied();

    let old_cost = leg(prev_i, tour[i]) + leg(next_j, tour[j]);
    let new_cost = leg(prev_i, tour[j]) + leg(next_j, tour[i]);
    new_cost - old_cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostModel;
    use crate::models::{Address, Coordinates, VehicleConstraints};

    const DEPOT: Coordinates = Coordinates::new(0.0, 0.0);

    fn addresses(points: &[(f64, f64)]) -> Vec<Address> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| Address::new(format!("S{i}"), Coordinates::new(lat, lon), 1))
            .collect()
    }

    #[test]
    fn test_2opt_empty_and_single() {
        let addrs = addresses(&[(0.0, 0.2)]);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let (empty, d0) = two_opt_improve(&[], &inst);
        assert!(empty.is_empty());
        assert_eq!(d0, 0.0);
        let (single, d1) = two_opt_improve(&[0], &inst);
        assert_eq!(single, vec![0]);
        assert!((d1 - 2.0 * inst.depot_distance(0)).abs() < 1e-12);
    }

    #[test]
    fn test_2opt_already_optimal() {
        let addrs = addresses(&[(0.0, 0.1), (0.0, 0.2), (0.0, 0.3)]);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let (improved, dist) = two_opt_improve(&[0, 1, 2], &inst);
        assert_eq!(improved, vec![0, 1, 2]);
        assert!((dist - inst.route_distance(&[0, 1, 2])).abs() < 1e-12);
    }

    #[test]
    fn test_2opt_removes_crossing() {
        // Square around the depot visited in a crossing order.
        let addrs = addresses(&[(0.1, 0.1), (-0.1, -0.1), (0.1, -0.1), (-0.1, 0.1)]);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let crossing = [0, 1, 2, 3];
        let (improved, dist) = two_opt_improve(&crossing, &inst);
        assert!(dist < inst.route_distance(&crossing));
        let mut sorted = improved.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_2opt_never_worsens() {
        let addrs = addresses(&[(0.3, 0.0), (0.0, 0.3), (0.3, 0.3), (-0.2, 0.1), (0.1, -0.2)]);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let initial = [2, 4, 0, 3, 1];
        let (_, dist) = two_opt_improve(&initial, &inst);
        assert!(dist <= inst.route_distance(&initial) + 1e-10);
    }
}
