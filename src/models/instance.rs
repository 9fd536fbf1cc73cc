//! Immutable problem instance shared by every component of one run.

use crate::distance::{CostModel, DistanceMatrix, DEPOT};

use super::{Address, Coordinates, VehicleConstraints};

/// Addresses, depot, constraints, and precomputed distances of one call.
///
/// Everything downstream refers to addresses by their index in the input
/// slice; the instance is the arena those indices point into.
///
/// # Examples
///
/// ```
/// use tour_ga::distance::CostModel;
/// use tour_ga::models::{Address, Coordinates, Instance, VehicleConstraints};
///
/// let addresses = vec![
///     Address::new("A", Coordinates::new(0.0, 1.0), 5),
///     Address::new("B", Coordinates::new(0.0, 2.0), 5),
/// ];
/// let constraints = VehicleConstraints::default();
/// let inst = Instance::new(&addresses, Coordinates::new(0.0, 0.0), &constraints, CostModel::default());
/// assert_eq!(inst.len(), 2);
/// assert!(inst.depot_distance(1) > inst.depot_distance(0));
/// ```
#[derive(Debug, Clone)]
pub struct Instance<'a> {
    addresses: &'a [Address],
    depot: Coordinates,
    constraints: &'a VehicleConstraints,
    distances: DistanceMatrix,
    cost: CostModel,
    restricted: Vec<bool>,
}

impl<'a> Instance<'a> {
    /// Builds the instance and its distance matrix. Inputs are assumed valid.
    pub fn new(
        addresses: &'a [Address],
        depot: Coordinates,
        constraints: &'a VehicleConstraints,
        cost: CostModel,
    ) -> Self {
        let distances = DistanceMatrix::from_locations(depot, addresses);
        let restricted = addresses
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let from_depot = distances.get(DEPOT, i + 1);
                !constraints
                    .restrictions()
                    .iter()
                    .all(|rule| rule.admits(a.coordinates(), from_depot))
            })
            .collect();
        Self {
            addresses,
            depot,
            constraints,
            distances,
            cost,
            restricted,
        }
    }

    pub fn addresses(&self) -> &'a [Address] {
        self.addresses
    }

    /// Address at input index `i`.
    pub fn address(&self, i: usize) -> &'a Address {
        &self.addresses[i]
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn depot(&self) -> Coordinates {
        self.depot
    }

    pub fn constraints(&self) -> &'a VehicleConstraints {
        self.constraints
    }

    pub fn cost_model(&self) -> CostModel {
        self.cost
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Distance in km between the depot and address `i`.
    pub fn depot_distance(&self, i: usize) -> f64 {
        self.distances.get(DEPOT, i + 1)
    }

    /// Distance in km between addresses `i` and `j`.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances.get(i + 1, j + 1)
    }

    /// Depot-to-depot distance of visiting `indices` in order.
    pub fn route_distance(&self, indices: &[usize]) -> f64 {
        let (Some(&first), Some(&last)) = (indices.first(), indices.last()) else {
            return 0.0;
        };
        let inner: f64 = indices.windows(2).map(|w| self.distance(w[0], w[1])).sum();
        self.depot_distance(first) + inner + self.depot_distance(last)
    }

    /// `true` if address `i` breaks an area restriction.
    pub fn is_restricted(&self, i: usize) -> bool {
        self.restricted[i]
    }

    /// Effective weight of address `i`.
    pub fn weight(&self, i: usize) -> f64 {
        self.addresses[i].weight(self.constraints.weight_per_unit())
    }

    /// Effective volume of address `i`.
    pub fn volume(&self, i: usize) -> f64 {
        self.addresses[i].volume(self.constraints.volume_per_unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RestrictionRule;

    fn line() -> Vec<Address> {
        vec![
            Address::new("A", Coordinates::new(0.0, 1.0), 5),
            Address::new("B", Coordinates::new(0.0, 2.0), 7).with_weight(3.0),
            Address::new("C", Coordinates::new(0.0, 3.0), 9),
        ]
    }

    #[test]
    fn test_route_distance_line() {
        let addresses = line();
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addresses, Coordinates::new(0.0, 0.0), &c, CostModel::default());
        let unit = inst.depot_distance(0);
        // depot→A→B→C→depot along the equator = 6 degrees
        assert!((inst.route_distance(&[0, 1, 2]) - 6.0 * unit).abs() < 1e-6);
        assert_eq!(inst.route_distance(&[]), 0.0);
        assert!((inst.route_distance(&[1]) - 2.0 * inst.depot_distance(1)).abs() < 1e-12);
    }

    #[test]
    fn test_measures() {
        let addresses = line();
        let c = VehicleConstraints::default().with_unit_measures(2.0, 0.5);
        let inst = Instance::new(&addresses, Coordinates::new(0.0, 0.0), &c, CostModel::default());
        assert_eq!(inst.weight(0), 10.0);
        assert_eq!(inst.weight(1), 3.0);
        assert_eq!(inst.volume(2), 4.5);
    }

    #[test]
    fn test_restricted_flags() {
        let addresses = line();
        let c = VehicleConstraints::default().with_restriction(RestrictionRule::MaxRadius { km: 250.0 });
        let inst = Instance::new(&addresses, Coordinates::new(0.0, 0.0), &c, CostModel::default());
        // ~111 km, ~222 km, ~334 km from the depot
        assert!(!inst.is_restricted(0));
        assert!(!inst.is_restricted(1));
        assert!(inst.is_restricted(2));
    }
}
