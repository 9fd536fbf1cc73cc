//! Tour and stop types.

use serde::{Deserialize, Serialize};

use super::{Address, Violation};

/// A single delivery within a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// The delivered address.
    pub address: Address,
    /// 1-based position within the tour.
    pub stop_order: usize,
    /// Minutes after leaving the depot at which the vehicle arrives.
    pub arrival_minutes: f64,
    /// Cumulative load delivered after this stop.
    pub load_after: u64,
    /// Distance in km from the previous stop (or the depot).
    pub leg_distance: f64,
}

/// An ordered sequence of stops served by one trip from and back to the depot.
///
/// The depot is not stored in `stops`; the first and last legs are included
/// in `estimated_distance`.
///
/// # Examples
///
/// ```
/// use tour_ga::models::{Address, Coordinates, Stop, Tour};
///
/// let mut tour = Tour::new(1);
/// tour.push_stop(
///     Stop {
///         address: Address::new("A1", Coordinates::new(48.1, 11.5), 10),
///         stop_order: 1,
///         arrival_minutes: 12.0,
///         load_after: 10,
///         leg_distance: 10.0,
///     },
///     0,
/// );
/// assert_eq!(tour.len(), 1);
/// assert_eq!(tour.total_load(), 10);
/// assert_eq!(tour.address_indices(), &[0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    id: usize,
    stops: Vec<Stop>,
    address_indices: Vec<usize>,
    total_load: u64,
    total_weight: f64,
    total_volume: f64,
    estimated_distance: f64,
    estimated_duration: f64,
    violations: Vec<Violation>,
}

impl Tour {
    /// Creates an empty tour with the given 1-based tour number.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            stops: Vec::new(),
            address_indices: Vec::new(),
            total_load: 0,
            total_weight: 0.0,
            total_volume: 0.0,
            estimated_distance: 0.0,
            estimated_duration: 0.0,
            violations: Vec::new(),
        }
    }

    /// Appends a stop; `index` is the address position in the input slice.
    pub fn push_stop(&mut self, stop: Stop, index: usize) {
        self.total_load = stop.load_after;
        self.stops.push(stop);
        self.address_indices.push(index);
    }

    /// 1-based tour number.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Input indices of the stops in route order.
    pub fn address_indices(&self) -> &[usize] {
        &self.address_indices
    }

    /// Address ids in route order.
    pub fn address_ids(&self) -> Vec<&str> {
        self.stops.iter().map(|s| s.address.id()).collect()
    }

    /// Number of stops (excluding the depot).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn total_load(&self) -> u64 {
        self.total_load
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    /// Depot-to-depot distance in km.
    pub fn estimated_distance(&self) -> f64 {
        self.estimated_distance
    }

    /// Travel plus service time in minutes.
    pub fn estimated_duration(&self) -> f64 {
        self.estimated_duration
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// `true` if no constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    pub(crate) fn set_measures(&mut self, weight: f64, volume: f64) {
        self.total_weight = weight;
        self.total_volume = volume;
    }

    pub(crate) fn set_estimates(&mut self, distance: f64, duration: f64) {
        self.estimated_distance = distance;
        self.estimated_duration = duration;
    }

    pub(crate) fn set_violations(&mut self, violations: Vec<Violation>) {
        self.violations = violations;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, ViolationType};

    fn stop(id: &str, order: usize, load_after: u64) -> Stop {
        Stop {
            address: Address::new(id, Coordinates::new(48.0, 11.0), 5),
            stop_order: order,
            arrival_minutes: 0.0,
            load_after,
            leg_distance: 0.0,
        }
    }

    #[test]
    fn test_tour_empty() {
        let t = Tour::new(1);
        assert!(t.is_empty());
        assert_eq!(t.id(), 1);
        assert_eq!(t.total_load(), 0);
        assert_eq!(t.estimated_distance(), 0.0);
        assert!(t.is_feasible());
    }

    #[test]
    fn test_tour_push_stop() {
        let mut t = Tour::new(2);
        t.push_stop(stop("B", 1, 5), 3);
        t.push_stop(stop("A", 2, 10), 0);
        assert_eq!(t.len(), 2);
        assert_eq!(t.address_ids(), vec!["B", "A"]);
        assert_eq!(t.address_indices(), &[3, 0]);
        assert_eq!(t.total_load(), 10);
    }

    #[test]
    fn test_tour_feasibility_follows_violations() {
        let mut t = Tour::new(1);
        t.set_violations(vec![Violation::new(ViolationType::StopsExceeded {
            stops: 3,
            max_stops: 2,
        })]);
        assert!(!t.is_feasible());
    }
}
