//! Symmetric distance matrix over the depot and all addresses.

use std::cmp::Ordering;

use crate::models::{Address, Coordinates};

use super::haversine_km;

/// Matrix node of the depot. Address `i` of the input slice is node `i + 1`.
pub const DEPOT: usize = 0;

/// Great-circle distances (km) between every pair of nodes.
///
/// Haversine distance is symmetric, so only the strict upper triangle is
/// stored, packed row by row: n·(n−1)/2 entries for n nodes.
///
/// # Examples
///
/// ```
/// use tour_ga::models::{Address, Coordinates};
/// use tour_ga::distance::{DistanceMatrix, DEPOT};
///
/// let depot = Coordinates::new(0.0, 0.0);
/// let addresses = vec![
///     Address::new("A", Coordinates::new(1.0, 0.0), 1),
///     Address::new("B", Coordinates::new(2.0, 0.0), 1),
/// ];
/// let dm = DistanceMatrix::from_locations(depot, &addresses);
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.get(1, 2), dm.get(2, 1));
/// assert!((dm.get(DEPOT, 2) - 2.0 * dm.get(DEPOT, 1)).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    packed: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Distances between the depot (node 0) and every address (node `i + 1`).
    pub fn from_locations(depot: Coordinates, addresses: &[Address]) -> Self {
        let points: Vec<Coordinates> = std::iter::once(depot)
            .chain(addresses.iter().map(Address::coordinates))
            .collect();
        let size = points.len();
        let mut packed = Vec::with_capacity(size * size.saturating_sub(1) / 2);
        for (i, &a) in points.iter().enumerate() {
            packed.extend(points[i + 1..].iter().map(|&b| haversine_km(a, b)));
        }
        Self { packed, size }
    }

    fn offset(&self, lo: usize, hi: usize) -> usize {
        // rows 0..lo hold (n-1) + (n-2) + ... + (n-lo) entries
        lo * (2 * self.size - lo - 1) / 2 + (hi - lo - 1)
    }

    /// Distance between nodes `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either node is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        assert!(from < self.size && to < self.size, "node out of bounds");
        match from.cmp(&to) {
            Ordering::Equal => 0.0,
            Ordering::Less => self.packed[self.offset(from, to)],
            Ordering::Greater => self.packed[self.offset(to, from)],
        }
    }

    /// Number of nodes, depot included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Nearest of `candidates` to `from`; ties go to the earliest candidate.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates.iter().copied().min_by(|&a, &b| {
            self.get(from, a)
                .partial_cmp(&self.get(from, b))
                .unwrap_or(Ordering::Equal)
        })
    }
}
