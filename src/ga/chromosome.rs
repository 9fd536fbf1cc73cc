//! Giant-tour genome.
//!
//! A genome encodes a whole plan as one permutation of address indices. The
//! [`split`](super::split) procedure cuts it into depot-to-depot tours, so
//! every permutation decodes to a plan that serves each address exactly once.

use crate::evaluation::Fitness;

use super::traits::Individual;

/// A permutation of address indices plus its cached fitness.
///
/// # Examples
///
/// ```
/// use tour_ga::ga::{Genome, Individual};
///
/// let genome = Genome::new(vec![2, 0, 1]);
/// assert_eq!(genome.order(), &[2, 0, 1]);
/// assert!(!genome.fitness().is_evaluated());
/// ```
#[derive(Debug, Clone)]
pub struct Genome {
    order: Vec<usize>,
    fitness: Fitness,
}

impl Genome {
    /// Creates an unevaluated genome from a visiting order.
    pub fn new(order: Vec<usize>) -> Self {
        Self {
            order,
            fitness: Fitness::unevaluated(),
        }
    }

    /// Visiting order of address indices.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Mutable visiting order. Callers must keep it a permutation and should
    /// reset the fitness afterwards.
    pub fn order_mut(&mut self) -> &mut Vec<usize> {
        &mut self.order
    }

    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `true` if the order holds every index in `0..n` exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.order.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        self.order
            .iter()
            .all(|&i| i < n && !std::mem::replace(&mut seen[i], true))
    }
}

impl Individual for Genome {
    type Fitness = Fitness;
    type Key = Vec<usize>;

    fn fitness(&self) -> Fitness {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: Fitness) {
        self.fitness = fitness;
    }

    fn key(&self) -> Vec<usize> {
        self.order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genome_new() {
        let g = Genome::new(vec![1, 2, 0]);
        assert_eq!(g.len(), 3);
        assert!(!g.is_empty());
        assert!(!g.fitness().is_evaluated());
    }

    #[test]
    fn test_genome_permutation_check() {
        assert!(Genome::new(vec![2, 0, 1]).is_permutation_of(3));
        assert!(!Genome::new(vec![0, 0, 1]).is_permutation_of(3));
        assert!(!Genome::new(vec![0, 1, 3]).is_permutation_of(3));
        assert!(!Genome::new(vec![0, 1]).is_permutation_of(3));
        assert!(Genome::new(vec![]).is_permutation_of(0));
    }

    #[test]
    fn test_genome_clone_keeps_fitness() {
        let mut g = Genome::new(vec![0, 1]);
        let mut f = Fitness::unevaluated();
        f.cost = 12.5;
        g.set_fitness(f);
        let cloned = g.clone();
        assert_eq!(cloned.fitness().cost, 12.5);
        assert_eq!(cloned.into_order(), vec![0, 1]);
    }

    #[test]
    fn test_genome_order_mut() {
        let mut g = Genome::new(vec![0, 1, 2]);
        g.order_mut().swap(0, 2);
        assert_eq!(g.order(), &[2, 1, 0]);
    }
}
