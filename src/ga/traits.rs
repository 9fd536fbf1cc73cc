//! Seams between the generic evolution loop and a concrete problem.

use std::fmt::Debug;
use std::hash::Hash;

use rand::Rng;

/// A member of the population with a cached fitness.
pub trait Individual: Clone + Send + Sync {
    type Fitness: Copy + Debug + Send + Sync;
    /// Identity of the encoded solution, ignoring fitness.
    type Key: Eq + Hash;

    fn fitness(&self) -> Self::Fitness;

    fn key(&self) -> Self::Key;

    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// A problem the evolution loop can optimize.
///
/// Implementations must be pure: `evaluate` is called from worker threads
/// and must return the same fitness for the same individual.
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    /// Draws a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Individuals to place in the first generation before random ones.
    fn seed_individuals(&self) -> Vec<Self::Individual> {
        Vec::new()
    }

    /// Every distinct individual, if there are at most `limit` of them.
    fn enumerate_individuals(&self, _limit: usize) -> Option<Vec<Self::Individual>> {
        None
    }

    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// `true` if `a` is strictly fitter than `b`.
    fn is_better(
        &self,
        a: &<Self::Individual as Individual>::Fitness,
        b: &<Self::Individual as Individual>::Fitness,
    ) -> bool;

    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        rng: &mut R,
    ) -> Vec<Self::Individual>;

    fn mutate<R: Rng>(&self, individual: &mut Self::Individual, rng: &mut R);
}
