//! GA problem definition for tour planning.
//!
//! Implements [`GaProblem`] over giant-tour genomes, scored by
//! [`FitnessEvaluator`] (split, then distance + duration + penalties).
//!
//! # Operators
//!
//! - **Crossover**: Order crossover (OX), preserves relative address order
//! - **Mutation**: Swap or segment inversion with equal probability
//! - **Seeds**: priority-first and nearest-neighbor orderings
//!
//! # Reference
//!
//! Prins, C. (2004). "A simple and effective evolutionary algorithm for the
//! vehicle routing problem", *Computers & Operations Research* 31(12), 1985-2002.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::constructive::{nearest_neighbor_order, priority_order};
use crate::evaluation::{Fitness, FitnessEvaluator};

use super::chromosome::Genome;
use super::operators::{invert_mutation, order_crossover, swap_mutation};
use super::traits::GaProblem;

/// Giant-tour GA problem over one instance.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use tour_ga::distance::CostModel;
/// use tour_ga::evaluation::{CostWeights, FitnessEvaluator};
/// use tour_ga::ga::{GaConfig, GaRunner, RoutingProblem, SplitStrategy};
/// use tour_ga::models::{Address, Coordinates, Instance, VehicleConstraints};
/// use tour_ga::CancellationToken;
///
/// let addresses: Vec<Address> = (1..=4)
///     .map(|k| Address::new(format!("S{k}"), Coordinates::new(0.0, 0.1 * k as f64), 10))
///     .collect();
/// let constraints = VehicleConstraints::default().with_max_load(30);
/// let inst = Instance::new(&addresses, Coordinates::new(0.0, 0.0), &constraints, CostModel::default());
/// let problem = RoutingProblem::new(FitnessEvaluator::new(&inst, CostWeights::default(), SplitStrategy::Greedy));
///
/// let config = GaConfig::default().with_population_size(20).with_max_generations(30);
/// let mut rng = StdRng::seed_from_u64(1);
/// let result = GaRunner::run(&problem, &config, &mut rng, &CancellationToken::new());
/// assert!(result.best.is_permutation_of(4));
/// assert!(result.generations >= 1);
/// ```
pub struct RoutingProblem<'a> {
    fitness: FitnessEvaluator<'a>,
}

impl<'a> RoutingProblem<'a> {
    pub fn new(fitness: FitnessEvaluator<'a>) -> Self {
        Self { fitness }
    }

    pub fn fitness_evaluator(&self) -> &FitnessEvaluator<'a> {
        &self.fitness
    }

    fn num_addresses(&self) -> usize {
        self.fitness.tour_evaluator().instance().len()
    }
}

impl GaProblem for RoutingProblem<'_> {
    type Individual = Genome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Genome {
        let mut order: Vec<usize> = (0..self.num_addresses()).collect();
        order.shuffle(rng);
        Genome::new(order)
    }

    fn seed_individuals(&self) -> Vec<Genome> {
        let instance = self.fitness.tour_evaluator().instance();
        let by_priority = priority_order(instance);
        let nearest = nearest_neighbor_order(instance);
        if by_priority == nearest {
            vec![Genome::new(by_priority)]
        } else {
            vec![Genome::new(by_priority), Genome::new(nearest)]
        }
    }

    fn enumerate_individuals(&self, limit: usize) -> Option<Vec<Genome>> {
        let n = self.num_addresses();
        let count = (1..=n).try_fold(1usize, |acc, k| acc.checked_mul(k).filter(|&c| c <= limit))?;

        let mut order: Vec<usize> = (0..n).collect();
        let mut all = Vec::with_capacity(count);
        loop {
            all.push(Genome::new(order.clone()));
            if !next_permutation(&mut order) {
                break;
            }
        }
        Some(all)
    }

    fn evaluate(&self, individual: &Genome) -> Fitness {
        self.fitness.evaluate(individual.order())
    }

    fn is_better(&self, a: &Fitness, b: &Fitness) -> bool {
        a.is_better_than(b)
    }

    fn crossover<R: Rng>(&self, parent1: &Genome, parent2: &Genome, rng: &mut R) -> Vec<Genome> {
        let (c1, c2) = order_crossover(parent1.order(), parent2.order(), rng);
        vec![Genome::new(c1), Genome::new(c2)]
    }

    fn mutate<R: Rng>(&self, individual: &mut Genome, rng: &mut R) {
        if individual.len() < 2 {
            return;
        }
        if rng.random_bool(0.5) {
            swap_mutation(individual.order_mut(), rng);
        } else {
            invert_mutation(individual.order_mut(), rng);
        }
    }
}

/// Advances `order` to the next lexicographic permutation. Returns `false`
/// (leaving `order` untouched) once it is the last one.
fn next_permutation(order: &mut [usize]) -> bool {
    let Some(pivot) = order.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let Some(successor) = order.iter().rposition(|&x| x > order[pivot]) else {
        return false;
    };
    order.swap(pivot, successor);
    order[pivot + 1..].reverse();
    true
}
