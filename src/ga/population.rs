//! Population initialization, evaluation, selection, and breeding.

use std::collections::HashSet;

use rand::seq::index;
use rand::Rng;
use rayon::prelude::*;

use super::controller::GaConfig;
use super::traits::{GaProblem, Individual};

/// Random draws allowed per population slot before duplicates are accepted.
const REDRAWS_PER_SLOT: usize = 20;

/// First generation: every distinct individual when the space is no larger
/// than the population, otherwise the problem's seeds topped up with random
/// individuals. Members are distinct unless the redraw budget runs out.
pub fn initialize<P: GaProblem, R: Rng>(problem: &P, size: usize, rng: &mut R) -> Vec<P::Individual> {
    if let Some(all) = problem.enumerate_individuals(size) {
        return all;
    }
    let mut seen = HashSet::with_capacity(size);
    let mut population = Vec::with_capacity(size);
    for seed in problem.seed_individuals() {
        if population.len() == size {
            break;
        }
        if seen.insert(seed.key()) {
            population.push(seed);
        }
    }

    let mut redraws = size.saturating_mul(REDRAWS_PER_SLOT);
    while population.len() < size {
        let candidate = problem.create_individual(rng);
        if seen.insert(candidate.key()) || redraws == 0 {
            population.push(candidate);
        } else {
            redraws -= 1;
        }
    }
    population
}

/// Scores every individual, in parallel on the rayon pool if requested.
pub fn evaluate<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], parallel: bool) {
    if parallel {
        individuals.par_iter_mut().for_each(|ind| {
            let fitness = problem.evaluate(ind);
            ind.set_fitness(fitness);
        });
    } else {
        for ind in individuals.iter_mut() {
            let fitness = problem.evaluate(ind);
            ind.set_fitness(fitness);
        }
    }
}

/// Index of the fittest individual. Ties keep the earliest.
pub fn best_index<P: GaProblem>(problem: &P, population: &[P::Individual]) -> Option<usize> {
    (0..population.len()).reduce(|best, i| {
        if problem.is_better(&population[i].fitness(), &population[best].fitness()) {
            i
        } else {
            best
        }
    })
}

/// Tournament selection: samples `k` distinct members uniformly and returns
/// the fittest. `population` must not be empty.
pub fn tournament<'p, P: GaProblem, R: Rng>(
    problem: &P,
    population: &'p [P::Individual],
    k: usize,
    rng: &mut R,
) -> &'p P::Individual {
    let k = k.max(1).min(population.len());
    let mut contenders = index::sample(rng, population.len(), k).into_iter();
    let first = contenders.next().unwrap_or(0);
    let winner = contenders.fold(first, |best, i| {
        if problem.is_better(&population[i].fitness(), &population[best].fitness()) {
            i
        } else {
            best
        }
    });
    &population[winner]
}

/// Breeds the next generation. `elite` is copied unmodified into slot 0;
/// the remaining slots are offspring of tournament-selected parents,
/// recombined with probability `crossover_rate` and then each mutated with
/// probability `mutation_rate`. Offspring need evaluating.
pub fn next_generation<P: GaProblem, R: Rng>(
    problem: &P,
    population: &[P::Individual],
    elite: &P::Individual,
    config: &GaConfig,
    rng: &mut R,
) -> Vec<P::Individual> {
    let size = config.population_size.max(1);
    let mut next = Vec::with_capacity(size);
    next.push(elite.clone());

    while next.len() < size {
        let p1 = tournament(problem, population, config.tournament_size, rng);
        let p2 = tournament(problem, population, config.tournament_size, rng);
        let children = if rng.random_bool(config.crossover_rate) {
            problem.crossover(p1, p2, rng)
        } else {
            vec![p1.clone(), p2.clone()]
        };
        for mut child in children {
            if next.len() == size {
                break;
            }
            if rng.random_bool(config.mutation_rate) {
                problem.mutate(&mut child, rng);
            }
            next.push(child);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostModel;
    use crate::evaluation::{CostWeights, FitnessEvaluator};
    use crate::ga::{Genome, RoutingProblem, SplitStrategy};
    use crate::models::{Address, Coordinates, Instance, VehicleConstraints};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DEPOT: Coordinates = Coordinates::new(0.0, 0.0);

    fn addresses(n: usize) -> Vec<Address> {
        (0..n)
            .map(|i| {
                let angle = i as f64 * 0.7;
                Address::new(
                    format!("S{i}"),
                    Coordinates::new(0.2 * angle.sin(), 0.2 * angle.cos()),
                    10,
                )
            })
            .collect()
    }

    fn problem<'a>(inst: &'a Instance<'a>) -> RoutingProblem<'a> {
        RoutingProblem::new(FitnessEvaluator::new(inst, CostWeights::default(), SplitStrategy::Greedy))
    }

    #[test]
    fn test_initialize_enumerates_small_inputs() {
        let addrs = addresses(3);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let mut rng = StdRng::seed_from_u64(1);
        let pop = initialize(&problem(&inst), 10, &mut rng);
        assert_eq!(pop.len(), 6);
        let mut orders: Vec<_> = pop.iter().map(|g| g.order().to_vec()).collect();
        orders.sort();
        orders.dedup();
        assert_eq!(orders.len(), 6);
    }

    #[test]
    fn test_initialize_seeds_then_random() {
        let addrs = addresses(8);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let p = problem(&inst);
        let mut rng = StdRng::seed_from_u64(2);
        let pop = initialize(&p, 12, &mut rng);
        assert_eq!(pop.len(), 12);
        assert!(pop.iter().all(|g| g.is_permutation_of(8)));
        let seeds = p.seed_individuals();
        assert_eq!(pop[0].order(), seeds[0].order());
    }

    #[test]
    fn test_initialize_draws_distinct_orders() {
        // 5! = 120 orders, so 100 members come from random draws.
        let addrs = addresses(5);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let mut rng = StdRng::seed_from_u64(1);
        let pop = initialize(&problem(&inst), 100, &mut rng);
        assert_eq!(pop.len(), 100);
        assert!(pop.iter().all(|g| g.is_permutation_of(5)));
        let distinct: HashSet<Vec<usize>> = pop.iter().map(|g| g.order().to_vec()).collect();
        assert_eq!(distinct.len(), pop.len());
    }

    #[test]
    fn test_evaluate_parallel_matches_sequential() {
        let addrs = addresses(9);
        let c = VehicleConstraints::default().with_max_load(30);
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let p = problem(&inst);
        let mut rng = StdRng::seed_from_u64(3);
        let mut a = initialize(&p, 16, &mut rng);
        let mut b = a.clone();
        evaluate(&p, &mut a, true);
        evaluate(&p, &mut b, false);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.fitness(), y.fitness());
            assert!(x.fitness().is_evaluated());
        }
    }

    #[test]
    fn test_tournament_full_size_returns_best() {
        let addrs = addresses(7);
        let c = VehicleConstraints::default().with_max_load(30);
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let p = problem(&inst);
        let mut rng = StdRng::seed_from_u64(4);
        let mut pop = initialize(&p, 10, &mut rng);
        evaluate(&p, &mut pop, false);
        let best = best_index(&p, &pop).unwrap();
        let winner = tournament(&p, &pop, pop.len(), &mut rng);
        assert_eq!(winner.fitness(), pop[best].fitness());
    }

    #[test]
    fn test_next_generation_keeps_elite_and_size() {
        let addrs = addresses(8);
        let c = VehicleConstraints::default().with_max_load(30);
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let p = problem(&inst);
        let config = GaConfig::default().with_population_size(15);
        let mut rng = StdRng::seed_from_u64(5);
        let mut pop = initialize(&p, 15, &mut rng);
        evaluate(&p, &mut pop, false);
        let elite: Genome = pop[best_index(&p, &pop).unwrap()].clone();

        let next = next_generation(&p, &pop, &elite, &config, &mut rng);
        assert_eq!(next.len(), 15);
        assert_eq!(next[0].order(), elite.order());
        assert_eq!(next[0].fitness(), elite.fitness());
        assert!(next.iter().all(|g| g.is_permutation_of(8)));
    }

    #[test]
    fn test_best_index_empty() {
        let addrs = addresses(2);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        assert_eq!(best_index(&problem(&inst), &[]), None);
    }
}
