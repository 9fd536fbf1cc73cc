//! Generation loop: breeding, elitism, termination, and convergence history.

use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::models::TerminationReason;

use super::population;
use super::traits::{GaProblem, Individual};

/// Parameters of the generation loop.
#[derive(Debug, Clone, PartialEq)]
pub struct GaConfig {
    pub population_size: usize,
    pub max_generations: usize,
    /// Consecutive generations without improvement before stopping.
    pub convergence_generations: usize,
    pub tournament_size: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for GaConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            population_size: config.population_size,
            max_generations: config.max_generations,
            convergence_generations: config.convergence_generations,
            tournament_size: config.tournament_size,
            crossover_rate: config.crossover_rate,
            mutation_rate: config.mutation_rate,
            parallel: config.parallel_evaluation,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    pub fn with_convergence_generations(mut self, generations: usize) -> Self {
        self.convergence_generations = generations;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// Best individual seen in any generation.
    pub best: I,
    /// Generations run after the initial population.
    pub generations: usize,
    pub termination: TerminationReason,
    /// Best fitness after each generation.
    pub history: Vec<I::Fitness>,
}

/// Runs the evolution loop.
pub struct GaRunner;

impl GaRunner {
    /// Evolves `problem` until the generation cap, convergence, or
    /// cancellation. At least one generation always runs. Cancellation is
    /// checked after each generation and keeps the best individual so far.
    #[instrument(level = "debug", skip_all, fields(population = config.population_size, max_generations = config.max_generations))]
    pub fn run<P: GaProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> GaResult<P::Individual> {
        let mut population = population::initialize(problem, config.population_size.max(1), rng);
        population::evaluate(problem, &mut population, config.parallel);

        let mut best = match population::best_index(problem, &population) {
            Some(i) => population[i].clone(),
            None => problem.create_individual(rng),
        };
        let mut history = Vec::with_capacity(config.max_generations);
        let mut generation = 0;
        let mut stall = 0;

        let termination = loop {
            population = population::next_generation(problem, &population, &best, config, rng);
            // Slot 0 is the elite and keeps its fitness.
            population::evaluate(problem, &mut population[1..], config.parallel);
            generation += 1;

            let improved = population::best_index(problem, &population)
                .filter(|&i| problem.is_better(&population[i].fitness(), &best.fitness()));
            match improved {
                Some(i) => {
                    best = population[i].clone();
                    stall = 0;
                    debug!(generation, fitness = ?best.fitness(), "new best");
                }
                None => stall += 1,
            }
            history.push(best.fitness());

            if generation >= config.max_generations {
                break TerminationReason::MaxGenerations;
            }
            if stall >= config.convergence_generations {
                break TerminationReason::Converged;
            }
            if cancel.is_cancelled() {
                warn!(generation, "optimization cancelled");
                break TerminationReason::Cancelled;
            }
        };

        debug!(generation, ?termination, "evolution finished");
        GaResult {
            best,
            generations: generation,
            termination,
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostModel;
    use crate::evaluation::{CostWeights, FitnessEvaluator};
    use crate::ga::{RoutingProblem, SplitStrategy};
    use crate::models::{Address, Coordinates, Instance, VehicleConstraints};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DEPOT: Coordinates = Coordinates::new(0.0, 0.0);

    fn addresses(n: usize) -> Vec<Address> {
        (0..n)
            .map(|i| {
                let angle = i as f64 * 2.3;
                Address::new(
                    format!("S{i}"),
                    Coordinates::new(0.3 * angle.sin(), 0.3 * angle.cos()),
                    10,
                )
            })
            .collect()
    }

    fn problem<'a>(inst: &'a Instance<'a>) -> RoutingProblem<'a> {
        RoutingProblem::new(FitnessEvaluator::new(inst, CostWeights::default(), SplitStrategy::Greedy))
    }

    #[test]
    fn test_runs_to_generation_cap() {
        let addrs = addresses(10);
        let c = VehicleConstraints::default().with_max_load(40);
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(15)
            .with_convergence_generations(1000);
        let mut rng = StdRng::seed_from_u64(1);
        let result = GaRunner::run(&problem(&inst), &config, &mut rng, &CancellationToken::new());
        assert_eq!(result.generations, 15);
        assert_eq!(result.termination, TerminationReason::MaxGenerations);
        assert_eq!(result.history.len(), 15);
        assert!(result.best.is_permutation_of(10));
    }

    #[test]
    fn test_history_never_worsens() {
        let addrs = addresses(12);
        let c = VehicleConstraints::default().with_max_load(30);
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let config = GaConfig::default().with_population_size(24).with_max_generations(40);
        let mut rng = StdRng::seed_from_u64(2);
        let result = GaRunner::run(&problem(&inst), &config, &mut rng, &CancellationToken::new());
        for w in result.history.windows(2) {
            assert!(!w[0].is_better_than(&w[1]));
            assert!(w[1].cost <= w[0].cost);
        }
        let last = result.history.last().unwrap();
        assert_eq!(last, &result.best.fitness());
    }

    #[test]
    fn test_converges_early() {
        // Two addresses: every permutation is enumerated up front, so the
        // best never improves afterwards.
        let addrs = addresses(2);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let config = GaConfig::default()
            .with_population_size(10)
            .with_max_generations(500)
            .with_convergence_generations(5);
        let mut rng = StdRng::seed_from_u64(3);
        let result = GaRunner::run(&problem(&inst), &config, &mut rng, &CancellationToken::new());
        assert_eq!(result.termination, TerminationReason::Converged);
        assert_eq!(result.generations, 5);
    }

    #[test]
    fn test_cancelled_still_runs_one_generation() {
        let addrs = addresses(8);
        let c = VehicleConstraints::default();
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let token = CancellationToken::new();
        token.cancel();
        let config = GaConfig::default().with_population_size(10);
        let mut rng = StdRng::seed_from_u64(4);
        let result = GaRunner::run(&problem(&inst), &config, &mut rng, &token);
        assert_eq!(result.termination, TerminationReason::Cancelled);
        assert_eq!(result.generations, 1);
        assert!(result.best.is_permutation_of(8));
    }

    #[test]
    fn test_same_seed_same_result() {
        let addrs = addresses(9);
        let c = VehicleConstraints::default().with_max_load(30);
        let inst = Instance::new(&addrs, DEPOT, &c, CostModel::default());
        let p = problem(&inst);
        let config = GaConfig::default().with_population_size(16).with_max_generations(20);
        let a = GaRunner::run(&p, &config, &mut StdRng::seed_from_u64(77), &CancellationToken::new());
        let b = GaRunner::run(&p, &config, &mut StdRng::seed_from_u64(77), &CancellationToken::new());
        assert_eq!(a.best.order(), b.best.order());
        assert_eq!(a.generations, b.generations);
    }
}
