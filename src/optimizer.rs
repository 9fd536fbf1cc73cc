//! Public entry point: validate input, evolve, assemble the result.

use std::collections::HashSet;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument};

use crate::assembler::{self, RunSummary};
use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::error::{Result, ValidationError};
use crate::evaluation::FitnessEvaluator;
use crate::ga::{GaConfig, GaRunner, RoutingProblem};
use crate::models::{Address, Coordinates, Instance, OptimizationResult, VehicleConstraints};

/// Plans tours with the process-wide [`EngineConfig::global`] settings.
///
/// # Examples
///
/// ```
/// use tour_ga::models::{Address, Coordinates, VehicleConstraints};
///
/// let depot = Coordinates::new(48.1067, 11.4247);
/// let addresses = vec![
///     Address::new("A1", Coordinates::new(48.1372, 11.5756), 10),
///     Address::new("A2", Coordinates::new(48.1500, 11.5800), 15),
/// ];
/// let result = tour_ga::optimize(&addresses, depot, &VehicleConstraints::default()).unwrap();
/// assert_eq!(result.statistics.total_tours, 1);
/// assert_eq!(result.num_served(), 2);
/// ```
pub fn optimize(
    addresses: &[Address],
    depot: Coordinates,
    constraints: &VehicleConstraints,
) -> Result<OptimizationResult> {
    Optimizer::new(EngineConfig::global().clone()).optimize(addresses, depot, constraints)
}

/// Plans tours with an explicit configuration.
pub fn optimize_with(
    addresses: &[Address],
    depot: Coordinates,
    constraints: &VehicleConstraints,
    config: &EngineConfig,
) -> Result<OptimizationResult> {
    Optimizer::new(config.clone()).optimize(addresses, depot, constraints)
}

/// Reusable optimizer holding a configuration and a cancellation token.
///
/// Each call owns its own population and random source; one optimizer may
/// serve concurrent calls.
///
/// # Examples
///
/// ```
/// use tour_ga::models::{Address, Coordinates, VehicleConstraints};
/// use tour_ga::{EngineConfig, Optimizer};
///
/// let config = EngineConfig::default().with_population_size(30).with_seed(7);
/// let optimizer = Optimizer::new(config);
/// let addresses: Vec<Address> = (1..=6)
///     .map(|k| Address::new(format!("A{k}"), Coordinates::new(48.1 + 0.01 * k as f64, 11.5), 20))
///     .collect();
/// let constraints = VehicleConstraints::default().with_max_load(40);
///
/// let result = optimizer.optimize(&addresses, Coordinates::new(48.1, 11.4), &constraints).unwrap();
/// assert!(result.tours.iter().all(|t| t.total_load() <= 40));
/// assert_eq!(result.metadata.seed, 7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: EngineConfig,
    cancel: CancellationToken,
}

impl Optimizer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses `token` to stop runs early.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Partitions `addresses` into tours from and back to `depot`.
    ///
    /// Fails only on malformed input. Constraint breaches that can't be
    /// avoided, such as a stop heavier than the vehicle, are reported as
    /// violations on the returned tours.
    #[instrument(level = "info", skip_all, fields(addresses = addresses.len()))]
    pub fn optimize(
        &self,
        addresses: &[Address],
        depot: Coordinates,
        constraints: &VehicleConstraints,
    ) -> Result<OptimizationResult> {
        let started = Instant::now();
        self.config.validate()?;
        constraints.validate()?;
        depot.validate("depot")?;
        validate_addresses(addresses)?;

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());

        if addresses.is_empty() {
            info!("no addresses, returning empty plan");
            return Ok(assembler::empty_result(RunSummary::trivial(
                seed,
                self.config.population_size,
                started.elapsed(),
            )));
        }

        info!(seed, population = self.config.population_size, "optimization started");
        let instance = Instance::new(addresses, depot, constraints, self.config.cost_model());
        let fitness = FitnessEvaluator::new(&instance, self.config.cost_weights(), self.config.split_strategy);
        let problem = RoutingProblem::new(fitness);

        let mut rng = StdRng::seed_from_u64(seed);
        let ga = GaRunner::run(&problem, &GaConfig::from(&self.config), &mut rng, &self.cancel);

        let run = RunSummary {
            generations: ga.generations,
            termination: ga.termination,
            seed,
            population_size: self.config.population_size,
            convergence: ga.history.iter().map(|f| f.cost).collect(),
            elapsed: started.elapsed(),
        };
        let mut result = assembler::assemble(
            problem.fitness_evaluator(),
            ga.best.order(),
            self.config.polish_tours,
            run,
        );
        result.metadata.optimization_time_ms =
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            tours = result.statistics.total_tours,
            distance_km = result.statistics.total_distance,
            score = result.statistics.optimization_score,
            generations = result.metadata.iterations,
            elapsed_ms = result.metadata.optimization_time_ms,
            "optimization finished"
        );
        Ok(result)
    }
}

fn validate_addresses(addresses: &[Address]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(addresses.len());
    for address in addresses {
        address.validate()?;
        if !seen.insert(address.id()) {
            return Err(ValidationError::DuplicateAddressId(address.id().to_string()));
        }
    }
    Ok(())
}
