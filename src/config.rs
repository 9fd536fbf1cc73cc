//! Engine configuration.
//!
//! [`EngineConfig`] holds the search parameters and cost model of a run. A
//! process-wide default is available through [`EngineConfig::global`]: it is
//! read from `TOUR_GA_*` environment variables on first use, or set once
//! with [`EngineConfig::install`], and is read-only afterwards.

use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::distance::CostModel;
use crate::error::ValidationError;
use crate::evaluation::CostWeights;
use crate::ga::SplitStrategy;

static GLOBAL: OnceLock<EngineConfig> = OnceLock::new();

/// Prefix of the environment variables read by [`EngineConfig::from_env`].
pub const ENV_PREFIX: &str = "TOUR_GA_";

/// Search parameters and cost model of one optimization run.
///
/// # Examples
///
/// ```
/// use tour_ga::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_population_size(50)
///     .with_max_generations(100)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub population_size: usize,
    pub max_generations: usize,
    /// Stop after this many consecutive generations without improvement.
    pub convergence_generations: usize,
    pub tournament_size: usize,
    pub crossover_rate: f64,
    /// Per-genome mutation probability.
    pub mutation_rate: f64,
    pub average_speed_kmh: f64,
    pub service_minutes_per_stop: f64,
    /// Cost per km.
    pub distance_weight: f64,
    /// Cost per minute.
    pub duration_weight: f64,
    /// Cost of one violation, scaled by `1 + magnitude`.
    pub penalty_weight: f64,
    pub split_strategy: SplitStrategy,
    /// Apply 2-opt to each final tour.
    pub polish_tours: bool,
    /// Evaluate each generation on the rayon thread pool.
    pub parallel_evaluation: bool,
    /// Seed of the random source; `None` draws a fresh one per call.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 200,
            convergence_generations: 50,
            tournament_size: 3,
            crossover_rate: 0.9,
            mutation_rate: 0.2,
            average_speed_kmh: 50.0,
            service_minutes_per_stop: 5.0,
            distance_weight: 1.0,
            duration_weight: 1.0,
            penalty_weight: 1000.0,
            split_strategy: SplitStrategy::Greedy,
            polish_tours: true,
            parallel_evaluation: true,
            seed: None,
        }
    }
}

impl EngineConfig {
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

    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_cost_model(mut self, average_speed_kmh: f64, service_minutes_per_stop: f64) -> Self {
        self.average_speed_kmh = average_speed_kmh;
        self.service_minutes_per_stop = service_minutes_per_stop;
        self
    }

    pub fn with_weights(mut self, distance: f64, duration: f64, penalty: f64) -> Self {
        self.distance_weight = distance;
        self.duration_weight = duration;
        self.penalty_weight = penalty;
        self
    }

    pub fn with_split_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.split_strategy = strategy;
        self
    }

    pub fn with_polish_tours(mut self, polish: bool) -> Self {
        self.polish_tours = polish;
        self
    }

    pub fn with_parallel_evaluation(mut self, parallel: bool) -> Self {
        self.parallel_evaluation = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn cost_model(&self) -> CostModel {
        CostModel::new(self.average_speed_kmh, self.service_minutes_per_stop)
    }

    pub fn cost_weights(&self) -> CostWeights {
        CostWeights {
            distance: self.distance_weight,
            duration: self.duration_weight,
            penalty: self.penalty_weight,
        }
    }

    /// Checks every parameter's range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        fn invalid(name: &'static str, reason: impl Into<String>) -> ValidationError {
            ValidationError::InvalidConfig {
                name,
                reason: reason.into(),
            }
        }

        if self.population_size < 2 {
            return Err(invalid("population_size", "must be at least 2"));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations", "must be at least 1"));
        }
        if self.convergence_generations == 0 {
            return Err(invalid("convergence_generations", "must be at least 1"));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(invalid(
                "tournament_size",
                format!("must be in 1..={}", self.population_size),
            ));
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(invalid(name, format!("{rate} is not a probability")));
            }
        }
        if !(self.average_speed_kmh.is_finite() && self.average_speed_kmh > 0.0) {
            return Err(invalid("average_speed_kmh", "must be a positive number"));
        }
        for (name, value) in [
            ("service_minutes_per_stop", self.service_minutes_per_stop),
            ("distance_weight", self.distance_weight),
            ("duration_weight", self.duration_weight),
            ("penalty_weight", self.penalty_weight),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(name, "must be a non-negative number"));
            }
        }
        Ok(())
    }

    /// Defaults overridden by `TOUR_GA_*` environment variables, e.g.
    /// `TOUR_GA_POPULATION_SIZE=200` or `TOUR_GA_SPLIT_STRATEGY=optimal`.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| lookup(&format!("{ENV_PREFIX}{}", name.to_uppercase()));
        let mut config = Self::default();

        macro_rules! override_field {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(raw) = read(stringify!($field)) {
                        config.$field = parse(stringify!($field), &raw)?;
                    }
                )*
            };
        }
        override_field!(
            population_size,
            max_generations,
            convergence_generations,
            tournament_size,
            crossover_rate,
            mutation_rate,
            average_speed_kmh,
            service_minutes_per_stop,
            distance_weight,
            duration_weight,
            penalty_weight,
            polish_tours,
            parallel_evaluation,
        );

        if let Some(raw) = read("split_strategy") {
            config.split_strategy = match raw.trim().to_ascii_lowercase().as_str() {
                "greedy" => SplitStrategy::Greedy,
                "optimal" => SplitStrategy::Optimal,
                other => {
                    return Err(ValidationError::InvalidConfig {
                        name: "split_strategy",
                        reason: format!("unknown strategy `{other}`"),
                    })
                }
            };
        }
        if let Some(raw) = read("seed") {
            config.seed = Some(parse("seed", &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Process-wide default. Initialised from the environment on first use,
    /// falling back to [`EngineConfig::default`] if the environment is
    /// malformed.
    pub fn global() -> &'static EngineConfig {
        GLOBAL.get_or_init(|| match Self::from_env() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed environment configuration");
                Self::default()
            }
        })
    }

    /// Sets the process-wide default. Fails if it was already initialised.
    pub fn install(config: EngineConfig) -> Result<(), ValidationError> {
        config.validate()?;
        GLOBAL.set(config).map_err(|_| ValidationError::InvalidConfig {
            name: "global",
            reason: "already initialised".into(),
        })
    }
}

fn parse<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ValidationError> {
    raw.trim().parse().map_err(|_| ValidationError::InvalidConfig {
        name,
        reason: format!("cannot parse `{raw}`"),
    })
}
