//! Genetic algorithm over giant-tour genomes.
//!
//! - [`Genome`]: Permutation of all address indices
//! - [`split`]: Cuts a giant tour into depot-to-depot tours (greedy or Prins DP)
//! - [`operators`]: Order crossover, swap and inversion mutation
//! - [`RoutingProblem`]: [`GaProblem`] implementation for tour planning
//! - [`GaRunner`]: Generation loop with elitism, convergence, and cancellation

mod chromosome;
mod controller;
pub mod operators;
pub mod population;
mod problem;
pub mod split;
mod traits;

pub use chromosome::Genome;
pub use controller::{GaConfig, GaResult, GaRunner};
pub use problem::RoutingProblem;
pub use split::{split, SplitResult, SplitStrategy};
pub use traits::{GaProblem, Individual};
