//! Genetic Algorithm framework.
//!
//! A generic GA engine built on trait-based abstractions. A problem is
//! defined by implementing [`GaProblem`], which specifies how to create,
//! evaluate, crossover, and mutate individuals. Route search plugs into it
//! through [`crate::planner`].
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with a possibly stale fitness
//! - [`GaProblem`]: Problem definition: initialization, evaluation, operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, rates, selection)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Final optimization result with statistics
//!
//! # Submodules
//!
//! - [`operators`]: Fixed-endpoint route crossover and mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
pub use types::{Fitness, GaProblem, Individual};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates the seeded generator used throughout the engine.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
