//! The generational loop: fitness, truncation selection, Voronoi crossover, mutation and repair.

mod config;
mod crossover;
mod fitness;
mod ga;
mod mutation;
mod selection;

pub use config::{FitnessWeights, GaConfig, Problem};
pub use crossover::{breed, crossover, pair_count};
pub use fitness::{evaluate, score, FitnessBreakdown};
pub use ga::{run, run_with_observer, Generation, GenerationReport, RunResult};
pub use mutation::{mutate, MutationParams};
pub use selection::{rank, select};
