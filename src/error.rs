//! Error types for circle packing runs.

use thiserror::Error;

use crate::geom::CircleId;

/// Errors surfaced by the packing engine.
///
/// Infeasible repairs are not errors: the repair engine reports them as `false` and the
/// evolutionary loop drops the agent.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PackingError {
    /// A circle referenced by id is not a member of the agent (stale reference).
    #[error("circle {0} was not found in this agent")]
    CircleNotFound(CircleId),

    /// Every agent failed repair.
    #[error("no agent survived repair; try increasing the population size or the initial circle count")]
    EmptyPopulation,

    /// The run configuration was rejected before starting.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input geometry cannot be used (empty, zero area, non-finite coordinates).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

pub type Result<T> = std::result::Result<T, PackingError>;
