#![doc = "Circle packing of planar regions with a genetic algorithm"]
pub mod agent;
pub mod error;
pub mod evolve;
pub mod geom;
pub mod io;
pub mod optimize;

#[doc(inline)]
pub use agent::{Agent, AgentSnapshot, RepairParams, RepairScheme};

#[doc(inline)]
pub use error::{PackingError, Result};

#[doc(inline)]
pub use evolve::{run, run_with_observer, FitnessWeights, GaConfig, GenerationReport, Problem, RunResult};

#[doc(inline)]
pub use geom::{BoundingBox, Circle, CircleId, Region};
