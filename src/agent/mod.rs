//! The genetic individual and the geometry-driven operations on it.

mod agent;
mod overlap;
mod repair;

pub use agent::{Agent, AgentSnapshot, REGION_THRESHOLD, SELF_THRESHOLD};
pub use overlap::{circle_union, region_overlap, self_overlap, uncovered, Intersections, RegionOverlap, SelfOverlap};
pub(crate) use overlap::exclusive_area;
pub use repair::{RepairParams, RepairScheme, COVERAGE_SLACK};
