//! Continuous optimization used by repair: the soft-inverse coverage objective and a bounded
//! quasi-Newton minimizer.

mod lbfgs;
mod objective;

pub use lbfgs::{minimize, MinimizerParams, Minimum};
pub use objective::{flatten, soft_inverse, unflatten, CoverageObjective};
