use rand::Rng;

use crate::{agent::Agent, evolve::FitnessWeights, geom::Region};

/// The terms of one fitness evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitnessBreakdown {
    pub fitness: f64,
    pub length: usize,
    pub covered_fraction: f64,
    pub overflow_fraction: f64,
    pub self_overlap_fraction: f64,
}

/// Score the current circle set of `agent` without touching it.
///
/// `fitness = (α + β + χ) − α·length/initial_length − β·overflow − χ·self_overlap`
pub fn score(agent: &Agent, region: &Region, weights: &FitnessWeights, initial_length: usize) -> FitnessBreakdown {
    let intersections = agent.intersections(region);
    let length = agent.circles().len();
    let overflow_fraction = intersections.region.overflow_fraction;
    let self_overlap_fraction = intersections.self_overlap.fraction;

    let fitness = weights.max_score()
        - weights.alpha * (length as f64 / initial_length.max(1) as f64)
        - weights.beta * overflow_fraction
        - weights.chi * self_overlap_fraction;

    FitnessBreakdown {
        fitness,
        length,
        covered_fraction: intersections.region.covered_fraction,
        overflow_fraction,
        self_overlap_fraction,
    }
}

/// Refresh `agent`, score it and store the fitness on it.
pub fn evaluate<R: Rng + ?Sized>(
    agent: &mut Agent,
    region: &Region,
    weights: &FitnessWeights,
    initial_length: usize,
    rng: &mut R,
) -> FitnessBreakdown {
    agent.refresh(region, rng);
    let breakdown = score(agent, region, weights, initial_length);
    agent.set_fitness(breakdown.fitness);
    breakdown
}
