use serde::{Deserialize, Serialize};

use crate::{
    agent::RepairParams,
    error::{PackingError, Result},
    geom::{BoundingBox, Region},
    optimize::MinimizerParams,
};

/// Weights of the penalty terms of the fitness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Weight of the normalized circle count.
    pub alpha: f64,
    /// Weight of the overflow fraction.
    pub beta: f64,
    /// Weight of the self-overlap fraction.
    pub chi: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self { alpha: 2.1, beta: 0.8, chi: 1.0 }
    }
}

impl FitnessWeights {
    /// The score of an agent with no penalty at all.
    #[inline] pub fn max_score(&self) -> f64 { self.alpha + self.beta + self.chi }
}

/// Parameters of one evolutionary run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of agents created at initialization.
    pub population: usize,
    /// Maximum number of generations.
    pub generations: usize,
    /// Circles per agent at initialization; also normalizes the circle-count penalty.
    pub initial_length: usize,
    /// Uncovered area below which the region counts as covered.
    pub granularity: f64,
    pub weights: FitnessWeights,
    /// Probability of each mutation sub-step.
    pub mutation_probability: f64,
    /// Largest per-axis translation of a relocated circle.
    pub mutation_offset: f64,
    /// Fraction of the population kept by truncation selection.
    pub survival_fraction: f64,
    /// Rounds of the recursive repair used at initialization.
    pub max_rounds: usize,
    /// Vertices of each circle polygon.
    pub segments: usize,
    /// Evaluate agents on the rayon thread pool.
    pub parallel: bool,
    /// Seed of the run; drawn from the OS when absent.
    pub seed: Option<u64>,
    pub minimizer: MinimizerParams,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population: 10,
            generations: 4,
            initial_length: 20,
            granularity: 0.0,
            weights: FitnessWeights::default(),
            mutation_probability: 0.5,
            mutation_offset: 0.1,
            survival_fraction: 0.5,
            max_rounds: 3,
            segments: 100,
            parallel: true,
            seed: None,
            minimizer: MinimizerParams::default(),
        }
    }
}

impl GaConfig {
    /// Reject configurations the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(PackingError::InvalidConfig(message));

        if self.population == 0 { return invalid("population must be at least 1".into()) }
        if self.initial_length == 0 { return invalid("initial_length must be at least 1".into()) }
        if self.segments < 3 { return invalid(format!("segments must be at least 3, got {}", self.segments)) }
        if !(self.granularity >= 0.0 && self.granularity.is_finite()) {
            return invalid(format!("granularity must be finite and non-negative, got {}", self.granularity))
        }
        for (name, p) in [
            ("mutation_probability", self.mutation_probability),
            ("survival_fraction", self.survival_fraction),
        ] {
            if !(0.0..=1.0).contains(&p) { return invalid(format!("{name} must lie in [0, 1], got {p}")) }
        }
        if !(self.mutation_offset >= 0.0 && self.mutation_offset.is_finite()) {
            return invalid(format!("mutation_offset must be finite and non-negative, got {}", self.mutation_offset))
        }
        let FitnessWeights { alpha, beta, chi } = self.weights;
        if ![alpha, beta, chi].iter().all(|w| w.is_finite()) {
            return invalid("fitness weights must be finite".into())
        }
        if self.minimizer.max_line_search == 0 {
            return invalid("minimizer.max_line_search must be at least 1".into())
        }

        Ok(())
    }

    /// Repair parameters derived from this configuration.
    pub fn repair_params(&self) -> RepairParams {
        RepairParams {
            granularity: self.granularity,
            max_rounds: self.max_rounds,
            minimizer: self.minimizer.clone(),
            ..Default::default()
        }
    }
}

/// What to pack: the region, the frame around it and the circle radius.
#[derive(Clone, Debug)]
pub struct Problem {
    pub region: Region,
    pub bounding_box: BoundingBox,
    pub radius: f64,
}

impl Problem {
    pub fn new(region: Region, bounding_box: BoundingBox, radius: f64) -> Result<Self> {
        let problem = Self { region, bounding_box, radius };
        problem.validate()?;
        Ok(problem)
    }

    /// A problem framed by the region's bounds grown by `margin`.
    pub fn with_margin(region: Region, radius: f64, margin: f64) -> Result<Self> {
        if !(margin >= 0.0 && margin.is_finite()) {
            return Err(PackingError::InvalidConfig(format!("margin must be finite and non-negative, got {margin}")))
        }
        let bounding_box = BoundingBox::around(&region, margin)?;
        Self::new(region, bounding_box, radius)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(PackingError::InvalidConfig(format!("radius must be positive and finite, got {}", self.radius)))
        }
        if self.region.area() <= 0.0 || self.bounding_box.area() <= 0.0 {
            return Err(PackingError::InvalidConfig("region and bounding box must have positive area".into()))
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    #[test]
    fn defaults_are_valid() {
        let config = GaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.weights.max_score(), 2.1 + 0.8 + 1.0);
        assert_eq!(config.repair_params().max_rounds, 3);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: GaConfig = serde_json::from_str(r#"{"population": 6, "weights": {"beta": 2.0}}"#).unwrap();
        assert_eq!(config.population, 6);
        assert_eq!(config.generations, 4);
        assert_eq!(config.weights, FitnessWeights { alpha: 2.1, beta: 2.0, chi: 1.0 });
    }

    #[test]
    fn invalid_values_are_rejected() {
        for config in [
            GaConfig { population: 0, ..Default::default() },
            GaConfig { granularity: -1.0, ..Default::default() },
            GaConfig { mutation_probability: 1.5, ..Default::default() },
            GaConfig { segments: 2, ..Default::default() },
        ] {
            assert!(matches!(config.validate(), Err(PackingError::InvalidConfig(_))));
        }
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let region = Region::rectangle(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }).unwrap();
        assert!(matches!(Problem::with_margin(region.clone(), 0.0, 0.5), Err(PackingError::InvalidConfig(_))));
        assert!(Problem::with_margin(region, 0.3, 0.5).is_ok());
    }
}
