use geo::{Area, Coord, MultiPolygon};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    agent::{
        agent::{REGION_THRESHOLD, SELF_THRESHOLD},
        overlap::uncovered,
        Agent,
    },
    geom::{circle_polygon, components, random_points_in, Region},
    optimize::{flatten, minimize, unflatten, CoverageObjective, MinimizerParams},
};

/// Added to the granularity when testing whether an agent covers the region.
pub const COVERAGE_SLACK: f64 = 1e-4;

/// How repair searches for a covering arrangement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairScheme {
    /// One optimization of all centers against the whole region.
    Standard,
    /// Rounds of optimization over the uncovered remainder, seeded with fresh circles, followed by
    /// one standard pass.
    Recursive,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairParams {
    /// Uncovered area below which the region counts as covered.
    pub granularity: f64,
    /// Maximum number of rounds of the recursive scheme.
    pub max_rounds: usize,
    /// Remainder components up to this area receive no fresh circles.
    pub min_component_area: f64,
    pub region_threshold: f64,
    pub self_threshold: f64,
    pub minimizer: MinimizerParams,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            granularity: 0.0,
            max_rounds: 3,
            min_component_area: 1.0,
            region_threshold: REGION_THRESHOLD,
            self_threshold: SELF_THRESHOLD,
            minimizer: MinimizerParams::default(),
        }
    }
}

impl RepairParams {
    #[inline]
    fn tolerance(&self) -> f64 { self.granularity + COVERAGE_SLACK }
}

impl Agent {
    /// Move, add and prune circles until the uncovered part of `region` is smaller than the
    /// granularity. Returns whether that was reached; the agent is modified either way and always
    /// ends with a pruning pass.
    pub fn repair<R: Rng + ?Sized>(&mut self, region: &Region, scheme: RepairScheme, params: &RepairParams, rng: &mut R) -> bool {
        let covered = if self.is_covered(region, params) {
            true
        } else {
            self.refresh(region, rng);
            match scheme {
                RepairScheme::Standard => self.repair_standard(region, params),
                RepairScheme::Recursive => self.repair_recursive(region, params, rng),
            }
        };

        let removed = self.prune_irrelevant(region, params.region_threshold, params.self_threshold);
        debug!("repair ({scheme:?}): covered = {covered}, {} circles, {} pruned", self.length(), removed.len());
        covered
    }

    /// Whether the uncovered part of `region` is within tolerance.
    pub fn is_covered(&self, region: &Region, params: &RepairParams) -> bool {
        uncovered(region, self.circles()).unsigned_area() < params.tolerance()
    }

    /// Optimize `seeds` against `target` and return the optimized centers.
    fn optimize_centers(&self, target: &MultiPolygon<f64>, seeds: &[Coord<f64>], params: &MinimizerParams) -> Vec<Coord<f64>> {
        let objective = CoverageObjective::new(target, self.radius(), self.segments());
        let bounds = self.bounding_box().coordinate_bounds(seeds.len());
        let minimum = minimize(|x| objective.value(x), &flatten(seeds), &bounds, params);
        trace!(
            "optimized {} centers: value = {:.6e}, {} iterations, {} evaluations",
            seeds.len(), minimum.value, minimum.iterations, minimum.evaluations,
        );
        unflatten(&minimum.x)
    }

    fn repair_standard(&mut self, region: &Region, params: &RepairParams) -> bool {
        let optimized = self.optimize_centers(region.shape(), &self.circle_centers(), &params.minimizer);
        self.replace_centers(optimized);
        self.is_covered(region, params)
    }

    fn repair_recursive<R: Rng + ?Sized>(&mut self, region: &Region, params: &RepairParams, rng: &mut R) -> bool {
        let circle_area = circle_polygon(Coord { x: 0.0, y: 0.0 }, self.radius(), self.segments()).unsigned_area();
        let mut worklist = vec![(region.shape().clone(), self.circle_centers())];

        for round in 0..params.max_rounds {
            let mut optimized = Vec::new();
            for (target, seeds) in worklist.iter().filter(|(_, seeds)| !seeds.is_empty()) {
                optimized.extend(self.optimize_centers(target, seeds, &params.minimizer));
            }
            if round == 0 {
                self.replace_centers(optimized);
            } else {
                optimized.into_iter().for_each(|center| { self.add(center); });
            }

            let remainder = uncovered(region, self.circles());
            let area = remainder.unsigned_area();
            debug!("recursive repair round {round}: {} circles, uncovered area {area:.6}", self.length());
            if area < params.tolerance() || round + 1 == params.max_rounds { break }

            worklist = components(&remainder).into_iter()
                .map(|component| {
                    let component_area = component.unsigned_area();
                    let count = if component_area > params.min_component_area {
                        (component_area / circle_area).ceil() as usize
                    } else {
                        0
                    };
                    let seeds = random_points_in(&component, count, rng);
                    (component, seeds)
                })
                .collect();
        }

        if self.is_covered(region, params) { true } else { self.repair_standard(region, params) }
    }
}
