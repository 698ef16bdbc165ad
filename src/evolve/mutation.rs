use geo::{Area, BooleanOps};
use rand::{seq::IndexedRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    agent::{exclusive_area, Agent},
    error::Result,
    geom::{CircleId, CircleIndex, Region},
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationParams {
    /// Probability of each sub-step.
    pub probability: f64,
    /// Largest per-axis translation of a relocated circle.
    pub offset: f64,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self { probability: 0.5, offset: 0.1 }
    }
}

/// Apply the three mutation sub-steps to `agent`, in order, each gated on the circle count at the
/// time it is checked:
/// 1. remove the circle with the smallest exclusive area (needs more than one circle);
/// 2. remove the circle with the smallest overlap with `region` (needs more than one circle);
/// 3. move a random circle by a uniform offset on each axis (needs at least one circle).
pub fn mutate<R: Rng + ?Sized>(agent: &mut Agent, region: &Region, params: &MutationParams, rng: &mut R) -> Result<()> {
    if agent.length() > 1 && rng.random_bool(params.probability) {
        if let Some(id) = most_redundant(agent) {
            agent.remove(id)?;
        }
    }

    if agent.length() > 1 && rng.random_bool(params.probability) {
        if let Some(id) = least_inside(agent, region) {
            agent.remove(id)?;
        }
    }

    if agent.length() > 0 && rng.random_bool(params.probability) {
        if let Some(id) = agent.circles().choose(rng).map(|c| c.id()) {
            let dx = rng.random_range(-params.offset..=params.offset);
            let dy = rng.random_range(-params.offset..=params.offset);
            agent.relocate(id, dx, dy)?;
        }
    }

    Ok(())
}

/// The circle whose area outside all other circles is smallest.
fn most_redundant(agent: &Agent) -> Option<CircleId> {
    let circles = agent.circles();
    let index = CircleIndex::new(circles);
    (0..circles.len())
        .map(|idx| (idx, exclusive_area(circles, &index, idx, |_| true)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, _)| circles[idx].id())
}

/// The circle with the least area inside `region`.
fn least_inside(agent: &Agent, region: &Region) -> Option<CircleId> {
    agent.circles().iter()
        .map(|circle| (circle.id(), region.shape().intersection(&circle.to_multi()).unsigned_area()))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::BoundingBox;
    use geo::Coord;
    use rand::{rngs::StdRng, SeedableRng};

    fn square() -> Region {
        Region::rectangle(Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 4.0 }).unwrap()
    }

    fn agent(centers: &[(f64, f64)]) -> Agent {
        let frame = BoundingBox::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 5.0, y: 5.0 }).unwrap();
        Agent::from_centers(frame, 0.6, 32, centers.iter().map(|&(x, y)| Coord { x, y }))
    }

    #[test]
    fn certain_mutation_removes_redundant_then_outside_circle() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = agent(&[(1.0, 1.0), (1.1, 1.0), (3.0, 3.0), (4.3, 2.0)]);
        let params = MutationParams { probability: 1.0, offset: 0.0 };
        mutate(&mut agent, &square(), &params, &mut rng).unwrap();

        let centers = agent.circle_centers();
        assert_eq!(agent.length(), 2);
        assert!(!centers.contains(&Coord { x: 4.3, y: 2.0 }));
        assert!(centers.contains(&Coord { x: 3.0, y: 3.0 }));
    }

    #[test]
    fn single_circle_is_only_moved() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = agent(&[(2.0, 2.0)]);
        mutate(&mut agent, &square(), &MutationParams { probability: 1.0, offset: 0.1 }, &mut rng).unwrap();

        assert_eq!(agent.length(), 1);
        let center = agent.circle_centers()[0];
        assert!((center.x - 2.0).abs() <= 0.1 && (center.y - 2.0).abs() <= 0.1);
    }

    #[test]
    fn zero_probability_leaves_agent_untouched() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = agent(&[(1.0, 1.0), (1.1, 1.0), (3.0, 3.0)]);
        let before = agent.circle_centers();
        mutate(&mut agent, &square(), &MutationParams { probability: 0.0, offset: 0.1 }, &mut rng).unwrap();
        assert_eq!(agent.circle_centers(), before);
    }
}
