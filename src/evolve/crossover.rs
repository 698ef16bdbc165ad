use geo::{Contains, Coord, Point, Polygon};
use rand::{seq::IndexedRandom, Rng};

use crate::{agent::Agent, geom::Region};

/// Number of breeding pairs for a pool of `survivors` agents: `survivors / 2` rounded half to even.
#[inline]
pub fn pair_count(survivors: usize) -> usize {
    (survivors as f64 / 2.0).round_ties_even() as usize
}

/// Breed the survivors pairwise and return the offspring, two children per pair.
///
/// Every survivor is refreshed first so that its centers and Voronoi cells describe its current
/// circle set. Parents are drawn uniformly with replacement.
pub fn crossover<R: Rng + ?Sized>(population: &mut [Agent], region: &Region, rng: &mut R) -> Vec<Agent> {
    population.iter_mut().for_each(|agent| agent.refresh(region, rng));

    let mut offspring = Vec::with_capacity(2 * pair_count(population.len()));
    for _ in 0..pair_count(population.len()) {
        let (Some(first), Some(second)) = (population.choose(rng), population.choose(rng)) else { break };
        let (a, b) = breed(first, second, rng);
        offspring.push(a);
        offspring.push(b);
    }
    offspring
}

/// Two children of refreshed parents.
///
/// The first child walks the Voronoi cells of `first`: per cell a fair coin keeps `first`'s center
/// or takes every center of `second` inside that cell. The second child is built the same way from
/// the cells of `second`. A cell containing no foreign center always keeps its own.
pub fn breed<R: Rng + ?Sized>(first: &Agent, second: &Agent, rng: &mut R) -> (Agent, Agent) {
    let child = |parent: &Agent, centers: Vec<Coord<f64>>| {
        Agent::from_centers(parent.bounding_box().clone(), parent.radius(), parent.segments(), centers)
    };

    let a = recombine(first.voronoi_cells(), first.centers(), second.centers(), rng);
    let b = recombine(second.voronoi_cells(), second.centers(), first.centers(), rng);
    (child(first, a), child(second, b))
}

fn recombine<R: Rng + ?Sized>(
    cells: &[Polygon<f64>],
    own: &[Coord<f64>],
    foreign: &[Coord<f64>],
    rng: &mut R,
) -> Vec<Coord<f64>> {
    let mut centers = Vec::with_capacity(own.len());
    for (cell, &center) in cells.iter().zip(own) {
        let keep_own = rng.random_bool(0.5);
        let inside = foreign.iter()
            .copied()
            .filter(|&c| cell.contains(&Point::from(c)))
            .collect::<Vec<_>>();

        if keep_own || inside.is_empty() {
            centers.push(center);
        } else {
            centers.extend(inside);
        }
    }
    centers
}
