// Property tests over random circle sets:
//   bounded overlap fractions, pruning monotonicity, the soft-inverse objective and crossover size.

use circlepack::{
    agent::{region_overlap, self_overlap, Agent, REGION_THRESHOLD, SELF_THRESHOLD},
    evolve::breed,
    geom::{BoundingBox, Circle, CircleId, Region},
    optimize::{soft_inverse, CoverageObjective},
};
use geo::{Area, BooleanOps, Coord};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn square() -> Region {
    Region::rectangle(Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 4.0 }).unwrap()
}

fn frame() -> BoundingBox {
    BoundingBox::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 5.0, y: 5.0 }).unwrap()
}

fn centers(max: usize) -> impl Strategy<Value = Vec<Coord<f64>>> {
    prop::collection::vec((-1.0..5.0f64, -1.0..5.0f64), 0..max)
        .prop_map(|points| points.into_iter().map(|(x, y)| Coord { x, y }).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn overlap_fractions_stay_in_unit_interval(centers in centers(12), radius in 0.2..1.5f64) {
        let circles = centers.iter().enumerate()
            .map(|(i, &c)| Circle::new(CircleId(i as u64), c, radius, 16))
            .collect::<Vec<_>>();

        let own = self_overlap(&circles);
        prop_assert!((0.0..=1.0).contains(&own.fraction));

        let region = region_overlap(&square(), &circles, &frame());
        prop_assert!((0.0..=1.0).contains(&region.covered_fraction));
        prop_assert!(region.overflow_fraction >= 0.0);
        if circles.is_empty() {
            prop_assert_eq!(own.fraction, 0.0);
            prop_assert_eq!(region.covered_fraction, 0.0);
        }
    }

    #[test]
    fn pruning_never_grows_an_agent(centers in centers(12)) {
        let mut agent = Agent::from_centers(frame(), 0.6, 16, centers);
        let before = agent.length();
        let removed = agent.prune_irrelevant(&square(), REGION_THRESHOLD, SELF_THRESHOLD);

        prop_assert!(agent.length() <= before);
        prop_assert_eq!(agent.length() + removed.len(), before);
        let inside = |circle: &Circle| square().shape().intersection(&circle.to_multi()).unsigned_area();
        let first_pass = agent.circles().iter()
            .chain(removed.iter().filter(|c| inside(*c) >= REGION_THRESHOLD * c.area()))
            .collect::<Vec<_>>();
        for circle in removed.iter() {
            if inside(circle) < REGION_THRESHOLD * circle.area() { continue }
            let exclusive = first_pass.iter()
                .filter(|other| other.id() != circle.id())
                .fold(circle.to_multi(), |rest, other| rest.difference(&other.to_multi()))
                .unsigned_area();
            prop_assert!(exclusive < SELF_THRESHOLD * circle.area() + 1e-6);
        }
    }

    #[test]
    fn soft_inverse_is_bounded(r in 0.0..1e6f64) {
        let value = soft_inverse(r);
        prop_assert!(value.is_finite());
        prop_assert!(value > 0.0 && value <= 1.0);
    }

    #[test]
    fn coverage_objective_is_bounded(x in prop::collection::vec(-1e3..1e3f64, 0..12)) {
        let region = square();
        let objective = CoverageObjective::for_region(&region, 0.6, 16);
        let value = objective.value(&x);
        prop_assert!(value.is_finite());
        prop_assert!(value > 0.0 && value <= 1.0);
    }

    #[test]
    fn crossover_children_are_bounded_by_both_parents(a in centers(10), b in centers(10), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut first = Agent::from_centers(frame(), 0.6, 16, a);
        let mut second = Agent::from_centers(frame(), 0.6, 16, b);
        first.refresh(&square(), &mut rng);
        second.refresh(&square(), &mut rng);

        let (x, y) = breed(&first, &second, &mut rng);
        let bound = first.length() + second.length();
        prop_assert!(x.length() <= bound);
        prop_assert!(y.length() <= bound);
        prop_assert!(x.length() >= 1 && y.length() >= 1);
    }
}

#[test]
fn soft_inverse_is_one_at_zero() {
    assert_eq!(soft_inverse(0.0), 1.0);
    let region = square();
    assert_eq!(CoverageObjective::for_region(&region, 0.6, 16).value(&[]), 1.0);
    assert_eq!(CoverageObjective::for_region(&region, 0.6, 16).value(&[50.0, 50.0]), 1.0);
}
