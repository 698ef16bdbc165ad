use geo::{Area, BooleanOps, Coord, Polygon};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    agent::overlap::{exclusive_area, region_overlap, self_overlap, Intersections},
    error::{PackingError, Result},
    geom::{random_point_in, random_points_in, tessellate, BoundingBox, Circle, CircleId, CircleIndex, Region},
};

/// Default fraction of a circle that must lie inside the region to be kept.
pub const REGION_THRESHOLD: f64 = 0.05;

/// Default fraction of a circle that must be covered by no other circle to be kept.
pub const SELF_THRESHOLD: f64 = 0.05;

/// One candidate layout: a variable-size set of equal circles inside a shared frame.
///
/// `centers` and `voronoi_cells` are caches. They are only recomputed by [`Agent::refresh`] and
/// [`Agent::tessellate`] and are stale after any change to the circle set.
#[derive(Clone, Debug)]
pub struct Agent {
    circles: Vec<Circle>,
    bounding_box: BoundingBox,
    radius: f64,
    segments: usize,
    next_id: u64,
    length: usize,
    fitness: f64,
    centers: Vec<Coord<f64>>,
    voronoi_cells: Vec<Polygon<f64>>,
}

impl Agent {
    /// An agent without circles.
    pub fn new(bounding_box: BoundingBox, radius: f64, segments: usize) -> Self {
        Self {
            circles: Vec::new(),
            bounding_box,
            radius,
            segments,
            next_id: 0,
            length: 0,
            fitness: f64::NEG_INFINITY,
            centers: Vec::new(),
            voronoi_cells: Vec::new(),
        }
    }

    /// An agent with one circle per center.
    pub fn from_centers(
        bounding_box: BoundingBox,
        radius: f64,
        segments: usize,
        centers: impl IntoIterator<Item = Coord<f64>>,
    ) -> Self {
        let mut agent = Self::new(bounding_box, radius, segments);
        centers.into_iter().for_each(|center| { agent.add(center); });
        agent
    }

    /// `length` circles at random points of `region`, with irrelevant circles pruned.
    pub fn random<R: Rng + ?Sized>(
        region: &Region,
        bounding_box: BoundingBox,
        radius: f64,
        segments: usize,
        length: usize,
        rng: &mut R,
    ) -> Self {
        let centers = random_points_in(region.shape(), length, rng);
        let mut agent = Self::from_centers(bounding_box, radius, segments, centers);
        agent.prune_irrelevant(region, REGION_THRESHOLD, SELF_THRESHOLD);
        agent
    }

    #[inline] pub fn circles(&self) -> &[Circle] { &self.circles }

    #[inline] pub fn circle(&self, id: CircleId) -> Option<&Circle> { self.circles.iter().find(|c| c.id() == id) }

    #[inline] pub fn bounding_box(&self) -> &BoundingBox { &self.bounding_box }

    #[inline] pub fn radius(&self) -> f64 { self.radius }

    #[inline] pub fn segments(&self) -> usize { self.segments }

    /// Number of circles as of the last change to the circle set.
    #[inline] pub fn length(&self) -> usize { self.length }

    /// Last assigned fitness, `f64::NEG_INFINITY` while unscored.
    #[inline] pub fn fitness(&self) -> f64 { self.fitness }

    #[inline] pub fn is_scored(&self) -> bool { self.fitness.is_finite() }

    #[inline] pub(crate) fn set_fitness(&mut self, fitness: f64) { self.fitness = fitness }

    /// Circle centers as of the last refresh.
    #[inline] pub fn centers(&self) -> &[Coord<f64>] { &self.centers }

    /// Voronoi cells keyed by `centers()`, as of the last refresh.
    #[inline] pub fn voronoi_cells(&self) -> &[Polygon<f64>] { &self.voronoi_cells }

    /// Current circle centers, computed from the circle set directly.
    pub fn circle_centers(&self) -> Vec<Coord<f64>> {
        self.circles.iter().map(Circle::center).collect()
    }

    /// Add a circle at `center` and return its id.
    pub fn add(&mut self, center: Coord<f64>) -> CircleId {
        let id = CircleId(self.next_id);
        self.next_id += 1;
        self.circles.push(Circle::new(id, center, self.radius, self.segments));
        self.length = self.circles.len();
        id
    }

    /// Remove the circle with `id`.
    pub fn remove(&mut self, id: CircleId) -> Result<Circle> {
        let idx = self.position(id)?;
        let circle = self.circles.swap_remove(idx);
        self.length = self.circles.len();
        Ok(circle)
    }

    /// Replace the circle with `id` by one moved by `(dx, dy)`; returns the new circle's id.
    pub fn relocate(&mut self, id: CircleId, dx: f64, dy: f64) -> Result<CircleId> {
        let idx = self.position(id)?;
        let center = self.circles[idx].center();
        let moved = CircleId(self.next_id);
        self.next_id += 1;
        self.circles[idx] = Circle::new(moved, Coord { x: center.x + dx, y: center.y + dy }, self.radius, self.segments);
        Ok(moved)
    }

    /// Replace the whole circle set by circles at `centers`.
    pub(crate) fn replace_centers(&mut self, centers: impl IntoIterator<Item = Coord<f64>>) {
        self.circles.clear();
        centers.into_iter().for_each(|center| { self.add(center); });
        self.length = self.circles.len();
    }

    fn position(&self, id: CircleId) -> Result<usize> {
        self.circles.iter().position(|c| c.id() == id)
            .ok_or(PackingError::CircleNotFound(id))
    }

    /// Recompute `length`, `centers` and `voronoi_cells`. An agent without circles is first seeded
    /// with one random circle inside `region`.
    pub fn refresh<R: Rng + ?Sized>(&mut self, region: &Region, rng: &mut R) {
        self.length = self.circles.len();
        if self.length == 0 {
            if let Some(center) = random_point_in(region.shape(), rng) {
                self.add(center);
            }
        }
        self.centers = self.circle_centers();
        self.tessellate();
    }

    /// Recompute `voronoi_cells` from the cached `centers`, clipped to the bounding box.
    pub fn tessellate(&mut self) {
        self.voronoi_cells = tessellate(&self.centers, &self.bounding_box);
    }

    /// Remove circles that barely touch `region`, then circles that are almost entirely covered by
    /// the others. Returns the removed circles.
    ///
    /// The second pass only sees survivors of the first, and a circle removed in the second pass no
    /// longer counts as cover for the circles examined after it.
    pub fn prune_irrelevant(&mut self, region: &Region, region_threshold: f64, self_threshold: f64) -> Vec<Circle> {
        let (mut survivors, mut removed): (Vec<_>, Vec<_>) = std::mem::take(&mut self.circles)
            .into_iter()
            .partition(|circle| {
                let inside = region.shape().intersection(&circle.to_multi()).unsigned_area();
                inside >= region_threshold * circle.area()
            });

        let index = CircleIndex::new(&survivors);
        let mut redundant = vec![false; survivors.len()];
        for idx in 0..survivors.len() {
            let exclusive = exclusive_area(&survivors, &index, idx, |j| !redundant[j]);
            redundant[idx] = exclusive < self_threshold * survivors[idx].area();
        }

        let mut flags = redundant.into_iter();
        let (kept, dropped): (Vec<_>, Vec<_>) = survivors.drain(..)
            .partition(|_| !flags.next().unwrap_or(false));
        removed.extend(dropped);

        self.circles = kept;
        self.length = self.circles.len();
        removed
    }

    /// Self overlap and region overlap of the current circle set.
    pub fn intersections(&self, region: &Region) -> Intersections {
        Intersections {
            self_overlap: self_overlap(&self.circles),
            region: region_overlap(region, &self.circles, &self.bounding_box),
        }
    }

    /// Serializable view of this agent.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            radius: self.radius,
            segments: self.segments,
            fitness: self.is_scored().then_some(self.fitness),
            length: self.circles.len(),
            centers: self.circles.iter().map(|c| [c.center().x, c.center().y]).collect(),
        }
    }

    /// Rebuild an agent from a snapshot inside `bounding_box`.
    pub fn from_snapshot(snapshot: &AgentSnapshot, bounding_box: BoundingBox) -> Result<Self> {
        if !(snapshot.radius > 0.0 && snapshot.radius.is_finite()) {
            return Err(PackingError::InvalidGeometry(format!("snapshot radius must be positive, got {}", snapshot.radius)));
        }
        if snapshot.centers.iter().flatten().any(|v| !v.is_finite()) {
            return Err(PackingError::InvalidGeometry("snapshot centers must be finite".into()));
        }

        let centers = snapshot.centers.iter().map(|&[x, y]| Coord { x, y });
        let mut agent = Self::from_centers(bounding_box, snapshot.radius, snapshot.segments, centers);
        if let Some(fitness) = snapshot.fitness { agent.fitness = fitness }
        Ok(agent)
    }
}

/// Persisted form of an agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub radius: f64,
    pub segments: usize,
    pub fitness: Option<f64>,
    pub length: usize,
    pub centers: Vec<[f64; 2]>,
}
