//! Planar geometry used by the packing engine.
//!
//! Everything here is a thin layer over `geo`: circles as regular polygons, the target region and
//! bounding frame, a bounding-box R-tree over circles, boolean helpers that normalize the output of
//! floating-point set operations, and bounded Voronoi tessellation.

mod bbox;
mod circle;
mod frame;
mod geom;
mod index;
mod voronoi;

pub use circle::{Circle, CircleId, circle_polygon};
pub use frame::{BoundingBox, Region};
pub use geom::{clean, components, random_point_in, random_points_in, union_all};
pub(crate) use index::CircleIndex;
pub use voronoi::tessellate;
