//! Reading regions and writing agents.
//!
//! - `geojson` - regions in, circles out
//! - `snapshot` - JSON persistence of agents
//! - `svg` - rendering of an agent against its region

mod geojson;
mod snapshot;
mod svg;

pub use geojson::{agent_to_geojson, read_region_geojson, region_from_geojson_bytes, write_agent_geojson};
pub use snapshot::{read_snapshot, write_snapshot};
pub use svg::{agent_svg_string, write_agent_svg, SvgOptions};
