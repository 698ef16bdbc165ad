//! SVG rendering of an agent against its region.

mod color;
mod draw;
mod writer;

use std::path::Path;

use anyhow::Result;

use crate::{agent::Agent, geom::Region};

pub use draw::SvgOptions;
pub(crate) use writer::SvgWriter;

/// Render `agent` against `region` to an SVG file at `path`.
pub fn write_agent_svg(agent: &Agent, region: &Region, path: &Path, options: &SvgOptions) -> Result<()> {
    let mut writer = SvgWriter::create(path)?;
    draw::draw_agent(&mut writer, agent, region, options)
}

/// Render `agent` against `region` to an SVG string.
pub fn agent_svg_string(agent: &Agent, region: &Region, options: &SvgOptions) -> Result<String> {
    let mut writer = SvgWriter::in_memory();
    draw::draw_agent(&mut writer, agent, region, options)?;
    writer.into_string()
}
