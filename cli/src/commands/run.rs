use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use circlepack::{
    evolve::{run_with_observer, Generation, Problem},
    geom::Region,
    io::{read_region_geojson, write_agent_geojson, write_agent_svg, write_snapshot, SvgOptions},
};
use tracing::info;

use super::load_config;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::RunArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or_else(|| PathBuf::from("./best.json"));

    let mut config = load_config(args.config.as_deref())?;
    if let Some(population) = args.population { config.population = population }
    if let Some(initial_length) = args.initial_length { config.initial_length = initial_length }
    if let Some(generations) = args.generations { config.generations = generations }
    if let Some(granularity) = args.granularity { config.granularity = granularity }
    if args.seed.is_some() { config.seed = args.seed }
    if args.serial { config.parallel = false }

    info!("[run] loading region from {}", args.region.display());
    let region = read_region_geojson(&args.region)?;
    let problem = Problem::with_margin(region, args.radius, args.margin.unwrap_or(args.radius))?;

    if let Some(dir) = &args.frames {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create frames directory {}", dir.display()))?;
    }

    let mut frame_error = None;
    let result = run_with_observer(&problem, &config, |generation| {
        let Some(dir) = &args.frames else { return };
        if frame_error.is_some() { return }
        if let Err(error) = write_frame(dir, generation, &problem.region) {
            frame_error = Some(error);
        }
    })?;
    if let Some(error) = frame_error { return Err(error) }

    let best = &result.best;
    println!(
        "[run] best agent: fitness {:.6}, {} circles after {} generations",
        best.fitness(), best.length(), result.history.len(),
    );

    write_snapshot(best, &out_path)?;
    println!("[run] wrote agent snapshot to {}", out_path.display());

    if let Some(path) = &args.geojson {
        write_agent_geojson(best, path)?;
        println!("[run] wrote circles to {}", path.display());
    }
    if let Some(path) = &args.svg {
        write_agent_svg(best, &problem.region, path, &SvgOptions::default())?;
        println!("[run] wrote rendering to {}", path.display());
    }

    Ok(())
}

/// Render the first repaired agent of a generation and snapshot the whole population.
fn write_frame(dir: &Path, generation: &Generation<'_>, region: &Region) -> Result<()> {
    let index = generation.report.generation;
    if let Some(agent) = generation.population.first() {
        write_agent_svg(agent, region, &dir.join(format!("generation_{index:03}.svg")), &SvgOptions::default())?;
    }
    for (i, agent) in generation.population.iter().enumerate() {
        write_snapshot(agent, &dir.join(format!("generation_{index:03}_agent_{i:02}.json")))?;
    }
    Ok(())
}
