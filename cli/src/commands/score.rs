use anyhow::Result;
use circlepack::{
    agent::Agent,
    evolve::{score, Problem},
    io::{read_region_geojson, read_snapshot},
};

use super::load_config;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::ScoreArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let initial_length = args.initial_length.unwrap_or(config.initial_length);

    let region = read_region_geojson(&args.region)?;
    let snapshot = read_snapshot(&args.agent)?;
    let problem = Problem::with_margin(region, snapshot.radius, args.margin.unwrap_or(snapshot.radius))?;
    let agent = Agent::from_snapshot(&snapshot, problem.bounding_box.clone())?;

    let breakdown = score(&agent, &problem.region, &config.weights, initial_length);
    println!("fitness           {:.6}", breakdown.fitness);
    println!("circles           {}", breakdown.length);
    println!("covered fraction  {:.6}", breakdown.covered_fraction);
    println!("overflow fraction {:.6}", breakdown.overflow_fraction);
    println!("self overlap      {:.6}", breakdown.self_overlap_fraction);

    Ok(())
}
