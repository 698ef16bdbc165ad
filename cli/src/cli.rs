use std::path::PathBuf;

/// Circle packing CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "circlepack", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Evolve a packing of circles covering a region
    Run(RunArgs),

    /// Print the fitness terms of a saved agent
    Score(ScoreArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Region to cover (GeoJSON Polygon, MultiPolygon, Feature or FeatureCollection)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub region: PathBuf,

    /// Radius of every circle
    #[arg(long)]
    pub radius: f64,

    /// Run configuration (JSON); flags below override its fields
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Number of agents created at initialization
    #[arg(short, long)]
    pub population: Option<usize>,

    /// Circles per agent at initialization
    #[arg(long)]
    pub initial_length: Option<usize>,

    /// Maximum number of generations
    #[arg(short, long)]
    pub generations: Option<usize>,

    /// Uncovered area below which the region counts as covered
    #[arg(long)]
    pub granularity: Option<f64>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Evaluate agents on a single thread
    #[arg(long)]
    pub serial: bool,

    /// Margin between the region's bounds and the bounding box, defaults to the radius
    #[arg(long)]
    pub margin: Option<f64>,

    /// Render the best agent to this SVG file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub svg: Option<PathBuf>,

    /// Save the best agent as a JSON snapshot, defaults to "./best.json"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Write the best agent's circles as GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub geojson: Option<PathBuf>,

    /// Directory receiving an SVG frame and a snapshot per generation
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub frames: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ScoreArgs {
    /// Region the agent was packed against (GeoJSON)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub region: PathBuf,

    /// Agent snapshot (JSON)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub agent: PathBuf,

    /// Run configuration (JSON) supplying the fitness weights
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Circle count normalizing the length penalty, defaults to the configuration's
    #[arg(long)]
    pub initial_length: Option<usize>,

    /// Margin between the region's bounds and the bounding box, defaults to the radius
    #[arg(long)]
    pub margin: Option<f64>,
}
