pub mod run;
pub mod score;

use std::{fs, path::Path};

use anyhow::{Context, Result};
use circlepack::GaConfig;

/// Load a run configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<GaConfig> {
    let Some(path) = path else { return Ok(GaConfig::default()) };
    let bytes = fs::read(path).with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Invalid config in {}", path.display()))
}
