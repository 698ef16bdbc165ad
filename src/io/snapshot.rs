use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::agent::{Agent, AgentSnapshot};

/// Save an agent as a JSON [`AgentSnapshot`].
pub fn write_snapshot(agent: &Agent, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(&agent.snapshot())
        .context("[io::snapshot] Failed to serialize agent")?;
    fs::write(path, bytes).with_context(|| format!("[io::snapshot] Failed to write {}", path.display()))
}

/// Load a JSON [`AgentSnapshot`].
pub fn read_snapshot(path: &Path) -> Result<AgentSnapshot> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::snapshot] Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("[io::snapshot] Invalid agent snapshot in {}", path.display()))
}
