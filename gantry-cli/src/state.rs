//! Persisted resource status
//!
//! The state file holds one [`ResourceStatus`] as pretty JSON. A missing
//! file means nothing has been recorded yet.

use std::path::Path;

use anyhow::{Context, Result};
use gantry_core::ResourceStatus;

pub fn load_status(path: &Path) -> Result<ResourceStatus> {
    if !path.exists() {
        tracing::debug!("No state file at {}, starting empty", path.display());
        return Ok(ResourceStatus::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse state file: {}", path.display()))
}

pub fn save_status(path: &Path, status: &ResourceStatus) -> Result<()> {
    let content = serde_json::to_string_pretty(status).context("Failed to encode state")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write state file: {}", path.display()))
}
