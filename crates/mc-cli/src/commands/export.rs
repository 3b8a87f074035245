//! Summary export: writes a [`MeetingSummary`] to disk as pretty JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use mc_core::MeetingSummary;

/// Writes `summary` to `path`, creating parent directories as needed.
pub fn write_summary(path: &Path, summary: &MeetingSummary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut json = summary
        .to_json_pretty()
        .context("failed to serialize summary")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        total_cost = summary.total_cost,
        "summary exported"
    );
    Ok(())
}
