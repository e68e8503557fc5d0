//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Ensure the directory holding the data file exists, creating it if needed.
pub async fn ensure_data_dir(data_file: &str) -> anyhow::Result<()> {
    let Some(parent) = Path::new(data_file).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if tokio::fs::metadata(parent).await.is_err() {
        warn!(dir = %parent.display(), "data directory not found; creating it");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}
