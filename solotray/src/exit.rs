use std::path::{Path, PathBuf};

use chrono::Local;

use crate::Result;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Writes the on-exit marker file into `dir` and returns its path.
///
/// The file is named `on_exit_<unix_nanos>.txt` and holds the local time of exit.
pub async fn write_exit_marker(dir: &Path) -> Result<PathBuf> {
    let now = Local::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000));

    let path = dir.join(format!("on_exit_{nanos}.txt"));
    tokio::fs::write(&path, now.to_rfc3339()).await?;

    tracing::debug!("Wrote exit marker {}", path.display());

    Ok(path)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
