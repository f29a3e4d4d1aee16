use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::info;

use crate::types::DownloadedEntry;

/// Start from an empty output directory. Previous contents are deleted; a
/// missing directory is fine, any other removal error is fatal.
pub async fn prepare_output_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => info!("Removed previous output in {}", dir.display()),
        Err(error) if error.kind() == ErrorKind::NotFound => {}
        Err(error) => {
            return Err(error).with_context(|| format!("Failed to remove {}", dir.display()))
        }
    }
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))
}

pub fn format_downloaded_list(entries: &[&DownloadedEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}\n", entry.to_line()))
        .collect()
}

pub async fn write_downloaded_list(path: &Path, entries: &[&DownloadedEntry]) -> Result<()> {
    fs::write(path, format_downloaded_list(entries))
        .await
        .with_context(|| format!("Failed writing {}", path.display()))
}
