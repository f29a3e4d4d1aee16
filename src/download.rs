use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Error, Result};
use reqwest::Client;
use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::geotag::geotag_file;
use crate::http_client::fetch_bytes;
use crate::types::{record_label, DownloadedEntry, ImageRecord};

/// What happened to one search result.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Downloaded and geotagged.
    Success(DownloadedEntry),
    /// The raw record could not be turned into an `ImageRecord`.
    DecodeError { label: String, error: Error },
    /// Fetching the thumbnail to disk failed: transport, HTTP status or the
    /// local write.
    NetworkError { filename: String, error: Error },
    /// The image is on disk but carries no geotag.
    MetadataError { entry: DownloadedEntry, error: Error },
}

impl ItemOutcome {
    /// Entry for `downloaded.txt`, present whenever the file landed on disk.
    pub fn downloaded_entry(&self) -> Option<&DownloadedEntry> {
        match self {
            ItemOutcome::Success(entry) | ItemOutcome::MetadataError { entry, .. } => Some(entry),
            ItemOutcome::DecodeError { .. } | ItemOutcome::NetworkError { .. } => None,
        }
    }

    fn failure(&self) -> Option<(&'static str, &str)> {
        match self {
            ItemOutcome::Success(_) => None,
            ItemOutcome::DecodeError { label, .. } => Some(("malformed", label.as_str())),
            ItemOutcome::NetworkError { filename, .. } => Some(("download", filename.as_str())),
            ItemOutcome::MetadataError { entry, .. } => Some(("geotag", entry.filename.as_str())),
        }
    }

    fn log(&self) {
        match self {
            ItemOutcome::Success(_) => {}
            ItemOutcome::DecodeError { label, error } => {
                warn!("Skipping malformed record {label}: {error:#}");
            }
            ItemOutcome::NetworkError { filename, error } => {
                warn!("Failed to download: {filename}: {error:#}");
            }
            ItemOutcome::MetadataError { entry, error } => {
                warn!("Skipping geotag for {}: {error:#}", entry.filename);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FailureCounts {
    pub decode: usize,
    pub network: usize,
    pub metadata: usize,
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub outcomes: Vec<ItemOutcome>,
    pub interrupted: bool,
}

impl DownloadReport {
    pub fn downloaded(&self) -> Vec<&DownloadedEntry> {
        self.outcomes
            .iter()
            .filter_map(ItemOutcome::downloaded_entry)
            .collect()
    }

    pub fn failure_counts(&self) -> FailureCounts {
        let mut counts = FailureCounts::default();
        for outcome in &self.outcomes {
            match outcome {
                ItemOutcome::Success(_) => {}
                ItemOutcome::DecodeError { .. } => counts.decode += 1,
                ItemOutcome::NetworkError { .. } => counts.network += 1,
                ItemOutcome::MetadataError { .. } => counts.metadata += 1,
            }
        }
        counts
    }

    pub fn log_summary(&self) {
        let counts = self.failure_counts();
        info!(
            "Downloaded {} of {} processed images ({} malformed, {} download failures, {} untagged){}",
            self.downloaded().len(),
            self.outcomes.len(),
            counts.decode,
            counts.network,
            counts.metadata,
            if self.interrupted { "; interrupted" } else { "" }
        );
        for (kind, name) in self.outcomes.iter().filter_map(ItemOutcome::failure) {
            warn!("  {kind} failure: {name}");
        }
    }
}

/// Download every record in order into `cfg.output_dir`, geotagging each
/// file right after it lands. Resolving `interrupt` abandons a fetch still
/// in flight and ends the loop; once a thumbnail's bytes have arrived the
/// record is written, geotagged and reported before the loop stops.
pub async fn download_images<I>(
    http: &Client,
    cfg: &Config,
    records: &[Value],
    interrupt: I,
) -> DownloadReport
where
    I: Future<Output = ()>,
{
    tokio::pin!(interrupt);
    let mut report = DownloadReport::default();

    for (index, raw) in records.iter().enumerate() {
        let record = match ImageRecord::from_json(raw) {
            Ok(record) => record,
            Err(error) => {
                let outcome = ItemOutcome::DecodeError {
                    label: record_label(index, raw),
                    error,
                };
                outcome.log();
                report.outcomes.push(outcome);
                continue;
            }
        };

        let url = record.thumbnail_url(cfg.thumb_size);
        let fetched = tokio::select! {
            biased;
            _ = &mut interrupt => {
                warn!("Interrupted after {} of {} images", index, records.len());
                report.interrupted = true;
                break;
            }
            fetched = fetch_bytes(http, &url) => fetched,
        };

        let outcome = store_and_geotag(cfg, &record, fetched).await;
        outcome.log();
        report.outcomes.push(outcome);
    }

    report
}

async fn store_and_geotag(
    cfg: &Config,
    record: &ImageRecord,
    fetched: Result<Vec<u8>>,
) -> ItemOutcome {
    let filename = record.filename();
    let path = cfg.output_dir.join(&filename);
    let stored = match fetched {
        Ok(bytes) => fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed writing {}", path.display())),
        Err(error) => Err(error),
    };
    if let Err(error) = stored {
        return ItemOutcome::NetworkError { filename, error };
    }

    let entry = record.downloaded_entry();
    info!("Successfully downloaded: {filename} ca={}", record.ca);

    match geotag_in_background(path, record).await {
        Ok(()) => ItemOutcome::Success(entry),
        Err(error) => ItemOutcome::MetadataError { entry, error },
    }
}

async fn geotag_in_background(path: PathBuf, record: &ImageRecord) -> Result<()> {
    let (lat, lon, ca) = (record.lat, record.lon, record.ca);
    tokio::task::spawn_blocking(move || geotag_file(&path, lat, lon, ca))
        .await
        .context("Join error while geotagging")?
}
