pub mod args;
pub mod config;
pub mod constants;
pub mod dms;
pub mod download;
pub mod geotag;
pub mod http_client;
pub mod jpeg;
pub mod output;
pub mod search;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_support;

use std::future::Future;

use anyhow::Result;
use reqwest::Client;
use tracing::info;

use crate::config::Config;
use crate::download::{download_images, DownloadReport};
use crate::output::{prepare_output_dir, write_downloaded_list};
use crate::search::query_search_api;
use crate::types::BoundingBox;

/// Search, download, geotag, then record what landed in `downloaded.txt`.
pub async fn run<I>(
    http: &Client,
    cfg: &Config,
    bbox: &BoundingBox,
    max_results: u32,
    interrupt: I,
) -> Result<DownloadReport>
where
    I: Future<Output = ()>,
{
    let records = query_search_api(http, &cfg.search_url, bbox, max_results).await?;
    prepare_output_dir(&cfg.output_dir).await?;

    let report = download_images(http, cfg, &records, interrupt).await;

    let downloaded = report.downloaded();
    let list_path = cfg.downloaded_list_path();
    write_downloaded_list(&list_path, &downloaded).await?;
    info!("Wrote {} entries to {}", downloaded.len(), list_path.display());

    report.log_summary();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{image_json, spawn_fixture};
    use serde_json::json;

    fn sample_box() -> BoundingBox {
        BoundingBox {
            min_lat: 45.0,
            max_lat: 46.0,
            min_lon: -74.0,
            max_lon: -73.0,
        }
    }

    fn config_for(base: &str, output_dir: &std::path::Path) -> Config {
        Config {
            search_url: format!("{base}/v1/im/search"),
            output_dir: output_dir.to_path_buf(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn empty_search_leaves_only_an_empty_list() {
        let base = spawn_fixture(|_| json!([])).await;
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("downloaded");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("old.jpg"), b"stale").unwrap();

        let report = run(
            &Client::new(),
            &config_for(&base, &out),
            &sample_box(),
            400,
            std::future::pending(),
        )
        .await
        .unwrap();

        assert!(report.outcomes.is_empty());
        let names: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("downloaded.txt")]);
        assert_eq!(std::fs::read_to_string(out.join("downloaded.txt")).unwrap(), "");
    }

    #[tokio::test]
    async fn full_run_lists_downloads_and_is_repeatable() {
        let base = spawn_fixture(|base| {
            json!([
                image_json(base, "alpha", 45.5, -73.5667, 12.3),
                image_json(base, "missing-beta", 45.6, -73.6, 90.0),
                image_json(base, "gamma", 45.0, -73.0, 180.0),
            ])
        })
        .await;
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("downloaded");
        let cfg = config_for(&base, &out);

        for _ in 0..2 {
            let report = run(&Client::new(), &cfg, &sample_box(), 400, std::future::pending())
                .await
                .unwrap();
            assert_eq!(report.downloaded().len(), 2);

            let listing = std::fs::read_to_string(cfg.downloaded_list_path()).unwrap();
            assert_eq!(listing, "alpha.jpg,45.5,-73.5667\ngamma.jpg,45.0,-73.0\n");
            assert_eq!(std::fs::read_dir(&out).unwrap().count(), 3);
        }
    }

    #[tokio::test]
    async fn search_failure_is_fatal_and_keeps_previous_output() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("downloaded");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("keep.jpg"), b"previous run").unwrap();
        let base = spawn_fixture(|_| json!([])).await;
        let cfg = Config {
            search_url: format!("{base}/broken-search"),
            output_dir: out.clone(),
            ..Config::default()
        };

        let result = run(&Client::new(), &cfg, &sample_box(), 400, std::future::pending()).await;

        assert!(result.is_err());
        assert!(out.join("keep.jpg").exists());
    }
}
