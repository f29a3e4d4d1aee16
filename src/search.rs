use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::http_client::fetch_json;
use crate::types::BoundingBox;

pub fn build_search_url(endpoint: &str, bbox: &BoundingBox, max_results: u32) -> String {
    let params = [
        ("min-lat", bbox.min_lat.to_string()),
        ("max-lat", bbox.max_lat.to_string()),
        ("min-lon", bbox.min_lon.to_string()),
        ("max-lon", bbox.max_lon.to_string()),
        ("max-results", max_results.to_string()),
    ];
    let query = params
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{endpoint}?{query}")
}

/// Raw image objects in the box. Records are decoded one by one later so a
/// single malformed entry only costs that entry.
pub async fn query_search_api(
    http: &Client,
    endpoint: &str,
    bbox: &BoundingBox,
    max_results: u32,
) -> Result<Vec<Value>> {
    let url = build_search_url(endpoint, bbox, max_results);
    let records: Vec<Value> = fetch_json(http, &url)
        .await
        .context("Image search query failed")?;
    info!("Result: {} images in area.", records.len());
    Ok(records)
}
