use anyhow::{bail, Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

async fn get_checked(http: &Client, url: &str) -> Result<Response> {
    let response = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request failed for {url}"))?;

    if !response.status().is_success() {
        bail!("Request failed ({}) for {url}", response.status());
    }
    Ok(response)
}

pub async fn fetch_bytes(http: &Client, url: &str) -> Result<Vec<u8>> {
    let bytes = get_checked(http, url)
        .await?
        .bytes()
        .await
        .with_context(|| format!("Failed to read body for {url}"))?;
    Ok(bytes.to_vec())
}

pub async fn fetch_json<T: DeserializeOwned>(http: &Client, url: &str) -> Result<T> {
    get_checked(http, url)
        .await?
        .json::<T>()
        .await
        .with_context(|| format!("Failed to decode JSON body for {url}"))
}
