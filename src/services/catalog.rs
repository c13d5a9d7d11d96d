// src/services/catalog.rs

//! Site catalog loader.
//!
//! The catalog is a JSON object mapping arbitrary site keys to
//! `{"rss_url": "...", "language": "..."}`. It is fetched fresh on every run;
//! any failure here aborts the run.

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::SiteCatalog;

/// Fetch and decode the site catalog.
pub async fn fetch_site_catalog(client: &Client, url: &str) -> Result<SiteCatalog> {
    log::info!("Loading site catalog from {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::catalog(format!("failed to fetch {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::catalog(format!(
            "failed to fetch {url}: HTTP {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::catalog(format!("failed to read {url}: {e}")))?;

    parse_catalog(&bytes)
}

/// Decode catalog JSON.
pub fn parse_catalog(bytes: &[u8]) -> Result<SiteCatalog> {
    serde_json::from_slice(bytes).map_err(|e| AppError::catalog(format!("malformed catalog: {e}")))
}
