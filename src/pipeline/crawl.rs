// src/pipeline/crawl.rs

//! Concurrent feed retrieval.
//!
//! One task per site, bounded by a semaphore, all reporting into a single
//! channel. A slow site holds one permit and nothing else.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};

use crate::error::{AppError, Result};
use crate::models::{Feed, Site, SiteCatalog};
use crate::services::FeedSource;

/// Result of fetching one site.
#[derive(Debug)]
pub struct SiteFetch {
    /// Catalog key of the site
    pub key: String,
    pub site: Site,
    pub result: Result<Feed>,
}

/// Start one fetch task per site.
///
/// Every task sends exactly one [`SiteFetch`] unless it panics. The channel
/// closes once all tasks have finished, so callers can drain it with
/// `recv()` and compare the count against `sites.len()`.
pub fn spawn_fetches(
    fetcher: Arc<dyn FeedSource>,
    sites: SiteCatalog,
    max_concurrent: usize,
) -> mpsc::Receiver<SiteFetch> {
    let (tx, rx) = mpsc::channel(sites.len().max(1));
    let permits = Arc::new(Semaphore::new(max_concurrent.max(1)));

    for (key, site) in sites {
        let tx = tx.clone();
        let fetcher = Arc::clone(&fetcher);
        let permits = Arc::clone(&permits);

        tokio::spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(_permit) => fetcher.fetch(&site).await,
                Err(e) => Err(AppError::config(format!("fetch pool closed: {e}"))),
            };
            // Receiver dropped means the run was abandoned
            let _ = tx.send(SiteFetch { key, site, result }).await;
        });
    }

    rx
}
