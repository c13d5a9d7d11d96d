// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::CrawlerConfig;

/// Create the shared asynchronous HTTP client.
///
/// One client is built per run and handed to every component; it is cheap to
/// clone and safe to use from concurrent fetch tasks.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_with_defaults() {
        assert!(create_async_client(&CrawlerConfig::default()).is_ok());
    }
}
