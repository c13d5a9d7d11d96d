//! Service layer for the feed publisher.
//!
//! This module contains the network-facing collaborators:
//! - Site catalog loading (`fetch_site_catalog`)
//! - Feed retrieval and parsing (`FeedSource`, `HttpFeedFetcher`)

mod catalog;
mod feeds;

pub use catalog::{fetch_site_catalog, parse_catalog};
pub use feeds::{FeedSource, HttpFeedFetcher, parse_feed};
