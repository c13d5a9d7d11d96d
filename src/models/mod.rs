// src/models/mod.rs

//! Domain models for the feed publisher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod feed;
mod record;
mod site;

// Re-export all public types
pub use config::{CatalogConfig, Config, CrawlerConfig, PublishConfig, StoreConfig};
pub use feed::{Feed, Item};
pub use record::Record;
pub use site::{Site, SiteCatalog};
