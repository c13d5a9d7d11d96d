//! Site catalog entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Catalog of feed sources, keyed by an arbitrary site name.
pub type SiteCatalog = BTreeMap<String, Site>;

/// One feed source from the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Site {
    /// URL of the RSS/Atom document
    #[serde(rename = "rss_url")]
    pub feed_url: String,

    /// Language override for every item of this feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Site {
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Configured language, treating a blank value as absent.
    pub fn language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}
