//! Parsed feeds and their items.

use chrono::{DateTime, FixedOffset};

/// A parsed RSS/Atom source.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub title: String,

    /// Home page of the site publishing the feed
    pub link: Option<String>,

    /// Effective language (site override, else the feed's own)
    pub language: Option<String>,

    /// Entries in document order, assumed newest first
    pub items: Vec<Item>,
}

/// One entry of a feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    pub title: String,

    /// Outbound article link; rewritten with tracking parameters before publishing
    pub link: Option<String>,

    /// Publication time; required to name the record
    pub published_at: Option<DateTime<FixedOffset>>,

    pub categories: Vec<String>,

    /// `host + path` of the feed's home link, set during annotation
    pub site_tag: String,

    /// Set during annotation from the feed language
    pub language: Option<String>,
}
