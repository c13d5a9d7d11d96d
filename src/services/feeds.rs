// src/services/feeds.rs

//! Feed fetcher service.
//!
//! Retrieves one RSS/Atom document per site and normalizes it into a [`Feed`].
//! Publication times keep the UTC offset written in the document, since the
//! offset is part of every record identifier.

use async_trait::async_trait;
use atom_syndication::Link;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Feed, Item, Site};

/// Default upper bound on a feed document, in bytes.
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024;

/// Source of parsed feeds.
///
/// Implementations must be shareable across the concurrent fetch tasks.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Retrieve and parse the feed of one site.
    async fn fetch(&self, site: &Site) -> Result<Feed>;
}

/// Fetches feeds over HTTP with the shared client.
///
/// The per-request timeout comes from the client (see
/// [`create_async_client`](crate::utils::http::create_async_client)).
#[derive(Clone)]
pub struct HttpFeedFetcher {
    client: Client,
    max_bytes: usize,
}

impl HttpFeedFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_bytes: MAX_FEED_SIZE,
        }
    }

    /// Override the document size limit.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn too_large(&self, site: &Site) -> AppError {
        AppError::feed(
            &site.feed_url,
            format!("feed exceeds {} bytes", self.max_bytes),
        )
    }
}

#[async_trait]
impl FeedSource for HttpFeedFetcher {
    async fn fetch(&self, site: &Site) -> Result<Feed> {
        let mut response = self.client.get(&site.feed_url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::feed(
                &site.feed_url,
                format!("HTTP {}", response.status()),
            ));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(self.too_large(site));
            }
        }

        // Stop reading once the limit is passed; the length header is optional
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(site));
            }
            body.extend_from_slice(&chunk);
        }

        parse_feed(&body, site)
    }
}

/// Parse feed bytes for a site.
///
/// RSS (0.9x, 1.0, 2.0) is tried first, then Atom. Items keep document order.
/// The site's configured language replaces the one the feed declares; without
/// one, the feed's own language is kept.
pub fn parse_feed(bytes: &[u8], site: &Site) -> Result<Feed> {
    let mut feed = match rss::Channel::read_from(bytes) {
        Ok(channel) => from_rss(&channel),
        Err(rss_err) => match atom_syndication::Feed::read_from(bytes) {
            Ok(atom) => from_atom(&atom),
            Err(atom_err) => {
                return Err(AppError::feed(
                    &site.feed_url,
                    format!("neither RSS ({rss_err}) nor Atom ({atom_err})"),
                ));
            }
        },
    };

    if let Some(language) = site.language() {
        feed.language = Some(language.to_string());
    }
    feed.language = feed.language.filter(|l| !l.trim().is_empty());
    Ok(feed)
}

fn from_rss(channel: &rss::Channel) -> Feed {
    Feed {
        title: channel.title().trim().to_string(),
        link: non_blank(channel.link()),
        language: channel.language().map(str::to_string),
        items: channel.items().iter().map(rss_item).collect(),
    }
}

fn rss_item(item: &rss::Item) -> Item {
    // Dublin Core `dc:date` stands in for a missing or unreadable pubDate
    let dc_date = item
        .dublin_core_ext()
        .and_then(|dc| dc.dates().first())
        .and_then(|raw| parse_date(raw));

    Item {
        title: item.title().unwrap_or_default().trim().to_string(),
        link: item.link().and_then(non_blank),
        published_at: item.pub_date().and_then(parse_date).or(dc_date),
        categories: terms(item.categories().iter().map(|c| c.name())),
        ..Item::default()
    }
}

fn from_atom(feed: &atom_syndication::Feed) -> Feed {
    Feed {
        title: feed.title().value.trim().to_string(),
        link: home_link(feed.links()),
        language: feed.lang().map(str::to_string),
        items: feed.entries().iter().map(atom_entry).collect(),
    }
}

fn atom_entry(entry: &atom_syndication::Entry) -> Item {
    Item {
        title: entry.title().value.trim().to_string(),
        link: entry_link(entry.links()),
        // Atom entries may only carry `updated`
        published_at: Some(entry.published().copied().unwrap_or(*entry.updated())),
        categories: terms(entry.categories().iter().map(|c| c.term())),
        ..Item::default()
    }
}

/// The feed's link to its site, skipping `rel="self"` document links.
fn home_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel() != "self")
        .or_else(|| links.first())
        .and_then(|l| non_blank(l.href()))
}

/// The entry's article link, preferring `alternate`.
fn entry_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel() == "alternate")
        .or_else(|| links.first())
        .and_then(|l| non_blank(l.href()))
}

/// Parse an RFC 2822 (RSS) or RFC 3339 (Atom, Dublin Core) timestamp.
fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

fn terms<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
