// src/pipeline/select.rs

//! Per-feed item selection and annotation.

use crate::error::{AppError, Result};
use crate::models::{Feed, Item};
use crate::utils::{normalize_title, resolve_link, site_tag, with_tracking};

/// Number of items taken from the front of a feed.
///
/// `min(max, len - 1)`: the last entry of a feed is never published, even
/// when the feed is shorter than `max`. An empty feed selects nothing.
pub fn select_count(len: usize, max: usize) -> usize {
    max.min(len.saturating_sub(1))
}

/// Feed-level values copied onto every selected item.
#[derive(Debug, Clone, Default)]
pub struct FeedContext {
    pub home_link: Option<String>,
    pub site_tag: String,
    pub language: Option<String>,
}

impl FeedContext {
    pub fn from_feed(feed: &Feed) -> Self {
        let tag = feed.link.as_deref().and_then(site_tag);
        if tag.is_none() {
            log::warn!("Feed '{}' has no usable home link", feed.title);
        }
        Self {
            home_link: feed.link.clone(),
            site_tag: tag.unwrap_or_default(),
            language: feed.language.clone(),
        }
    }
}

/// Take the bounded prefix of a feed's items.
pub fn select_items(feed: Feed, max: usize) -> (FeedContext, Vec<Item>) {
    let context = FeedContext::from_feed(&feed);
    let count = select_count(feed.items.len(), max);
    let items = feed.items.into_iter().take(count).collect();
    (context, items)
}

/// Prepare an item for rendering.
///
/// Rewrites the link with tracking parameters, replaces double quotes in the
/// title, and attaches the site tag and language.
pub fn annotate(mut item: Item, context: &FeedContext, utm_source: &str) -> Result<Item> {
    let link = item
        .link
        .take()
        .filter(|link| !link.trim().is_empty())
        .ok_or(AppError::MissingField("link"))?;
    let link = resolve_link(&link, context.home_link.as_deref())?;

    item.link = Some(with_tracking(&link, utm_source)?);
    item.title = normalize_title(&item.title);
    item.site_tag = context.site_tag.clone();
    item.language = context.language.clone();
    Ok(item)
}
