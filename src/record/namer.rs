//! Record identifiers.

use chrono::{DateTime, FixedOffset, SecondsFormat};

/// Derive the record file name for an item.
///
/// `slug(title) + "-" + RFC 3339 timestamp + ".md"`. The result depends only
/// on the title and publication time, so every run computes the same name for
/// the same article; the content store is keyed on it.
pub fn identifier(title: &str, published_at: &DateTime<FixedOffset>) -> String {
    format!(
        "{}-{}.md",
        slug::slugify(title),
        published_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
