//! Front-matter rendering.

use chrono::SecondsFormat;

use crate::error::{AppError, Result};
use crate::models::{Item, Record};

use super::identifier;

/// Render an annotated item into a record.
///
/// Fails with [`AppError::MissingField`] when the item has no publication
/// time or no link.
pub fn render(item: &Item) -> Result<Record> {
    let published_at = item
        .published_at
        .as_ref()
        .ok_or(AppError::MissingField("date"))?;

    Ok(Record {
        identifier: identifier(&item.title, published_at),
        body: render_body(item)?,
        title: item.title.clone(),
    })
}

/// Render only the document body.
///
/// ```text
/// ---
/// title: "<title>"
/// date: <RFC 3339>
/// link: <link>
/// site: <site tag>
/// language: <language>      (only when set)
/// category:                 (only when non-empty)
///   - <category>
/// draft: false
/// ---
/// ```
pub fn render_body(item: &Item) -> Result<String> {
    let published_at = item
        .published_at
        .as_ref()
        .ok_or(AppError::MissingField("date"))?;
    let link = item.link.as_deref().ok_or(AppError::MissingField("link"))?;

    let mut body = String::from("---\n");
    body.push_str(&format!("title: \"{}\"\n", item.title));
    body.push_str(&format!(
        "date: {}\n",
        published_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    body.push_str(&format!("link: {link}\n"));
    body.push_str(&format!("site: {}\n", item.site_tag));

    if let Some(language) = item.language.as_deref().filter(|l| !l.is_empty()) {
        body.push_str(&format!("language: {language}\n"));
    }

    if !item.categories.is_empty() {
        body.push_str("category:\n");
        for category in &item.categories {
            body.push_str(&format!("  - {category}\n"));
        }
    }

    body.push_str("draft: false\n---\n");
    Ok(body)
}
