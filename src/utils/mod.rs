//! Utility functions and helpers.

pub mod http;
#[cfg(test)]
pub(crate) mod test_server;
pub mod url;

pub use self::url::{normalize_title, resolve_link, site_tag, with_tracking};
