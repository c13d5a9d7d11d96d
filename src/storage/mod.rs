//! Storage abstractions for record publishing.
//!
//! A record store holds at most one record per identifier and never updates
//! one in place:
//!
//! - [`GitHubStore`]: files in a Git repository, created through the HTTP
//!   contents API (production)
//! - [`LocalStorage`]: files in a local directory (dry runs and tests)
//!
//! ## Layout
//!
//! ```text
//! {content_root}/
//! ├── some-title-2019-04-23T12:16:15+07:00.md
//! └── other-title-2019-04-24T08:00:00Z.md
//! ```

pub mod github;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Record;

// Re-export for convenience
pub use github::GitHubStore;
pub use local::LocalStorage;

/// Trait for record storage backends.
///
/// The existence check is the only deduplication mechanism: the pipeline
/// publishes an item exactly when `exists` reports `false`. Backends must also
/// refuse to overwrite in `create`, which catches two runs racing past the
/// check with the same identifier.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether a record with this identifier is already stored.
    ///
    /// Best effort: any failure to find out counts as "does not exist".
    async fn exists(&self, identifier: &str) -> bool;

    /// Store a new record, tagged with a commit message.
    ///
    /// Returns [`AppError::AlreadyExists`](crate::error::AppError::AlreadyExists)
    /// instead of replacing an existing record.
    async fn create(&self, record: &Record, message: &str) -> Result<()>;

    /// Human-readable location of a record, for logs.
    fn location(&self, identifier: &str) -> String;
}
