//! Local filesystem storage implementation.
//!
//! Writes each record to `{root}/{identifier}` with create-only semantics.
//! Used for dry runs from the CLI and for tests; production runs use
//! [`GitHubStore`](super::GitHubStore).

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Record;
use crate::storage::RecordStore;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for an identifier.
    fn path(&self, identifier: &str) -> PathBuf {
        self.root_dir.join(identifier)
    }

    /// Read a stored record body, returning None if it doesn't exist.
    pub async fn read(&self, identifier: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path(identifier)).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Identifiers of all stored records, sorted.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(AppError::Io(e)),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl RecordStore for LocalStorage {
    async fn exists(&self, identifier: &str) -> bool {
        tokio::fs::try_exists(self.path(identifier))
            .await
            .unwrap_or(false)
    }

    async fn create(&self, record: &Record, message: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let path = self.path(&record.identifier);
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(AppError::AlreadyExists(record.identifier.clone()));
            }
            Err(e) => return Err(AppError::Io(e)),
        };
        file.write_all(record.body.as_bytes()).await?;
        file.flush().await?;

        log::debug!("{} -> {}", message, path.display());
        Ok(())
    }

    fn location(&self, identifier: &str) -> String {
        self.path(identifier).display().to_string()
    }
}
