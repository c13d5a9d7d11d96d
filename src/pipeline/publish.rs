// src/pipeline/publish.rs

//! Publish path for a single item: name, check, render, create.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Item, PublishConfig};
use crate::record;
use crate::storage::RecordStore;

/// What happened to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new record was created
    Published { identifier: String },
    /// A record with the same identifier is already stored
    Skipped { identifier: String },
}

/// Publishes annotated items into a record store, at most once each.
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn RecordStore>,
    config: PublishConfig,
}

impl Publisher {
    pub fn new(store: Arc<dyn RecordStore>, config: PublishConfig) -> Self {
        Self { store, config }
    }

    /// Publish one item unless its record already exists.
    pub async fn publish(&self, item: &Item) -> Result<PublishOutcome> {
        let published_at = item
            .published_at
            .as_ref()
            .ok_or(AppError::MissingField("date"))?;
        let identifier = record::identifier(&item.title, published_at);

        if self.store.exists(&identifier).await {
            return Ok(PublishOutcome::Skipped { identifier });
        }

        let record = record::render(item)?;
        let message = self.config.commit_message(&record.title);

        match self.store.create(&record, &message).await {
            Ok(()) => {
                log::debug!("Created {}", self.store.location(&identifier));
                Ok(PublishOutcome::Published { identifier })
            }
            // Another run created it between the check and the write
            Err(AppError::AlreadyExists(_)) => {
                log::warn!("{} appeared after the existence check", identifier);
                Ok(PublishOutcome::Skipped { identifier })
            }
            Err(e) => Err(e),
        }
    }
}
