// src/error.rs

//! Unified error handling for the feed publisher.

use std::fmt;

use thiserror::Error;

/// Result type alias for publisher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// RSS/Atom document could not be parsed
    #[error("Feed parse error for {url}: {message}")]
    Feed { url: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Access token for the content store is not configured
    #[error("{0} is required")]
    MissingCredential(String),

    /// Site catalog could not be fetched or decoded
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Remote content store rejected or failed a request
    #[error("Store error ({status}): {message}")]
    Store { status: u16, message: String },

    /// A record for this identifier is already stored
    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    /// An item lacks a field the record template requires
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a catalog error.
    pub fn catalog(message: impl fmt::Display) -> Self {
        Self::Catalog(message.to_string())
    }

    /// Create a feed parse error with the feed URL as context.
    pub fn feed(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Feed {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a store error from a response status and body.
    pub fn store(status: u16, message: impl Into<String>) -> Self {
        Self::Store {
            status,
            message: message.into(),
        }
    }

    /// Whether this error aborts the whole run.
    ///
    /// Feed and item level failures are logged and skipped instead.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential(_) | Self::Config(_) | Self::Catalog(_)
        )
    }
}
