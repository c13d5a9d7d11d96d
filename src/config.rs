// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading configuration from
//! files or the environment, and for reading the content store credential.

use std::fmt;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Environment variable holding the content store access token.
pub const ACCESS_TOKEN_VAR: &str = "GITHUB_ACCESS_TOKEN";

/// Access token for the remote content store.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Build a token from an optional raw value; blank counts as missing.
    pub fn from_value(value: Option<String>) -> Result<Self> {
        match value {
            Some(token) if !token.trim().is_empty() => Ok(Self(token.trim().to_string())),
            _ => Err(AppError::MissingCredential(ACCESS_TOKEN_VAR.to_string())),
        }
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Load configuration from a TOML file and validate it.
///
/// A missing or unreadable file falls back to defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_or_default(path);
    config.validate()?;
    Ok(config)
}

/// Load and validate a configuration file without falling back to defaults.
///
/// Read and parse failures are returned as errors.
pub fn load_config_strict(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Configuration for the serverless runtime: defaults plus environment
/// overrides.
pub fn load_lambda_config() -> Result<Config> {
    let mut config = Config::default();
    config.apply_env();
    config.validate()?;
    Ok(config)
}
