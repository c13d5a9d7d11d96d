//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and fetching behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Remote site catalog location
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Link attribution and commit message settings
    #[serde(default)]
    pub publish: PublishConfig,

    /// Remote content store coordinates
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override values from environment variables.
    ///
    /// Used by the serverless entry point, where no config file is bundled.
    /// Numeric values that fail to parse are ignored.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("CATALOG_URL") {
            self.catalog.url = url;
        }
        if let Some(secs) = var("CRAWL_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.crawler.timeout_secs = secs;
        }
        if let Some(n) = var("MAX_CONCURRENT").and_then(|v| v.parse().ok()) {
            self.crawler.max_concurrent = n;
        }
        if let Some(n) = var("MAX_ARTICLES_PER_SITE").and_then(|v| v.parse().ok()) {
            self.crawler.max_articles_per_site = n;
        }
        if let Some(owner) = var("STORE_OWNER") {
            self.store.owner = owner;
        }
        if let Some(repo) = var("STORE_REPO") {
            self.store.repo = repo;
        }
        if let Some(branch) = var("STORE_BRANCH") {
            self.store.branch = branch;
        }
        if let Some(root) = var("CONTENT_ROOT") {
            self.store.content_root = root;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::config("crawler.max_concurrent must be > 0"));
        }
        if url::Url::parse(&self.catalog.url).is_err() {
            return Err(AppError::config(format!(
                "catalog.url is not a valid URL: {}",
                self.catalog.url
            )));
        }
        if self.publish.utm_source.trim().is_empty() {
            return Err(AppError::config("publish.utm_source is empty"));
        }
        for (name, value) in [
            ("store.owner", &self.store.owner),
            ("store.repo", &self.store.repo),
            ("store.branch", &self.store.branch),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::config(format!("{name} is empty")));
            }
        }
        Ok(())
    }
}

/// HTTP client and fetching behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum feeds fetched at the same time
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Upper bound on items taken from the front of each feed
    #[serde(default = "defaults::max_articles_per_site")]
    pub max_articles_per_site: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            max_articles_per_site: defaults::max_articles_per_site(),
        }
    }
}

/// Where the site catalog lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "defaults::catalog_url")]
    pub url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: defaults::catalog_url(),
        }
    }
}

/// Link attribution and commit message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Value written to the `utm_source` query parameter
    #[serde(default = "defaults::utm_source")]
    pub utm_source: String,

    /// Prefix of every commit message (`"<prefix>: <title>"`)
    #[serde(default = "defaults::commit_prefix")]
    pub commit_prefix: String,
}

impl PublishConfig {
    pub fn commit_message(&self, title: &str) -> String {
        format!("{}: {}", self.commit_prefix, title)
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            utm_source: defaults::utm_source(),
            commit_prefix: defaults::commit_prefix(),
        }
    }
}

/// Remote content store (Git repository behind an HTTP content API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the contents API
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Base URL serving raw file contents, used for existence checks
    #[serde(default = "defaults::raw_url")]
    pub raw_url: String,

    #[serde(default = "defaults::owner")]
    pub owner: String,

    #[serde(default = "defaults::repo")]
    pub repo: String,

    #[serde(default = "defaults::branch")]
    pub branch: String,

    /// Directory inside the repository that holds the records
    #[serde(default = "defaults::content_root")]
    pub content_root: String,

    #[serde(default = "defaults::committer_name")]
    pub committer_name: String,

    #[serde(default = "defaults::committer_email")]
    pub committer_email: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::api_url(),
            raw_url: defaults::raw_url(),
            owner: defaults::owner(),
            repo: defaults::repo(),
            branch: defaults::branch(),
            content_root: defaults::content_root(),
            committer_name: defaults::committer_name(),
            committer_email: defaults::committer_email(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        concat!("feedpress/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn max_concurrent() -> usize {
        16
    }
    pub fn max_articles_per_site() -> usize {
        2
    }

    pub fn catalog_url() -> String {
        "https://raw.githubusercontent.com/12bitvn/news.12bit.vn/master/data/sites.json".into()
    }

    // Publish defaults
    pub fn utm_source() -> String {
        "news.12bit.vn".into()
    }
    pub fn commit_prefix() -> String {
        "crawler".into()
    }

    // Store defaults
    pub fn api_url() -> String {
        "https://api.github.com".into()
    }
    pub fn raw_url() -> String {
        "https://raw.githubusercontent.com".into()
    }
    pub fn owner() -> String {
        "12bitvn".into()
    }
    pub fn repo() -> String {
        "news.12bit.vn".into()
    }
    pub fn branch() -> String {
        "master".into()
    }
    pub fn content_root() -> String {
        "content/links".into()
    }
    pub fn committer_name() -> String {
        "crawler".into()
    }
    pub fn committer_email() -> String {
        "12bitsvn@gmail.com".into()
    }
}
