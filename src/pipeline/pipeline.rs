// src/pipeline/pipeline.rs

//! Pipeline orchestrator.
//!
//! Loads the site catalog, fans out one fetch per site, and pushes the
//! selected items of every returned feed through the publish path. Feeds are
//! handled one at a time as their fetches complete; items within a feed keep
//! feed order.

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use crate::config::AccessToken;
use crate::error::Result;
use crate::models::{Config, Feed, SiteCatalog};
use crate::services::{FeedSource, HttpFeedFetcher, fetch_site_catalog};
use crate::storage::{GitHubStore, LocalStorage, RecordStore};
use crate::utils::http::create_async_client;

use super::crawl::spawn_fetches;
use super::publish::{PublishOutcome, Publisher};
use super::select::{annotate, select_items};

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Sites in the catalog
    pub sites: usize,
    pub feeds_fetched: usize,
    pub fetch_failures: usize,
    pub items_selected: usize,
    pub published: usize,
    pub skipped: usize,
    /// Items that could not be annotated, rendered, or stored
    pub failed: usize,
}

impl RunReport {
    fn log_summary(&self) {
        log::info!(
            "Run complete: {} sites, {} feeds fetched, {} fetch failures",
            self.sites,
            self.feeds_fetched,
            self.fetch_failures
        );
        log::info!(
            "Items: {} selected, {} published, {} skipped, {} failed",
            self.items_selected,
            self.published,
            self.skipped,
            self.failed
        );
    }
}

/// Feed ingestion and publishing pipeline.
///
/// All collaborators are built once and shared by reference; nothing here
/// holds mutable state between runs.
pub struct Pipeline {
    config: Arc<Config>,
    client: Client,
    fetcher: Arc<dyn FeedSource>,
    publisher: Publisher,
}

impl Pipeline {
    /// Assemble a pipeline from explicit collaborators.
    pub fn new(
        config: Config,
        client: Client,
        fetcher: Arc<dyn FeedSource>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        let publisher = Publisher::new(store, config.publish.clone());
        Self {
            config: Arc::new(config),
            client,
            fetcher,
            publisher,
        }
    }

    /// Pipeline publishing to the remote Git repository.
    ///
    /// Fails with a missing-credential error before any network I/O when no
    /// token is given.
    pub fn remote(config: Config, token: Option<String>) -> Result<Self> {
        let token = AccessToken::from_value(token)?;
        let client = create_async_client(&config.crawler)?;
        let store = GitHubStore::new(client.clone(), config.store.clone(), token);
        let fetcher = HttpFeedFetcher::new(client.clone());
        Ok(Self::new(config, client, Arc::new(fetcher), Arc::new(store)))
    }

    /// Pipeline writing records into a local directory instead.
    pub fn local(config: Config, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = create_async_client(&config.crawler)?;
        let store = LocalStorage::new(output_dir);
        let fetcher = HttpFeedFetcher::new(client.clone());
        Ok(Self::new(config, client, Arc::new(fetcher), Arc::new(store)))
    }

    /// Run once: load the catalog, then process every site.
    ///
    /// Only catalog failures are returned as errors; feed and item failures
    /// are logged and counted in the report.
    pub async fn run(&self) -> Result<RunReport> {
        log::info!("Starting run, catalog {}", self.config.catalog.url);
        let sites = fetch_site_catalog(&self.client, &self.config.catalog.url).await?;
        log::info!("Loaded {} sites", sites.len());
        Ok(self.process_sites(sites).await)
    }

    /// Fetch all sites concurrently and publish what they return.
    pub async fn process_sites(&self, sites: SiteCatalog) -> RunReport {
        let mut report = RunReport {
            sites: sites.len(),
            ..RunReport::default()
        };

        let mut results = spawn_fetches(
            Arc::clone(&self.fetcher),
            sites,
            self.config.crawler.max_concurrent,
        );

        let mut received = 0;
        while let Some(fetch) = results.recv().await {
            received += 1;
            match fetch.result {
                Ok(feed) => {
                    report.feeds_fetched += 1;
                    self.publish_feed(feed, &mut report).await;
                }
                Err(e) => {
                    report.fetch_failures += 1;
                    log::warn!(
                        "Failed to fetch {} ({}): {}",
                        fetch.key,
                        fetch.site.feed_url,
                        e
                    );
                }
            }
        }

        // A panicked task never reports back
        if received < report.sites {
            let lost = report.sites - received;
            log::error!("{} fetch tasks ended without a result", lost);
            report.fetch_failures += lost;
        }

        report.log_summary();
        report
    }

    /// Publish the selected items of one feed, in feed order.
    async fn publish_feed(&self, feed: Feed, report: &mut RunReport) {
        log::info!("Site: {}", feed.title);

        let total = feed.items.len();
        let (context, items) = select_items(feed, self.config.crawler.max_articles_per_site);
        log::debug!("{} of {} items selected", items.len(), total);
        report.items_selected += items.len();

        for item in items {
            let title = item.title.clone();
            let outcome = match annotate(item, &context, &self.config.publish.utm_source) {
                Ok(item) => self.publisher.publish(&item).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(PublishOutcome::Published { identifier }) => {
                    report.published += 1;
                    log::info!("{}: published {}", title, identifier);
                }
                Ok(PublishOutcome::Skipped { identifier }) => {
                    report.skipped += 1;
                    log::info!("{}: skipped, {} exists", title, identifier);
                }
                Err(e) => {
                    report.failed += 1;
                    log::warn!("{}: {}", title, e);
                }
            }
        }
    }
}

/// Build the remote pipeline and run it once.
pub async fn run_pipeline(config: Config, token: Option<String>) -> Result<RunReport> {
    let pipeline = Pipeline::remote(config, token)?;
    pipeline.run().await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration};
    use tempfile::TempDir;

    use super::*;
    use crate::error::AppError;
    use crate::models::{Item, Site};

    /// In-memory feeds keyed by URL; unknown URLs fail like a dead host.
    #[derive(Default)]
    struct FakeSource {
        feeds: HashMap<String, Feed>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn with_feed(mut self, url: &str, feed: Feed) -> Self {
            self.feeds.insert(url.to_string(), feed);
            self
        }
    }

    #[async_trait]
    impl FeedSource for FakeSource {
        async fn fetch(&self, site: &Site) -> Result<Feed> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if site.feed_url.contains("panic") {
                panic!("fetch task crashed");
            }
            let mut feed = self
                .feeds
                .get(&site.feed_url)
                .cloned()
                .ok_or_else(|| AppError::feed(&site.feed_url, "connection refused"))?;
            if let Some(language) = site.language() {
                feed.language = Some(language.to_string());
            }
            Ok(feed)
        }
    }

    fn feed(host: &str, count: usize) -> Feed {
        let base = DateTime::parse_from_rfc3339("2019-04-23T12:16:15+07:00").unwrap();
        Feed {
            title: host.to_string(),
            link: Some(format!("https://{host}/")),
            language: None,
            items: (0..count)
                .map(|i| Item {
                    title: format!("{host} post {i}"),
                    link: Some(format!("https://{host}/posts/{i}?utm_campaign=feed")),
                    published_at: Some(base - Duration::hours(i as i64)),
                    categories: vec!["news".into()],
                    ..Item::default()
                })
                .collect(),
        }
    }

    fn catalog(urls: &[&str]) -> SiteCatalog {
        urls.iter()
            .enumerate()
            .map(|(i, url)| (format!("site{i}"), Site::new(*url)))
            .collect()
    }

    fn pipeline(source: Arc<FakeSource>, storage: LocalStorage) -> Pipeline {
        Pipeline::new(Config::default(), Client::new(), source, Arc::new(storage))
    }

    #[tokio::test]
    async fn test_fan_out_counts_failures() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(
            FakeSource::default()
                .with_feed("https://a.example/rss", feed("a.example", 5))
                .with_feed("https://b.example/rss", feed("b.example", 5))
                .with_feed("https://c.example/rss", feed("c.example", 5)),
        );
        let sites = catalog(&[
            "https://a.example/rss",
            "https://b.example/rss",
            "https://c.example/rss",
            "https://dead.example/rss",
            "https://gone.example/rss",
        ]);

        let report = pipeline(source.clone(), LocalStorage::new(tmp.path()))
            .process_sites(sites)
            .await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 5);
        assert_eq!(report.sites, 5);
        assert_eq!(report.feeds_fetched, 3);
        assert_eq!(report.fetch_failures, 2);
        assert_eq!(report.published, 6);
    }

    #[tokio::test]
    async fn test_panicking_fetch_is_counted() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(
            FakeSource::default().with_feed("https://a.example/rss", feed("a.example", 3)),
        );
        let sites = catalog(&["https://a.example/rss", "https://panic.example/rss"]);

        let report = pipeline(source, LocalStorage::new(tmp.path()))
            .process_sites(sites)
            .await;

        assert_eq!(report.feeds_fetched, 1);
        assert_eq!(report.fetch_failures, 1);
        assert_eq!(report.published, 2);
    }

    #[tokio::test]
    async fn test_selection_bound_per_feed() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(
            FakeSource::default()
                .with_feed("https://empty.example/rss", feed("empty.example", 0))
                .with_feed("https://one.example/rss", feed("one.example", 1))
                .with_feed("https://two.example/rss", feed("two.example", 2))
                .with_feed("https://many.example/rss", feed("many.example", 9)),
        );
        let sites = catalog(&[
            "https://empty.example/rss",
            "https://one.example/rss",
            "https://two.example/rss",
            "https://many.example/rss",
        ]);

        let storage = LocalStorage::new(tmp.path());
        let report = pipeline(source, storage.clone()).process_sites(sites).await;

        // 0 + 0 + 1 + 2
        assert_eq!(report.items_selected, 3);
        assert_eq!(report.published, 3);
        let stored = storage.list().await.unwrap();
        assert!(stored.iter().any(|id| id.starts_with("two-example-post-0-")));
        assert!(stored.iter().any(|id| id.starts_with("many-example-post-1-")));
        assert!(!stored.iter().any(|id| id.starts_with("two-example-post-1-")));
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let source = Arc::new(
            FakeSource::default().with_feed("https://a.example/rss", feed("a.example", 4)),
        );
        let pipeline = pipeline(source, storage.clone());

        let first = pipeline
            .process_sites(catalog(&["https://a.example/rss"]))
            .await;
        let second = pipeline
            .process_sites(catalog(&["https://a.example/rss"]))
            .await;

        assert_eq!(first.published, 2);
        assert_eq!(second.published, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(storage.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_item_failure_does_not_stop_siblings() {
        let tmp = TempDir::new().unwrap();
        let mut broken = feed("a.example", 4);
        broken.items[0].published_at = None;
        broken.items[1].link = None;
        let source =
            Arc::new(FakeSource::default().with_feed("https://a.example/rss", broken));

        let mut config = Config::default();
        config.crawler.max_articles_per_site = 3;
        let storage = LocalStorage::new(tmp.path());
        let pipeline = Pipeline::new(config, Client::new(), source, Arc::new(storage.clone()));

        let report = pipeline
            .process_sites(catalog(&["https://a.example/rss"]))
            .await;

        assert_eq!(report.items_selected, 3);
        assert_eq!(report.failed, 2);
        assert_eq!(report.published, 1);
        assert_eq!(storage.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_published_record_contents() {
        let tmp = TempDir::new().unwrap();
        let mut quoted = feed("muatocroi.com", 2);
        quoted.items[0].title = r#"Say "hi""#.into();
        let source =
            Arc::new(FakeSource::default().with_feed("https://muatocroi.com/rss", quoted));
        let mut sites = SiteCatalog::new();
        sites.insert(
            "muatocroi".into(),
            Site::new("https://muatocroi.com/rss").with_language("vietnamese"),
        );

        let storage = LocalStorage::new(tmp.path());
        pipeline(source, storage.clone()).process_sites(sites).await;

        let identifier = "say-hi-2019-04-23T12:16:15+07:00.md";
        let body = storage.read(identifier).await.unwrap().unwrap();
        assert_eq!(
            body,
            "---\n\
             title: \"Say 'hi'\"\n\
             date: 2019-04-23T12:16:15+07:00\n\
             link: https://muatocroi.com/posts/0?utm_source=news.12bit.vn&utm_medium=RSS\n\
             site: muatocroi.com\n\
             language: vietnamese\n\
             category:\n  - news\n\
             draft: false\n\
             ---\n"
        );
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_network() {
        let mut config = Config::default();
        // Nothing listens here; reaching it would produce a catalog error instead
        config.catalog.url = "http://127.0.0.1:9/sites.json".into();

        let err = run_pipeline(config, None).await.unwrap_err();
        assert!(matches!(err, AppError::MissingCredential(_)));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_unreachable_catalog_fails_run() {
        let mut config = Config::default();
        config.catalog.url = "http://127.0.0.1:9/sites.json".into();

        let err = run_pipeline(config, Some("token".into())).await.unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
        assert!(err.is_fatal());
    }
}
