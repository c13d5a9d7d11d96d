//! Git repository storage over the GitHub HTTP contents API.
//!
//! - Existence: `HEAD {raw_url}/{owner}/{repo}/{branch}/{content_root}/{identifier}`
//! - Create: `PUT {api_url}/repos/{owner}/{repo}/contents/{content_root}/{identifier}`
//!
//! The create request never carries a blob `sha`, so the API refuses to
//! replace an existing file. That refusal surfaces as
//! [`AppError::AlreadyExists`].

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode, header};
use serde::Serialize;
use url::Url;

use crate::config::AccessToken;
use crate::error::{AppError, Result};
use crate::models::{Record, StoreConfig};
use crate::storage::RecordStore;

/// Record store backed by files in a GitHub repository.
pub struct GitHubStore {
    client: Client,
    config: StoreConfig,
    token: AccessToken,
}

/// Body of a contents API create request.
#[derive(Debug, Serialize)]
struct CreateFileRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    committer: Committer<'a>,
}

#[derive(Debug, Serialize)]
struct Committer<'a> {
    name: &'a str,
    email: &'a str,
}

impl GitHubStore {
    /// Create a store using a shared HTTP client.
    pub fn new(client: Client, config: StoreConfig, token: AccessToken) -> Self {
        Self {
            client,
            config,
            token,
        }
    }

    /// URL serving the raw record contents.
    fn raw_url(&self, identifier: &str) -> Result<Url> {
        let prefix = [
            self.config.owner.as_str(),
            self.config.repo.as_str(),
            self.config.branch.as_str(),
        ];
        self.build_url(&self.config.raw_url, &prefix, identifier)
    }

    /// Contents API endpoint for the record.
    fn contents_url(&self, identifier: &str) -> Result<Url> {
        let prefix = [
            "repos",
            self.config.owner.as_str(),
            self.config.repo.as_str(),
            "contents",
        ];
        self.build_url(&self.config.api_url, &prefix, identifier)
    }

    fn build_url(&self, base: &str, prefix: &[&str], identifier: &str) -> Result<Url> {
        let mut url = Url::parse(base)?;
        url.path_segments_mut()
            .map_err(|_| AppError::config(format!("not a base URL: {base}")))?
            .pop_if_empty()
            .extend(prefix)
            .extend(
                self.config
                    .content_root
                    .split('/')
                    .filter(|segment| !segment.is_empty()),
            )
            .push(identifier);
        Ok(url)
    }
}

#[async_trait]
impl RecordStore for GitHubStore {
    async fn exists(&self, identifier: &str) -> bool {
        let url = match self.raw_url(identifier) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Cannot build existence URL for {}: {}", identifier, e);
                return false;
            }
        };

        match self.client.head(url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                log::debug!("Existence check for {} failed: {}", identifier, e);
                false
            }
        }
    }

    async fn create(&self, record: &Record, message: &str) -> Result<()> {
        let url = self.contents_url(&record.identifier)?;
        let request = CreateFileRequest {
            message,
            content: STANDARD.encode(record.body.as_bytes()),
            branch: &self.config.branch,
            committer: Committer {
                name: &self.config.committer_name,
                email: &self.config.committer_email,
            },
        };

        let response = self
            .client
            .put(url)
            .bearer_auth(self.token.secret())
            .header(header::ACCEPT, "application/vnd.github+json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        // Contents API answers 422 when the path exists and no sha was sent
        if status == StatusCode::UNPROCESSABLE_ENTITY && body.contains("sha") {
            return Err(AppError::AlreadyExists(record.identifier.clone()));
        }
        Err(AppError::store(status.as_u16(), body))
    }

    fn location(&self, identifier: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.repo,
            self.config.content_root.trim_matches('/'),
            identifier
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_server::TestServer;

    fn store(config: StoreConfig) -> GitHubStore {
        GitHubStore::new(
            Client::new(),
            config,
            AccessToken::from_value(Some("token".into())).unwrap(),
        )
    }

    const ID: &str = "hello-world-2019-04-23T12:16:15+07:00.md";

    #[test]
    fn test_raw_url() {
        let url = store(StoreConfig::default()).raw_url(ID).unwrap();
        assert_eq!(
            url.as_str(),
            "https://raw.githubusercontent.com/12bitvn/news.12bit.vn/master/content/links/hello-world-2019-04-23T12:16:15+07:00.md"
        );
    }

    #[test]
    fn test_contents_url() {
        let url = store(StoreConfig::default()).contents_url(ID).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/12bitvn/news.12bit.vn/contents/content/links/hello-world-2019-04-23T12:16:15+07:00.md"
        );
    }

    #[test]
    fn test_urls_tolerate_slashes() {
        let config = StoreConfig {
            api_url: "https://github.example.com/api/v3/".into(),
            content_root: "/content//links/".into(),
            ..StoreConfig::default()
        };
        let url = store(config).contents_url("a.md").unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.example.com/api/v3/repos/12bitvn/news.12bit.vn/contents/content/links/a.md"
        );
    }

    #[test]
    fn test_create_request_body() {
        let request = CreateFileRequest {
            message: "crawler: Hello",
            content: STANDARD.encode(b"---\n"),
            branch: "master",
            committer: Committer {
                name: "crawler",
                email: "12bitsvn@gmail.com",
            },
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["message"], "crawler: Hello");
        assert_eq!(json["content"], "LS0tCg==");
        assert_eq!(json["branch"], "master");
        assert_eq!(json["committer"]["email"], "12bitsvn@gmail.com");
        assert!(json.get("sha").is_none());
    }

    fn store_at(url: &str) -> GitHubStore {
        store(StoreConfig {
            api_url: url.to_string(),
            raw_url: url.to_string(),
            ..StoreConfig::default()
        })
    }

    fn record() -> Record {
        Record {
            identifier: "a.md".into(),
            body: "---\n".into(),
            title: "A".into(),
        }
    }

    #[tokio::test]
    async fn test_exists_when_raw_file_found() {
        let server = TestServer::start(200, "").await;

        assert!(store_at(&server.url).exists("a.md").await);

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "HEAD");
        assert_eq!(
            requests[0].path,
            "/12bitvn/news.12bit.vn/master/content/links/a.md"
        );
    }

    #[tokio::test]
    async fn test_missing_raw_file_is_absent() {
        let server = TestServer::start(404, "404: Not Found").await;
        assert!(!store_at(&server.url).exists("a.md").await);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_absent() {
        assert!(!store_at("http://127.0.0.1:9").exists("a.md").await);
    }

    #[tokio::test]
    async fn test_create_puts_contents() {
        let server = TestServer::start(201, r#"{"content":{}}"#).await;

        store_at(&server.url)
            .create(&record(), "crawler: A")
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "PUT");
        assert_eq!(
            request.path,
            "/repos/12bitvn/news.12bit.vn/contents/content/links/a.md"
        );
        assert_eq!(request.header("authorization"), Some("Bearer token"));

        let json: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(json["message"], "crawler: A");
        assert_eq!(json["content"], "LS0tCg==");
        assert_eq!(json["branch"], "master");
        assert!(json.get("sha").is_none());
    }

    #[tokio::test]
    async fn test_create_conflict_is_already_exists() {
        let body = r#"{"message":"Invalid request.\n\n\"sha\" wasn't supplied."}"#;
        let server = TestServer::start(422, body).await;

        let err = store_at(&server.url)
            .create(&record(), "crawler: A")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(ref id) if id == "a.md"));
    }

    #[tokio::test]
    async fn test_create_other_rejection_is_store_error() {
        let server = TestServer::start(422, r#"{"message":"Validation Failed"}"#).await;
        let err = store_at(&server.url)
            .create(&record(), "crawler: A")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store { status: 422, .. }));

        let server = TestServer::start(500, "boom").await;
        let err = store_at(&server.url)
            .create(&record(), "crawler: A")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store { status: 500, ref message } if message == "boom"));
    }

    #[test]
    fn test_location() {
        assert_eq!(
            store(StoreConfig::default()).location("a.md"),
            "news.12bit.vn/content/links/a.md"
        );
    }
}
