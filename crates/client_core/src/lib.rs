use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client,
};
use shared::{
    domain::{Profile, RepositorySummary},
    error::LookupError,
    protocol::RepositoryListQuery,
};
use tracing::{debug, warn};
use url::Url;

pub mod controller;
pub mod heatmap;
pub mod render;

pub use controller::{ActionStatus, LookupController, LookupView};
pub use heatmap::{HeatmapSource, HeatmapView, HttpImageLoader, ImageLoader, ImageOutcome};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "monohub-lookup";

/// Remote source of profiles and repository listings.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, LookupError>;
    async fn fetch_repositories(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositorySummary>, LookupError>;
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

/// Builds the shared HTTP client; GitHub rejects requests without a `User-Agent`.
pub fn build_http_client(options: &ClientOptions) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&options.user_agent)
            .with_context(|| format!("invalid user agent '{}'", options.user_agent))?,
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );

    let mut builder = Client::builder().default_headers(headers);
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("failed to build HTTP client")
}

pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid base url '{raw}'"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("base url '{raw}' cannot carry a path");
    }
    Ok(url)
}

pub struct HttpGitHubClient {
    http: Client,
    api_base: Url,
}

impl HttpGitHubClient {
    pub fn new(api_base_url: &str, options: &ClientOptions) -> Result<Self> {
        let http = build_http_client(options)?;
        Ok(Self::with_http(http, parse_base_url(api_base_url)?))
    }

    pub fn with_http(http: Client, api_base: Url) -> Self {
        Self { http, api_base }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, LookupError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                LookupError::transport(format!(
                    "api base url cannot carry a path: {}",
                    self.api_base
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl GitHubApi for HttpGitHubClient {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, LookupError> {
        let url = self.endpoint(&["users", username])?;
        debug!(%url, "github: fetching profile");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(LookupError::transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                username,
                status = status.as_u16(),
                "github: profile lookup failed"
            );
            return Err(LookupError::NotFound {
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(LookupError::transport)
    }

    async fn fetch_repositories(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositorySummary>, LookupError> {
        let url = self.endpoint(&["users", username, "repos"])?;
        debug!(%url, page, per_page, "github: fetching repositories");

        let response = self
            .http
            .get(url)
            .query(&RepositoryListQuery::recently_updated(page, per_page))
            .send()
            .await
            .map_err(LookupError::transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                username,
                page,
                status = status.as_u16(),
                "github: repository listing failed"
            );
            return Err(LookupError::FetchFailed {
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(LookupError::transport)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
