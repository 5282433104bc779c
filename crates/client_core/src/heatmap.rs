//! Contribution heatmap: an image keyed by login whose load result only toggles visibility.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::debug;
use url::Url;

pub const DEFAULT_HEATMAP_BASE_URL: &str = "https://ghchart.rshah.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Loaded,
    Failed,
}

#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &Url) -> ImageOutcome;
}

pub struct HttpImageLoader {
    http: Client,
}

impl HttpImageLoader {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &Url) -> ImageOutcome {
        let response = match self.http.get(url.clone()).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(%url, error = %err, "heatmap: request failed");
                return ImageOutcome::Failed;
            }
        };

        if !response.status().is_success() {
            debug!(%url, status = response.status().as_u16(), "heatmap: image unavailable");
            return ImageOutcome::Failed;
        }

        let is_image = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(true, |content_type| content_type.starts_with("image/"));
        if !is_image {
            debug!(%url, "heatmap: response is not an image");
            return ImageOutcome::Failed;
        }

        match response.bytes().await {
            Ok(body) if !body.is_empty() => ImageOutcome::Loaded,
            _ => ImageOutcome::Failed,
        }
    }
}

#[derive(Clone)]
pub struct HeatmapSource {
    base_url: Url,
    loader: Arc<dyn ImageLoader>,
}

impl HeatmapSource {
    pub fn new(base_url: Url, loader: Arc<dyn ImageLoader>) -> Self {
        Self { base_url, loader }
    }

    pub fn url_for(&self, login: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(login);
        }
        url
    }

    pub fn loader(&self) -> &Arc<dyn ImageLoader> {
        &self.loader
    }
}

/// Visibility of the heatmap region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HeatmapView {
    #[default]
    Hidden,
    Pending(String),
    Visible(String),
}

impl HeatmapView {
    pub fn resolve(&mut self, outcome: ImageOutcome) {
        let Self::Pending(url) = self else {
            return;
        };
        let url = std::mem::take(url);
        *self = match outcome {
            ImageOutcome::Loaded => Self::Visible(url),
            ImageOutcome::Failed => Self::Hidden,
        };
    }

    pub fn visible_url(&self) -> Option<&str> {
        match self {
            Self::Visible(url) => Some(url),
            Self::Hidden | Self::Pending(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/heatmap_tests.rs"]
mod tests;
