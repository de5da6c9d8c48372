use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::model::RecommendationRequest;

const QUERY_PATH: &str = "/v1/recommendations/query";

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("Upstream request failed: {0}")]
    Transport(reqwest::Error),
    #[error("Upstream returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Failed to read upstream body: {0}")]
    Body(reqwest::Error),
    #[error("Upstream body is not JSON: {0}")]
    InvalidJson(serde_json::Error),
}

impl UpstreamError {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Client(_) => "client",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Status(_) => "status",
            UpstreamError::Body(_) => "body",
            UpstreamError::InvalidJson(_) => "invalid_json",
        }
    }
}

/// The recommendation service, as seen from the BFF.
///
/// Implementations return the raw response body on success so it can be
/// relayed without re-encoding.
#[async_trait]
pub trait RecommendationBackend: Send + Sync {
    async fn query(&self, req: &RecommendationRequest) -> Result<Bytes, UpstreamError>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    url: String,
}

impl HttpBackend {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            client,
            url: query_url(&config.base_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn query_url(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), QUERY_PATH)
}

#[async_trait]
impl RecommendationBackend for HttpBackend {
    async fn query(&self, req: &RecommendationRequest) -> Result<Bytes, UpstreamError> {
        // Every call must hit the live service.
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        debug!(url = %self.url, mood = %req.mood, "Querying recommendation service");

        let resp = self
            .client
            .post(&self.url)
            .headers(headers)
            .json(req)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = resp.bytes().await.map_err(UpstreamError::Body)?;

        // Syntax check only, the bytes are relayed as received.
        serde_json::from_slice::<serde::de::IgnoredAny>(&body)
            .map_err(UpstreamError::InvalidJson)?;

        Ok(body)
    }
}
