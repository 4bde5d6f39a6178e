//! Podcast catalog API client
//!
//! One read-only endpoint: `GET {base}/id/{podcast_id}` returning the full
//! podcast with seasons and episodes inline.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::models::Podcast;

/// Public catalog host
pub const DEFAULT_CATALOG_URL: &str = "https://podcast-api.netlify.app";

/// Catalog API error types
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Podcast not found (404)")]
    NotFound,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Anything that can produce a podcast for an identifier
#[async_trait]
pub trait PodcastSource: Send + Sync {
    async fn fetch(&self, podcast_id: u64) -> Result<Podcast, CatalogError>;
}

/// Catalog API client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient {
    /// Create a client for the public catalog
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_CATALOG_URL)
    }

    /// Create a client with a custom base URL (for testing or mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for a podcast identifier
    pub fn podcast_url(&self, podcast_id: u64) -> String {
        format!("{}/id/{}", self.base_url, podcast_id)
    }

    /// Get a podcast by identifier. Single attempt, no retry.
    pub async fn podcast(&self, podcast_id: u64) -> Result<Podcast, CatalogError> {
        let url = self.podcast_url(podcast_id);
        debug!(%url, "fetching podcast");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| CatalogError::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound),
            status => Err(CatalogError::ServerError(status.as_u16())),
        }
    }
}

#[async_trait]
impl PodcastSource for CatalogClient {
    async fn fetch(&self, podcast_id: u64) -> Result<Podcast, CatalogError> {
        self.podcast(podcast_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_podcast_url() {
        let client = CatalogClient::new();
        assert_eq!(
            client.podcast_url(10716),
            "https://podcast-api.netlify.app/id/10716"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = CatalogClient::with_base_url("http://localhost:1234/");
        assert_eq!(client.base_url(), "http://localhost:1234");
        assert_eq!(client.podcast_url(7), "http://localhost:1234/id/7");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CatalogError::NotFound.to_string(), "Podcast not found (404)");
        assert_eq!(CatalogError::ServerError(502).to_string(), "Server error: 502");
    }
}
