use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::{api_message, ApiError};
use crate::traits::CatalogService;
use crate::types::{CastMember, Episode, SearchResultItem, Show};

const BASE_URL: &str = "https://api.tvmaze.com";

/// TVmaze REST API client.
pub struct TvMazeClient {
    base_url: Url,
    http: Client,
}

impl TvMazeClient {
    pub fn new() -> Self {
        Self {
            base_url: Url::parse(BASE_URL).expect("built-in base URL is valid"),
            http: Client::new(),
        }
    }

    /// Build a client against a different base URL with a request timeout.
    /// Used by configuration and by tests pointed at a local server.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            http: Client::builder().timeout(timeout).build()?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(Into::into)
    }

    /// Check the HTTP response, normalizing failures into an `Api` error
    /// carrying the best available message.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "TVmaze API error");
            Err(ApiError::Api {
                status,
                message: api_message(status, &body),
            })
        }
    }
}

impl Default for TvMazeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogService for TvMazeClient {
    async fn index_page(&self, page: u32) -> Result<Vec<Show>, ApiError> {
        let resp = self
            .http
            .get(self.endpoint("/shows")?)
            .query(&[("page", page)])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn search_shows(&self, query: &str) -> Result<Vec<SearchResultItem>, ApiError> {
        let resp = self
            .http
            .get(self.endpoint("/search/shows")?)
            .query(&[("q", query)])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn show(&self, id: u64) -> Result<Show, ApiError> {
        let resp = self
            .http
            .get(self.endpoint(&format!("/shows/{id}"))?)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn episodes(&self, show_id: u64) -> Result<Vec<Episode>, ApiError> {
        let resp = self
            .http
            .get(self.endpoint(&format!("/shows/{show_id}/episodes"))?)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn cast(&self, show_id: u64) -> Result<Vec<CastMember>, ApiError> {
        let resp = self
            .http
            .get(self.endpoint(&format!("/shows/{show_id}/cast"))?)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }
}
