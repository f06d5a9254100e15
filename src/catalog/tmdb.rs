//! HTTP client for the TMDB catalog API.

use super::{CatalogClient, SubjectDetails};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.themoviedb.org/3")
    /// * `api_key` - TMDB API key, sent as a query parameter
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn fetch_details(&self, path: &str) -> Result<SubjectDetails> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", path))?;

        if !response.status().is_success() {
            anyhow::bail!("Catalog request {} failed with status {}", path, response.status());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse details response for {}", path))
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn movie_details(&self, subject_id: u64) -> Result<SubjectDetails> {
        self.fetch_details(&format!("/movie/{}", subject_id)).await
    }

    async fn series_details(&self, subject_id: u64) -> Result<SubjectDetails> {
        self.fetch_details(&format!("/tv/{}", subject_id)).await
    }
}
