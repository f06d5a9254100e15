//! Auth backend boundary.

use super::models::{SignUpRequest, TokenPair, UserProfile};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote authentication operations the session manager depends on.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<TokenPair>;

    async fn sign_up(&self, request: &SignUpRequest) -> Result<TokenPair>;

    async fn sign_out(&self, access_token: &str) -> Result<()>;

    async fn fetch_user(&self, id: &str, access_token: &str) -> Result<UserProfile>;

    async fn delete_account(&self, access_token: &str) -> Result<()>;
}

/// Client for the Everrest auth API.
pub struct EverrestAuthGateway {
    client: reqwest::Client,
    base_url: String,
}

impl EverrestAuthGateway {
    /// Create a new auth gateway.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.everrest.educata.dev/auth")
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthGateway for EverrestAuthGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<TokenPair> {
        let response = self
            .client
            .post(self.url("/sign_in"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .context("Sign-in request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Sign-in rejected with status {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse sign-in response")
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<TokenPair> {
        let response = self
            .client
            .post(self.url("/sign_up"))
            .json(request)
            .send()
            .await
            .context("Sign-up request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Sign-up rejected with status {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse sign-up response")
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/sign_out"))
            .bearer_auth(access_token)
            .send()
            .await
            .context("Sign-out request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Sign-out rejected with status {}", response.status());
        }
        Ok(())
    }

    async fn fetch_user(&self, id: &str, access_token: &str) -> Result<UserProfile> {
        let response = self
            .client
            .get(self.url(&format!("/id/{}", id)))
            .bearer_auth(access_token)
            .send()
            .await
            .with_context(|| format!("Failed to fetch user {}", id))?;

        if !response.status().is_success() {
            anyhow::bail!("User lookup failed with status {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse user response")
    }

    async fn delete_account(&self, access_token: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url("/delete"))
            .bearer_auth(access_token)
            .send()
            .await
            .context("Account deletion request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Account deletion rejected with status {}", response.status());
        }
        Ok(())
    }
}
