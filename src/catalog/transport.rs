use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Read-only access to the public catalog's JSON endpoints.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value>;
}

/// HTTP transport using [`reqwest`]. No authentication, no retries.
pub struct HttpCatalogTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogTransport {
    /// * `base_url` - catalog root, e.g. `https://openlibrary.org`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build catalog HTTP client")?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CatalogTransport for HttpCatalogTransport {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("catalog request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("catalog returned an error for {url}"))?;

        response
            .json::<Value>()
            .await
            .with_context(|| format!("catalog response from {url} is not JSON"))
    }
}
