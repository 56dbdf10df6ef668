//! Binary asset client.
//!
//! Lightweight HTTP access for logo probing and image download, deliberately
//! separate from the browser session so asset checks never disturb page
//! navigation state. The trait seam lets tests count calls instead of
//! reaching the network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::DESKTOP_USER_AGENT;

/// Asset client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Override the default desktop user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout() -> u64 {
    20
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("request for {url} failed with status {status}")]
    Status { url: String, status: u16 },
}

/// A fetched binary asset.
#[derive(Debug, Clone)]
pub struct AssetBody {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// HEAD probes and binary downloads against asset URLs.
#[async_trait]
pub trait AssetClient {
    /// Check whether `url` answers a HEAD request with a success status.
    async fn probe_ok(&self, url: &str) -> Result<bool, AssetError>;

    /// Download the body at `url` together with its content type.
    async fn fetch_bytes(&self, url: &str) -> Result<AssetBody, AssetError>;
}

/// reqwest-backed asset client.
#[derive(Clone)]
pub struct HttpAssetClient {
    client: Client,
}

impl HttpAssetClient {
    pub fn new(settings: &HttpSettings) -> Self {
        let user_agent = settings
            .user_agent
            .as_deref()
            .unwrap_or(DESKTOP_USER_AGENT);
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

#[async_trait]
impl AssetClient for HttpAssetClient {
    async fn probe_ok(&self, url: &str) -> Result<bool, AssetError> {
        let response = self.client.head(url).send().await?;
        Ok(response.status().is_success())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<AssetBody, AssetError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = response.bytes().await?.to_vec();

        Ok(AssetBody { content_type, data })
    }
}
