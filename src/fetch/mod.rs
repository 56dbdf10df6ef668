//! Page rendering and asset fetching.

pub mod assets;
pub mod browser;
pub mod readiness;

pub use assets::{AssetClient, HttpAssetClient};
pub use browser::ChromiumFetcher;
pub use readiness::{FooterProbe, ReadinessProbe};

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Realistic desktop user agent, shared by the browser session and the
/// asset client.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Errors that abort the whole extraction (the fatal tier).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no Chrome or Chromium executable found")]
    ChromeNotFound,

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {0} timed out")]
    NavigationTimeout(String),

    #[error("page never became ready (no footer detected)")]
    NotReady,

    #[error("browser protocol error: {0}")]
    Protocol(#[from] chromiumoxide::error::CdpError),
}

/// One rendered-page fetch per request.
///
/// Implementations own the underlying browser session exclusively for the
/// duration of the request. `close` releases it and must be safe to call
/// when nothing was ever launched.
#[async_trait]
pub trait PageFetcher {
    /// Load `url`, wait until the page is ready enough to parse, and return
    /// the serialized DOM.
    async fn fetch(&mut self, url: &Url) -> Result<String, FetchError>;

    /// Release the browser session. Idempotent.
    async fn close(&mut self);
}
