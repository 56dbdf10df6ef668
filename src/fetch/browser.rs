//! Headless-browser page fetcher.
//!
//! Drives Chrome/Chromium over CDP with chromiumoxide. Every request gets
//! its own session: launch, configure, navigate, serialize, close. There is
//! no pooling or reuse; the launch cost buys isolation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    Headers, SetExtraHttpHeadersParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use url::Url;

use super::readiness::{FooterProbe, ReadinessProbe};
use super::{FetchError, PageFetcher, DESKTOP_USER_AGENT};

/// Fixed viewport applied to every session.
const VIEWPORT_WIDTH: u32 = 1200;
const VIEWPORT_HEIGHT: u32 = 800;

const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Resolves once the DOM is constructed, without waiting for subresources.
/// The inner timeout only guarantees the promise settles; the caller's
/// navigation timeout is authoritative.
const DOM_READY_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState !== 'loading') {
            resolve(document.readyState);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(document.readyState));
            setTimeout(() => resolve('timeout'), 30000);
        }
    })
"#;

/// Browser session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Run in headless mode (default: true).
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit Chrome/Chromium executable path; discovered when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Navigation timeout in seconds.
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// How long the readiness probe waits for a footer, in seconds.
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,
}

fn default_headless() -> bool {
    true
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_ready_timeout() -> u64 {
    15
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            chrome_args: Vec::new(),
            navigation_timeout_secs: default_navigation_timeout(),
            ready_timeout_secs: default_ready_timeout(),
        }
    }
}

struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

/// Page fetcher backed by a headless Chromium session.
///
/// The session is launched lazily on the first `fetch` and torn down by
/// `close`. chromiumoxide kills the child process on drop, so a cancelled
/// request cannot leak a browser even if `close` never runs.
pub struct ChromiumFetcher {
    settings: BrowserSettings,
    probe: Box<dyn ReadinessProbe + Send + Sync>,
    session: Option<BrowserSession>,
}

impl ChromiumFetcher {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    /// Create a fetcher with the default footer readiness probe.
    pub fn new(settings: BrowserSettings) -> Self {
        let probe = FooterProbe::new(Duration::from_secs(settings.ready_timeout_secs));
        Self::with_probe(settings, Box::new(probe))
    }

    /// Create a fetcher with a custom readiness strategy.
    pub fn with_probe(
        settings: BrowserSettings,
        probe: Box<dyn ReadinessProbe + Send + Sync>,
    ) -> Self {
        Self {
            settings,
            probe,
            session: None,
        }
    }

    /// Find a Chrome executable: configured path, well-known locations, PATH.
    fn locate_chrome(&self) -> Result<PathBuf, FetchError> {
        if let Some(configured) = &self.settings.chrome_path {
            if configured.exists() {
                return Ok(configured.clone());
            }
            return Err(FetchError::ChromeNotFound);
        }

        for path in Self::CHROME_PATHS {
            if Path::new(path).exists() {
                debug!("Found Chrome at: {}", path);
                return Ok(PathBuf::from(path));
            }
        }

        for cmd in &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(output) = std::process::Command::new("which").arg(cmd).output() {
                if output.status.success() {
                    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !path.is_empty() {
                        debug!("Found Chrome in PATH: {}", path);
                        return Ok(PathBuf::from(path));
                    }
                }
            }
        }

        Err(FetchError::ChromeNotFound)
    }

    /// Launch the browser if not already running.
    async fn ensure_session(&mut self) -> Result<(), FetchError> {
        if self.session.is_some() {
            return Ok(());
        }

        let chrome_path = self.locate_chrome()?;

        info!("Launching browser (headless={})", self.settings.headless);

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);

        // with_head means NOT headless, confusingly
        if !self.settings.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--no-sandbox") // Often needed for headless in containers/restricted environments
            .arg("--disable-gpu"); // Recommended for headless

        for arg in &self.settings.chrome_args {
            builder = builder.arg(arg);
        }

        let config = builder.build().map_err(FetchError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Launch(e.to_string()))?;

        // Spawn handler task
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        self.session = Some(BrowserSession {
            browser,
            handler_task,
        });

        Ok(())
    }
}

#[async_trait]
impl PageFetcher for ChromiumFetcher {
    async fn fetch(&mut self, url: &Url) -> Result<String, FetchError> {
        self.ensure_session().await?;

        let session = self.session.as_ref().expect("session was just launched");
        let page = session.browser.new_page("about:blank").await?;

        // Identity and headers must be in place before any navigation
        page.execute(SetUserAgentOverrideParams::new(
            DESKTOP_USER_AGENT.to_string(),
        ))
        .await?;
        page.execute(SetDeviceMetricsOverrideParams::new(
            i64::from(VIEWPORT_WIDTH),
            i64::from(VIEWPORT_HEIGHT),
            1.0,
            false,
        ))
        .await?;
        page.execute(
            SetExtraHttpHeadersParams::new(Headers::new(serde_json::json!({
                "Accept-Language": ACCEPT_LANGUAGE,
                "Referer": url.as_str(),
            }))),
        )
        .await?;

        info!("Navigating to {}", url);
        let nav_params = NavigateParams::builder()
            .url(url.as_str())
            .build()
            .map_err(|reason| FetchError::Navigation {
                url: url.to_string(),
                reason,
            })?;

        let nav_timeout = Duration::from_secs(self.settings.navigation_timeout_secs);
        match tokio::time::timeout(nav_timeout, page.execute(nav_params)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                let _ = page.close().await;
                return Err(FetchError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                let _ = page.close().await;
                return Err(FetchError::NavigationTimeout(url.to_string()));
            }
        }

        // Wait for DOM construction only; subresources may still be loading
        match tokio::time::timeout(nav_timeout, page.evaluate(DOM_READY_SCRIPT.to_string())).await
        {
            Ok(Ok(result)) => {
                let state: String = result
                    .into_value()
                    .unwrap_or_else(|_| "unknown".to_string());
                if state == "timeout" {
                    let _ = page.close().await;
                    return Err(FetchError::NavigationTimeout(url.to_string()));
                }
                debug!("Page ready state: {}", state);
            }
            Ok(Err(e)) => {
                // Script execution failed - might be a non-HTML page
                debug!(
                    "Could not check ready state (possibly non-HTML page): {}",
                    e
                );
            }
            Err(_) => {
                let _ = page.close().await;
                return Err(FetchError::NavigationTimeout(url.to_string()));
            }
        }

        if !self.probe.ready(&page).await? {
            let _ = page.close().await;
            return Err(FetchError::NotReady);
        }

        let content = page.content().await?;

        // Close the page to prevent tab accumulation
        let _ = page.close().await;

        Ok(content)
    }

    async fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.browser.close().await {
                debug!("Browser close failed, relying on process kill: {}", e);
            }
            let _ = session.browser.wait().await;
            session.handler_task.abort();
        }
    }
}
