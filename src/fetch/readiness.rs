//! Page readiness strategies.
//!
//! "Ready" is a heuristic: a rendered footer is a cheap proxy for "the page
//! has substantially finished laying itself out". The heuristic is a
//! strategy trait so alternative predicates can be swapped in without
//! touching the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use tracing::debug;

use super::FetchError;

/// Decides whether a navigated page has rendered enough to be worth parsing.
#[async_trait]
pub trait ReadinessProbe {
    /// Returns `Ok(false)` when the page should be treated as not ready.
    async fn ready(&self, page: &Page) -> Result<bool, FetchError>;
}

/// One-shot fallback when the selector wait times out: accept any element
/// carrying a footer id or a footer-ish class.
const FOOTER_ATTR_SCRIPT: &str = r#"
    !!document.querySelector('[id="footer"]') || !!document.querySelector('[class*="footer"]')
"#;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Default readiness strategy: wait for a `footer` element, then fall back
/// to a single id/class attribute scan.
///
/// Known false negative: footer-less sites fail readiness even when fully
/// rendered.
pub struct FooterProbe {
    wait: Duration,
}

impl FooterProbe {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }
}

impl Default for FooterProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(15))
    }
}

#[async_trait]
impl ReadinessProbe for FooterProbe {
    async fn ready(&self, page: &Page) -> Result<bool, FetchError> {
        let deadline = tokio::time::Instant::now() + self.wait;
        loop {
            if page.find_element("footer").await.is_ok() {
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        debug!("No footer element within {:?}, scanning attributes", self.wait);
        let found = page
            .evaluate(FOOTER_ATTR_SCRIPT.to_string())
            .await?
            .into_value::<bool>()
            .unwrap_or(false);
        Ok(found)
    }
}
