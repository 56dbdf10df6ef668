//! Logo resolution.
//!
//! Candidate order: the clearbit logo service for the page's hostname,
//! then the first logo-ish `<img>` found in the page. The service check is
//! a plain HTTP HEAD through the asset client, never a navigation of the
//! rendering session.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::fetch::assets::AssetClient;

/// Company logo service queried before falling back to in-page images.
const LOGO_SERVICE: &str = "https://logo.clearbit.com";

static IMAGE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(.+\.(png|jpg|jpeg|gif|svg))").expect("pattern is valid")
});

/// Failure while resolving an in-page candidate. Distinct from "no
/// candidate" (`Ok(None)`); the pipeline degrades both to a null logo.
#[derive(Debug, Error)]
pub enum LogoError {
    #[error("could not resolve logo src {src:?}: {reason}")]
    Resolve { src: String, reason: String },
}

/// Resolve the best logo URL for the page, if any.
pub async fn resolve<A>(
    assets: &A,
    page_url: &Url,
    in_page_src: Option<&str>,
) -> Result<Option<String>, LogoError>
where
    A: AssetClient + Sync,
{
    if let Some(host) = page_url.host_str() {
        let candidate = format!("{LOGO_SERVICE}/{host}");
        match assets.probe_ok(&candidate).await {
            Ok(true) => return Ok(Some(candidate)),
            Ok(false) => debug!("Logo service has no match for {}", host),
            Err(e) => debug!("Logo service probe failed: {}", e),
        }
    }

    let Some(src) = in_page_src else {
        return Ok(None);
    };

    let absolute = if src.starts_with("http") {
        src.to_string()
    } else {
        // The page URL may be deep; in-page srcs resolve against the origin
        let origin = page_url.origin().ascii_serialization();
        Url::parse(&origin)
            .and_then(|base| base.join(src))
            .map_err(|e| LogoError::Resolve {
                src: src.to_string(),
                reason: e.to_string(),
            })?
            .to_string()
    };

    Ok(Some(normalize(&absolute)))
}

/// Trim a logo URL to its image-file portion: the longest prefix ending in
/// a known image extension. URLs without a recognized extension pass
/// through unchanged, query strings and trailing noise are dropped.
pub fn normalize(url: &str) -> String {
    IMAGE_PREFIX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::assets::{AssetBody, AssetError};
    use async_trait::async_trait;

    struct StubAssets {
        probe_result: Result<bool, ()>,
    }

    #[async_trait]
    impl AssetClient for StubAssets {
        async fn probe_ok(&self, url: &str) -> Result<bool, AssetError> {
            match self.probe_result {
                Ok(hit) => Ok(hit),
                Err(()) => Err(AssetError::Status {
                    url: url.to_string(),
                    status: 503,
                }),
            }
        }

        async fn fetch_bytes(&self, url: &str) -> Result<AssetBody, AssetError> {
            Err(AssetError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn page_url() -> Url {
        Url::parse("https://acme.com/about").unwrap()
    }

    #[tokio::test]
    async fn service_hit_short_circuits() {
        let assets = StubAssets {
            probe_result: Ok(true),
        };
        let logo = resolve(&assets, &page_url(), Some("/assets/logo.png"))
            .await
            .unwrap();
        assert_eq!(logo.as_deref(), Some("https://logo.clearbit.com/acme.com"));
    }

    #[tokio::test]
    async fn in_page_src_resolves_against_origin() {
        let assets = StubAssets {
            probe_result: Ok(false),
        };
        let logo = resolve(&assets, &page_url(), Some("/assets/logo-final.PNG?v=2"))
            .await
            .unwrap();
        assert_eq!(
            logo.as_deref(),
            Some("https://acme.com/assets/logo-final.PNG")
        );
    }

    #[tokio::test]
    async fn probe_error_falls_back_to_in_page_src() {
        let assets = StubAssets {
            probe_result: Err(()),
        };
        let logo = resolve(&assets, &page_url(), Some("/logo.svg")).await.unwrap();
        assert_eq!(logo.as_deref(), Some("https://acme.com/logo.svg"));
    }

    #[tokio::test]
    async fn absolute_src_is_kept_and_normalized() {
        let assets = StubAssets {
            probe_result: Ok(false),
        };
        let logo = resolve(&assets, &page_url(), Some("https://cdn.acme.com/Logo.svg?x=1"))
            .await
            .unwrap();
        assert_eq!(logo.as_deref(), Some("https://cdn.acme.com/Logo.svg"));
    }

    #[tokio::test]
    async fn no_candidate_is_not_an_error() {
        let assets = StubAssets {
            probe_result: Ok(false),
        };
        let logo = resolve(&assets, &page_url(), None).await.unwrap();
        assert!(logo.is_none());
    }

    #[test]
    fn normalize_strips_query_after_extension() {
        assert_eq!(
            normalize("https://acme.com/assets/logo-final.PNG?v=2"),
            "https://acme.com/assets/logo-final.PNG"
        );
    }

    #[test]
    fn normalize_passes_through_unrecognized_urls() {
        assert_eq!(
            normalize("https://acme.com/logo-endpoint?fmt=webp"),
            "https://acme.com/logo-endpoint?fmt=webp"
        );
    }
}
