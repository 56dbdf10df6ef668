//! The extraction pipeline.
//!
//! Strictly sequential per request: validate → render → parse → resolve
//! logo → derive palette → assemble. Logo and palette failures degrade to
//! empty values; navigation and readiness failures abort the request. The
//! page fetcher is closed on the pipeline's single exit path no matter
//! which stage failed.

pub mod logo;
pub mod metadata;
pub mod palette;
pub mod url;

use thiserror::Error;
use tracing::warn;
use ::url::Url;

use crate::fetch::assets::AssetClient;
use crate::fetch::{FetchError, PageFetcher};
use crate::models::BusinessProfile;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid URL {0:?}")]
    InvalidUrl(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Run the full pipeline for one request.
///
/// Input validation happens before any resource is allocated; after that
/// the fetcher is closed exactly once regardless of outcome.
pub async fn extract_business<F, A>(
    fetcher: &mut F,
    assets: &A,
    raw_url: &str,
) -> Result<BusinessProfile, ExtractError>
where
    F: PageFetcher + Send,
    A: AssetClient + Sync,
{
    let Some(url) = url::validate(raw_url) else {
        return Err(ExtractError::InvalidUrl(raw_url.to_string()));
    };

    let outcome = run_stages(fetcher, assets, &url).await;
    fetcher.close().await;
    outcome
}

async fn run_stages<F, A>(
    fetcher: &mut F,
    assets: &A,
    url: &Url,
) -> Result<BusinessProfile, ExtractError>
where
    F: PageFetcher + Send,
    A: AssetClient + Sync,
{
    let html = fetcher.fetch(url).await?;
    let content = metadata::extract(&html);

    let logo = match logo::resolve(assets, url, content.logo_src.as_deref()).await {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!("Logo resolution failed: {}", e);
            None
        }
    };

    let colors = match palette::extract_colors(assets, logo.as_deref()).await {
        Ok(colors) => colors,
        Err(e) => {
            warn!("Palette extraction failed: {}", e);
            Vec::new()
        }
    };

    Ok(BusinessProfile {
        business_name: content.business_name,
        description: content.description,
        logo,
        colors,
        socials: content.socials,
    })
}
