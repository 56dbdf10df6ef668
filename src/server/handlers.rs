//! Request handlers for the extraction API.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use super::AppState;
use crate::extract::{self, ExtractError};
use crate::fetch::ChromiumFetcher;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Extract business metadata from the submitted URL.
///
/// Every code path yields a well-formed status code and JSON body; pipeline
/// failure details stay in the logs.
pub async fn extract_profile(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Response {
    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing URL in request body" })),
        )
            .into_response();
    };

    let mut fetcher = ChromiumFetcher::new(state.settings.browser.clone());
    match extract::extract_business(&mut fetcher, &state.assets, &url).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(err: ExtractError) -> Response {
    match err {
        ExtractError::InvalidUrl(url) => {
            debug!("Rejected invalid URL {:?}", url);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid URL" })),
            )
                .into_response()
        }
        ExtractError::Fetch(e) => {
            error!("Extraction failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to extract business data" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;

    #[test]
    fn invalid_url_maps_to_bad_request() {
        let response = error_response(ExtractError::InvalidUrl("???".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn fetch_failures_map_to_internal_error() {
        let response = error_response(ExtractError::Fetch(FetchError::NotReady));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
