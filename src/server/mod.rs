//! HTTP surface for the extraction pipeline.
//!
//! One operation: POST a URL, receive the extracted business profile or a
//! contract error body. Cross-request concurrency belongs to the runtime;
//! each request builds its own page fetcher.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::fetch::HttpAssetClient;

/// Shared state for the web server.
///
/// Only the asset client is shared between requests; browser sessions are
/// per-request by design.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub assets: HttpAssetClient,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let assets = HttpAssetClient::new(&settings.http);
        Self {
            settings: Arc::new(settings),
            assets,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> axum::Router {
        create_router(AppState::new(Settings::default()))
    }

    async fn post_extract(body: &str) -> (StatusCode, serde_json::Value) {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/extract")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_url_is_rejected() {
        let (status, body) = post_extract("{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing URL in request body");
    }

    #[tokio::test]
    async fn empty_url_is_rejected() {
        let (status, body) = post_extract(r#"{"url": "   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing URL in request body");
    }

    #[tokio::test]
    async fn unparseable_url_is_rejected() {
        // fails validation before any browser is launched
        let (status, body) = post_extract(r#"{"url": "???"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid URL");
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
