//! Web server module for argus.
//!
//! Thin serving layer over the exporter's two-operation contract: `/metrics`
//! runs one scrape cycle and renders the text exposition, `/healthz` answers
//! liveness probes. The server holds no scrape state of its own.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use crate::exporter::Exporter;
use crate::metrics::encode_text;

/// Content type of the text exposition format.
const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub exporter: Arc<Exporter>,
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    collectors: usize,
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let app_state = Arc::new(state);

    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .with_state(app_state)
}

/// Scrape endpoint: one full collect cycle per request.
///
/// Blocks for as long as the slowest collector. Per-collector failures are
/// part of the rendered payload; only an engine-fatal error produces a 500.
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.exporter.collect().await {
        Ok(samples) => {
            let body = encode_text(&state.exporter.describe(), &samples);
            ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Scrape cycle failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response()
        }
    }
}

/// Liveness probe.
async fn healthz_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        collectors: state.exporter.collector_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let exporter = Exporter::new(Vec::new()).expect("empty exporter is valid");
        AppState {
            exporter: Arc::new(exporter),
        }
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert_eq!(content_type, TEXT_FORMAT);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8_lossy(&bytes);
        assert!(body.contains("argus_scrapes_total 1"));
        assert!(body.contains("# TYPE argus_up gauge"));
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let health: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["collectors"], 0);
    }
}
