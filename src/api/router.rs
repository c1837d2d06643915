use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::safety;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .merge(safety::create_safety_router())
        .with_state(state)
        // the web UI is served from a different origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::domain::cache::MockCacheStore;
    use crate::domain::generation::MockGenerator;
    use crate::domain::retrieval::MockRetriever;
    use crate::domain::updates::{MockArticleFetcher, MockUpdateFeed};
    use crate::domain::UpdateItem;
    use crate::infrastructure::cache::{EvictionPolicy, L1Cache};
    use crate::infrastructure::report::PdfReportComposer;
    use crate::infrastructure::services::{CacheOrchestrator, RagPipeline, SafetyService};

    fn app_with(generator: MockGenerator, store: MockCacheStore) -> Router {
        let orchestrator = CacheOrchestrator::new(
            L1Cache::new(16, EvictionPolicy::Fifo).unwrap(),
            Arc::new(store),
            RagPipeline::new(
                Arc::new(MockRetriever::new().with_results("gas leak risk", &["doc A", "doc B"])),
                Arc::new(generator),
            ),
        );

        let feed = MockUpdateFeed::new(vec![
            UpdateItem::new("Circular 1", "https://dgms.example/1", "Mon, 06 Jan 2025"),
            UpdateItem::new("Circular 2", "https://dgms.example/2", "Tue, 07 Jan 2025"),
        ]);
        let articles = MockArticleFetcher::new().with_page("https://dgms.example/1", &["Methane alarm."]);

        let service = SafetyService::new(
            orchestrator,
            Arc::new(feed),
            Arc::new(articles),
            Arc::new(PdfReportComposer::new()),
        );

        create_router(AppState::new(service))
    }

    fn app() -> Router {
        app_with(
            MockGenerator::new("Risk: Low").with_rule("doc A", "Risk: High"),
            MockCacheStore::new(),
        )
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_banner() {
        let response = app().oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["message"].as_str().unwrap().contains("running"));
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app().oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_store() {
        let app = app_with(MockGenerator::new("x"), MockCacheStore::new().with_failing_reads());

        let response = app.oneshot(get("/ready")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_query() {
        let response = app()
            .oneshot(post_json("/query", r#"{"query":"gas leak risk"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["response"], "Risk: High");
    }

    #[tokio::test]
    async fn test_empty_query_is_bad_request() {
        let response = app()
            .oneshot(post_json("/query", r#"{"query":""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["code"], "validation");
    }

    #[tokio::test]
    async fn test_generation_failure_is_bad_gateway() {
        let app = app_with(MockGenerator::new("x").failing_on("gas"), MockCacheStore::new());

        let response = app
            .oneshot(post_json("/query", r#"{"query":"gas leak risk"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await["error"]["code"],
            "generation_unavailable"
        );
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let response = app().oneshot(post_json("/query", "{")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_updates() {
        let response = app().oneshot(get("/updates?limit=2")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let updates = body["updates"].as_array().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0]["title"], "Circular 1");
        assert_eq!(updates[0]["danger_analysis"], "Risk: Low");
        assert_eq!(updates[1]["link"], "https://dgms.example/2");
    }

    #[tokio::test]
    async fn test_audit_report_pdf() {
        let response = app()
            .oneshot(post_json(
                "/audit_report_pdf",
                r#"{"state":"Jharkhand","year":"2023"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Audit_Report_Jharkhand_2023.pdf\""
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn test_cache_stats_and_refresh() {
        let app = app();

        app.clone()
            .oneshot(post_json("/query", r#"{"query":"gas leak risk"}"#))
            .await
            .unwrap();
        app.clone()
            .oneshot(post_json("/query", r#"{"query":"gas leak risk"}"#))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_json("/cache/refresh", r#"{"query":"gas leak risk"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["response"], "Risk: High");

        let stats = json_body(app.oneshot(get("/cache/stats")).await.unwrap()).await;
        assert_eq!(stats["l1_hits"], 1);
        assert_eq!(stats["pipeline_runs"], 2);
        assert_eq!(stats["l1_size"], 1);
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:8501")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
