//! HTTP route tests driven through the router with mock backends

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use examcode_classifiers::{ExamTypeClassifier, RuleSet};
use examcode_core::{ChatBackend, ChatMessage, Error, ExamCatalog, Result};
use examcode_pipeline::{CatalogSource, ExamPipeline};
use examcode_server::{create_router, AppState, ExamResponse};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedAnswer(&'static str);

#[async_trait]
impl ChatBackend for FixedAnswer {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct Unavailable;

#[async_trait]
impl ChatBackend for Unavailable {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        Err(Error::llm("deployment not found"))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

struct Panicking;

#[async_trait]
impl ChatBackend for Panicking {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        panic!("backend exploded");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

struct StaticCatalog;

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch(&self, _identifiers: Option<&[String]>) -> ExamCatalog {
        [("CT01", "Scanner du genou"), ("CT02", "Scanner du thorax")]
            .into_iter()
            .collect()
    }

    fn name(&self) -> &str {
        "static"
    }
}

fn app(backend: Arc<dyn ChatBackend>) -> Router {
    let classifier = ExamTypeClassifier::new(&RuleSet::default()).unwrap();
    let pipeline = ExamPipeline::new(classifier, Arc::new(StaticCatalog), backend);
    let handle = PrometheusBuilder::new().build_recorder().handle();
    create_router(AppState::new(pipeline, handle))
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/get_type_code_examen")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_resolves_exam_code() {
    let response = app(Arc::new(FixedAnswer("Scanner du genou")))
        .oneshot(post_json(json!({"text": "scanner du genou droit"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ExamResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(
        body,
        ExamResponse {
            type_examen: Some("SCANNER".to_string()),
            type_examen_id: Some("CT".to_string()),
            code_examen: Some("Scanner du genou".to_string()),
            code_examen_id: Some("CT01".to_string()),
        }
    );
}

#[tokio::test]
async fn test_unclassified_text_returns_nulls() {
    let response = app(Arc::new(FixedAnswer("Scanner du genou")))
        .oneshot(post_json(r#"{"text": "bonjour"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "type_examen": null,
            "type_examen_id": null,
            "code_examen": null,
            "code_examen_id": null
        })
    );
}

#[tokio::test]
async fn test_whitespace_text_returns_nulls() {
    let response = app(Arc::new(FixedAnswer("Scanner du genou")))
        .oneshot(post_json(r#"{"text": "   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["type_examen"].is_null());
    assert!(body["code_examen_id"].is_null());
}

#[tokio::test]
async fn test_missing_text_is_bad_request() {
    let response = app(Arc::new(FixedAnswer("Scanner du genou")))
        .oneshot(post_json(r#"{"query": "scanner"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "No query provided in request body"})
    );
}

#[tokio::test]
async fn test_empty_text_is_bad_request() {
    let response = app(Arc::new(FixedAnswer("Scanner du genou")))
        .oneshot(post_json(r#"{"text": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "No query provided in request body"
    );
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let response = app(Arc::new(FixedAnswer("Scanner du genou")))
        .oneshot(post_json("{text: scanner"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_llm_failure_still_returns_category() {
    let response = app(Arc::new(Unavailable))
        .oneshot(post_json(r#"{"text": "irm du genou"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["type_examen"], "IRM");
    assert_eq!(body["type_examen_id"], "MR");
    assert!(body["code_examen"].is_null());
    assert!(body["code_examen_id"].is_null());
}

#[tokio::test]
async fn test_panic_becomes_internal_error() {
    let response = app(Arc::new(Panicking))
        .oneshot(post_json(r#"{"text": "scanner du genou"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "backend exploded");
}

#[tokio::test]
async fn test_non_string_text_is_bad_request() {
    let response = app(Arc::new(FixedAnswer("Scanner du genou")))
        .oneshot(post_json(r#"{"text": 5}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("invalid type"), "{}", error);
}

#[tokio::test]
async fn test_oversized_body_is_rejected_as_json() {
    let text = "a".repeat(128 * 1024);
    let response = app(Arc::new(FixedAnswer("Scanner du genou")))
        .oneshot(post_json(json!({ "text": text }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Request body exceeds 65536 bytes"})
    );
}

#[tokio::test]
async fn test_oversized_body_with_content_length_is_rejected_as_json() {
    let body = json!({ "text": "b".repeat(128 * 1024) }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/api/get_type_code_examen")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let response = app(Arc::new(FixedAnswer("Scanner du genou")))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_health() {
    let response = app(Arc::new(FixedAnswer("None")))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let response = app(Arc::new(FixedAnswer("None")))
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = app(Arc::new(FixedAnswer("None")))
        .oneshot(Request::get("/api/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_on_exam_route_is_not_allowed() {
    let response = app(Arc::new(FixedAnswer("None")))
        .oneshot(
            Request::get("/api/get_type_code_examen")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
