use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use restx_core::validation::{Constraint, RuleSet, ValidationRule, ValidationSeverity};
use tower::ServiceExt;

use restx_api::config::ServerConfig;
use restx_api::router::build_app_router;
use restx_api::sink::TransactionSink;
use restx_api::state::AppState;

/// Largest collection the test app accepts without a batch violation.
pub const TEST_MAX_BATCH: usize = 5;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        rules_path: None,
        max_batch_size: TEST_MAX_BATCH,
        primary_key_field: "id".to_string(),
    }
}

/// Build the full application router over an in-memory transaction sink.
///
/// The returned router is cheap to clone; clones share the same sink, so a
/// transaction created through one clone can be read back through another.
pub fn build_test_app(rules: RuleSet) -> Router {
    let config = test_config();
    let state = AppState::new(config.clone(), rules, TransactionSink::memory());
    build_app_router(state, &config)
}

/// Rule helper for the `product` model.
pub fn product_rule(field: &str, constraint: Constraint, severity: ValidationSeverity) -> ValidationRule {
    ValidationRule {
        entity_type: "product".to_string(),
        field: field.to_string(),
        constraint,
        message: format!("{field} is invalid"),
        severity,
    }
}

/// Products must carry a name.
pub fn name_required() -> RuleSet {
    RuleSet::new(vec![product_rule(
        "name",
        Constraint::Required,
        ValidationSeverity::Error,
    )])
    .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
