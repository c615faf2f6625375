//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use storyloom_catalog::application::catalog_cache::ComponentCatalogCache;
use storyloom_core::clock::Clock;
use storyloom_core::generator::TaleGenerator;
use storyloom_store::{PgCatalogRepository, PgProfileRepository, PgTaleRepository};
use storyloom_tales::application::orchestrator::GenerationOrchestrator;
use storyloom_test_support::{FixedClock, ScriptedGenerator};
use tower::ServiceExt;

use storyloom_api::auth::USER_ID_HEADER;
use storyloom_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Application state over real `PostgreSQL` repositories and a scripted
/// generator that answers "Once upon a time".
pub fn build_test_state(pool: PgPool) -> AppState {
    build_test_state_with_generator(pool, Arc::new(ScriptedGenerator::text("Once upon a time")))
}

/// Application state over real `PostgreSQL` repositories and `generator`.
pub fn build_test_state_with_generator(
    pool: PgPool,
    generator: Arc<dyn TaleGenerator>,
) -> AppState {
    let clock = fixed_clock();
    let tale_repository = Arc::new(PgTaleRepository::new(pool.clone()));
    let profile_repository = Arc::new(PgProfileRepository::new(pool.clone()));
    let catalog_repository = Arc::new(PgCatalogRepository::new(pool));

    let catalog = ComponentCatalogCache::new(catalog_repository, Arc::clone(&clock));
    let orchestrator =
        GenerationOrchestrator::new(tale_repository.clone(), generator, Arc::clone(&clock));

    AppState::new(
        clock,
        tale_repository,
        profile_repository,
        catalog,
        orchestrator,
    )
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    storyloom_api::app(build_test_state(pool))
}

/// Send a request as `caller` (anonymous when `None`) and return the status
/// with the JSON body, `Value::Null` when the body is empty.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    caller: Option<&str>,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = caller {
        builder = builder.header(USER_ID_HEADER, user_id);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body as `caller`.
pub async fn post_json(
    app: Router,
    uri: &str,
    caller: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, Method::POST, uri, Some(caller), Some(body)).await
}

/// Send a GET request as `caller`.
pub async fn get_json(app: Router, uri: &str, caller: &str) -> (StatusCode, serde_json::Value) {
    send(app, Method::GET, uri, Some(caller), None).await
}

/// Create the caller's profile and one draft tale; returns the tale id.
pub async fn create_draft_tale(app: Router, caller: &str) -> String {
    let (status, _) = post_json(
        app.clone(),
        "/api/v1/profile",
        caller,
        &serde_json::json!({ "display_name": "Ada" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = post_json(
        app,
        "/api/v1/tales",
        caller,
        &serde_json::json!({
            "title": "The Quest",
            "components": { "hero": { "name": "Arthur", "type": "knight" } },
            "style": { "style": "adventure" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    json["id"].as_str().unwrap().to_owned()
}
