//! Integration tests for health, status, avatars and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, body_text, get};
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_stopping(pool: PgPool) {
    let config = common::test_config();
    let state = common::test_state(pool, config.clone());
    state.lifecycle.on_term_signal();
    let app = notewell_api::router::build_app_router(state, &config);

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["status"], "stopping");
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS preflight on the JSON API
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_returns_correct_headers(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/notes/abc/metadata")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

// ---------------------------------------------------------------------------
// Test: GET /status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_reports_sessions_and_build(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    std::fs::write(
        dir.path().join(".git/HEAD"),
        "0123456789abcdef0123456789abcdef01234567\n",
    )
    .unwrap();

    let mut config = common::test_config();
    config.app_root = dir.path().to_path_buf();
    config.source_repository = Some("git@github.com:notewell/notewell.git".into());
    let state = common::test_state(pool, config.clone());
    let _rx = state
        .realtime
        .add("conn-1".into(), "plan".into(), None)
        .await;
    let app = notewell_api::router::build_app_router(state, &config);

    let response = get(app, "/status").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["online_notes"], 1);
    assert_eq!(json["online_sessions"], 1);
    assert_eq!(json["note_sessions"]["plan"], 1);
    assert_eq!(json["commit"], "0123456789abcdef0123456789abcdef01234567");
    assert_eq!(
        json["source_url"],
        "https://github.com/notewell/notewell/tree/0123456789abcdef0123456789abcdef01234567"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_without_git_checkout(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config();
    config.app_root = dir.path().to_path_buf();
    let app = common::build_test_app_with(pool, config);

    let json = body_json(get(app, "/status").await).await;
    assert_eq!(json["commit"], "");
    assert_eq!(json["online_sessions"], 0);
    assert_eq!(json["source_url"], serde_json::Value::Null);
}

// ---------------------------------------------------------------------------
// Test: letter avatars
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn avatar_is_svg(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app.clone(), "/user/alice/avatar.svg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/svg+xml");
    let svg = body_text(response).await;
    assert!(svg.contains(">A</tspan>"));

    let again = body_text(get(app, "/user/alice/avatar.svg").await).await;
    assert_eq!(svg, again);
}

// ---------------------------------------------------------------------------
// Test: realtime upgrades need a websocket handshake
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn realtime_rejects_plain_get(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/realtime?noteId=plan").await;

    assert!(response.status().is_client_error());
}
