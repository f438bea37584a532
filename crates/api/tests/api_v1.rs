//! Integration tests for the `/api/v1` note metadata and author endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, send_json};
use notewell_core::note_id::encode_note_id;
use notewell_db::models::note::{CreateNote, Note};
use notewell_db::models::user::{CreateUser, User};
use notewell_db::repositories::{AuthorRepo, NoteRepo, UserRepo};
use serde_json::json;
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, username: &str, email: Option<&str>) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            display_name: Some(username.to_uppercase()),
            email: email.map(str::to_string),
            photo: None,
        },
    )
    .await
    .unwrap()
}

async fn seed_note(pool: &PgPool, owner: Option<&User>) -> Note {
    NoteRepo::create(
        pool,
        &CreateNote {
            shortid: "shortid001".to_string(),
            alias: None,
            title: "Plan".to_string(),
            content: "---\ntags: [ops, q3]\n---\n# Plan\n\nShip it".to_string(),
            owner_id: owner.map(|u| u.id),
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Test: metadata aggregates note, owner and authors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn metadata_describes_note(pool: PgPool) {
    let alice = seed_user(&pool, "alice", Some("Alice@Example.com")).await;
    let bob = seed_user(&pool, "bob", None).await;
    let note = seed_note(&pool, Some(&alice)).await;
    AuthorRepo::record(&pool, note.id, alice.id, Some("#112233")).await.unwrap();
    AuthorRepo::record(&pool, note.id, bob.id, None).await.unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/notes/shortid001/metadata").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["id"], encode_note_id(note.id));
    assert_eq!(data["alias"], serde_json::Value::Null);
    assert_eq!(data["title"], "Plan");
    assert_eq!(data["description"], "Ship it");
    assert_eq!(data["tags"], json!(["ops", "q3"]));
    assert_eq!(data["viewCount"], 0);
    assert_eq!(data["editedBy"], json!(["alice", "bob"]));
    assert_eq!(data["updateUser"]["userName"], "alice");
    assert_eq!(data["updateUser"]["displayName"], "ALICE");
    assert!(data["updateUser"]["photo"]
        .as_str()
        .unwrap()
        .starts_with("https://cdn.libravatar.org/avatar/"));
    assert_eq!(data["permission"]["owner"], "alice");
    assert_eq!(data["permission"]["level"], "freely");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn metadata_of_anonymous_note_has_no_users(pool: PgPool) {
    seed_note(&pool, None).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/notes/shortid001/metadata").await).await;

    assert_eq!(json["data"]["updateUser"], serde_json::Value::Null);
    assert_eq!(json["data"]["permission"]["owner"], serde_json::Value::Null);
    assert_eq!(json["data"]["editedBy"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn metadata_passes_stored_profile_through(pool: PgPool) {
    let alice = UserRepo::create(
        &pool,
        &CreateUser {
            username: "alice".to_string(),
            display_name: None,
            email: Some("alice".to_string()),
            photo: Some("/uploads/alice.png".to_string()),
        },
    )
    .await
    .unwrap();
    let note = seed_note(&pool, Some(&alice)).await;
    assert_eq!(note.last_change_user_id, Some(alice.id));
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/notes/shortid001/metadata").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["updateUser"]["photo"], "/uploads/alice.png");
    assert_eq!(json["data"]["updateUser"]["email"], "alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn metadata_never_creates_notes(pool: PgPool) {
    let mut config = common::test_config();
    config.allow_free_url = true;
    let app = common::build_test_app_with(pool.clone(), config);

    let response = get(app, "/api/v1/notes/fresh-alias/metadata").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(NoteRepo::find_by_reference(&pool, "fresh-alias", None)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: recording authors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_author_is_idempotent(pool: PgPool) {
    seed_user(&pool, "alice", None).await;
    seed_note(&pool, None).await;
    let app = common::build_test_app(pool.clone());

    let body = json!({ "username": "alice", "color": "#aa0000" });
    let first = send_json(app.clone(), "POST", "/api/v1/notes/shortid001/authors", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first = body_json(first).await;
    assert_eq!(first["data"]["color"], "#aa0000");

    let again = json!({ "username": "alice", "color": "#00bb00" });
    let second = send_json(app.clone(), "POST", "/api/v1/notes/shortid001/authors", again).await;
    let second = body_json(second).await;
    assert_eq!(second["data"]["id"], first["data"]["id"]);
    assert_eq!(second["data"]["color"], "#aa0000");

    let listed = body_json(get(app, "/api/v1/notes/shortid001/authors").await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["username"], "alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_author_derives_color(pool: PgPool) {
    seed_user(&pool, "alice", None).await;
    seed_note(&pool, None).await;
    let app = common::build_test_app(pool);

    let response = send_json(
        app,
        "POST",
        "/api/v1/notes/shortid001/authors",
        json!({ "username": "alice" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["color"],
        notewell_core::avatar::avatar_color("alice")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_author_validates_input(pool: PgPool) {
    seed_note(&pool, None).await;
    let app = common::build_test_app(pool);

    let invalid = send_json(
        app.clone(),
        "POST",
        "/api/v1/notes/shortid001/authors",
        json!({ "username": "alice", "color": "red" }),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(invalid).await["code"], "VALIDATION_ERROR");

    let unknown_user = send_json(
        app,
        "POST",
        "/api/v1/notes/shortid001/authors",
        json!({ "username": "nobody" }),
    )
    .await;
    assert_eq!(unknown_user.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: changing an author's colour
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_author_color(pool: PgPool) {
    let alice = seed_user(&pool, "alice", None).await;
    let note = seed_note(&pool, None).await;
    AuthorRepo::record(&pool, note.id, alice.id, Some("#000000")).await.unwrap();
    let app = common::build_test_app(pool.clone());

    let response = send_json(
        app.clone(),
        "PATCH",
        "/api/v1/notes/shortid001/authors/alice",
        json!({ "color": "#ffffff" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["color"], "#ffffff");

    let stored = AuthorRepo::find(&pool, note.id, alice.id).await.unwrap().unwrap();
    assert_eq!(stored.color.as_deref(), Some("#ffffff"));

    let bad = send_json(
        app,
        "PATCH",
        "/api/v1/notes/shortid001/authors/alice",
        json!({ "color": "white" }),
    )
    .await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_color_of_non_author_returns_404(pool: PgPool) {
    seed_user(&pool, "alice", None).await;
    seed_note(&pool, None).await;
    let app = common::build_test_app(pool);

    let response = send_json(
        app,
        "PATCH",
        "/api/v1/notes/shortid001/authors/alice",
        json!({ "color": "#ffffff" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
