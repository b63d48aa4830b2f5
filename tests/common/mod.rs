// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use std::sync::Arc;
use suzumina_api::config::Config;
use suzumina_api::db::FirestoreDb;
use suzumina_api::models::{AudioButton, AudioButtonCategory, User, UserRole, Video, Work};
use suzumina_api::routes::create_router;
use suzumina_api::search::MemoryCatalog;
use suzumina_api::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with an offline database and an empty catalog.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_catalog(MemoryCatalog::new())
}

/// Create a test app whose search and stats read from `catalog`.
#[allow(dead_code)]
pub fn create_test_app_with_catalog(catalog: MemoryCatalog) -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), catalog)
}

/// Create a test app with a custom config.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config, catalog: MemoryCatalog) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, test_db_offline(), Arc::new(catalog)));
    (create_router(state.clone()), state)
}

/// Sign a session token the way the sign-in flow does: HS256 with the
/// Discord ID as `sub`, the site role, and a 30-day expiry.
#[allow(dead_code)]
pub fn create_jwt(discord_id: &str, role: UserRole, signing_key: &[u8]) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp();
    let claims = serde_json::json!({
        "sub": discord_id,
        "role": role.as_str(),
        "iat": now,
        "exp": now + 30 * 24 * 60 * 60,
    });

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .expect("Failed to create test JWT")
}

/// Mint a session token signed with the test key.
#[allow(dead_code)]
pub fn token_for(discord_id: &str, role: UserRole) -> String {
    create_jwt(discord_id, role, &Config::test_default().jwt_signing_key)
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn get_as(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ─── Fixtures ────────────────────────────────────────────────

#[allow(dead_code)]
pub fn button(id: &str, title: &str, tags: &[&str]) -> AudioButton {
    AudioButton {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        category: AudioButtonCategory::Voice,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        source_video_id: "vid-1".to_string(),
        source_video_title: None,
        start_time: 0.0,
        end_time: 4.0,
        uploaded_by: "1000".to_string(),
        uploaded_by_name: "tester".to_string(),
        is_public: true,
        play_count: 0,
        like_count: 0,
        favorite_count: 0,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

#[allow(dead_code)]
pub fn video(id: &str, title: &str) -> Video {
    Video {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        channel_id: "UC-test".to_string(),
        channel_title: "test channel".to_string(),
        published_at: "2026-01-01T00:00:00Z".to_string(),
        thumbnail_url: String::new(),
        last_fetched_at: "2026-01-02T00:00:00Z".to_string(),
        duration: None,
        statistics: None,
        live_broadcast_content: None,
        audio_button_count: 0,
        playlist_tags: Vec::new(),
        updated_at: None,
    }
}

#[allow(dead_code)]
pub fn work(id: &str, title: &str) -> Work {
    Work {
        id: id.to_string(),
        product_id: id.to_string(),
        title: title.to_string(),
        circle: "test circle".to_string(),
        author: None,
        description: String::new(),
        work_url: format!("https://www.dlsite.com/maniax/work/=/product_id/{}.html", id),
        thumbnail_url: String::new(),
        price: None,
        tags: Vec::new(),
        on_sale: true,
        sales_count: None,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

#[allow(dead_code)]
pub fn user(discord_id: &str, role: UserRole) -> User {
    User {
        discord_id: discord_id.to_string(),
        username: format!("user{}", discord_id),
        display_name: format!("User {}", discord_id),
        avatar: None,
        role,
        is_active: true,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-01T00:00:00Z".to_string(),
        last_login_at: "2026-01-01T00:00:00Z".to_string(),
    }
}
