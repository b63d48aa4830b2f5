// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Audio buttons for site visitors: browsing, creation, play counts,
//! likes, and favorites.

use crate::db::{ButtonOrder, ReactionKind, ReactionToggle};
use crate::error::{AppError, Result};
use crate::extractors::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::models::{AudioButton, AudioButtonCategory};
use crate::routes::check_tags;
use crate::routes::pagination::{ListResponse, Page};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Window the per-user creation limit counts over.
const CREATION_WINDOW_HOURS: i64 = 24;

/// Routes open to anonymous visitors.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/buttons", get(list_buttons))
        .route("/api/buttons/{id}", get(get_button))
        .route("/api/buttons/{id}/play", post(record_play))
}

/// Routes that need a signed-in user.
/// The auth middleware is applied in routes/mod.rs.
pub fn member_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/buttons", post(create_button))
        .route("/api/buttons/{id}/like", post(toggle_like))
        .route("/api/buttons/{id}/favorite", post(toggle_favorite))
}

// ─── Browsing ────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ButtonListParams {
    page: Option<String>,
    #[serde(rename = "per_page")]
    per_page: Option<String>,
    sort_by: Option<String>,
    video_id: Option<String>,
}

impl ButtonListParams {
    fn parse(&self) -> Result<(Page, ButtonOrder, Option<&str>)> {
        let page = Page::parse(self.page.as_deref(), self.per_page.as_deref())?;
        let order = match self.sort_by.as_deref().map(str::trim) {
            None | Some("") => ButtonOrder::default(),
            Some(raw) => raw.parse()?,
        };
        let video_id = self
            .video_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty());
        Ok((page, order, video_id))
    }
}

async fn list_buttons(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ButtonListParams>,
) -> Result<Json<ListResponse<AudioButton>>> {
    let (page, order, video_id) = params.parse()?;
    let items = state
        .db
        .list_public_buttons(video_id, order, page.fetch_limit(), page.offset()?)
        .await?;
    Ok(Json(page.respond(items)))
}

/// Private buttons read as missing to anyone browsing.
fn visible(button: Option<AudioButton>, id: &str) -> Result<AudioButton> {
    button
        .filter(|b| b.is_public)
        .ok_or_else(|| AppError::NotFound(format!("audio button {} not found", id)))
}

async fn get_button(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AudioButton>> {
    let button = state.db.get_button(&id).await?;
    Ok(Json(visible(button, &id)?))
}

// ─── Creation ────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateButtonRequest {
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    pub category: AudioButtonCategory,
    #[serde(default)]
    #[validate(length(max = 10, message = "at most 10 tags are allowed"))]
    pub tags: Vec<String>,
    #[validate(length(min = 1, message = "sourceVideoId is required"))]
    pub source_video_id: String,
    #[validate(range(min = 0.0, message = "startTime must not be negative"))]
    pub start_time: f64,
    #[validate(range(min = 0.0, message = "endTime must not be negative"))]
    pub end_time: f64,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

impl CreateButtonRequest {
    /// Checks the derive can't express, then build the stored button.
    fn into_button(
        self,
        id: String,
        user: &AuthUser,
        creator_name: &str,
        now: &str,
    ) -> Result<AudioButton> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::BadRequest("title must not be blank".to_string()));
        }
        if self.end_time <= self.start_time {
            return Err(AppError::BadRequest(
                "endTime must be after startTime".to_string(),
            ));
        }
        let tags = check_tags(&self.tags)?;
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(AudioButton {
            id,
            title: title.to_string(),
            description,
            category: self.category,
            tags,
            source_video_id: self.source_video_id.trim().to_string(),
            source_video_title: None,
            start_time: self.start_time,
            end_time: self.end_time,
            uploaded_by: user.discord_id.clone(),
            uploaded_by_name: creator_name.to_string(),
            is_public: self.is_public,
            play_count: 0,
            like_count: 0,
            favorite_count: 0,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        })
    }
}

/// Start of the rolling creation-limit window.
fn window_start(now: DateTime<Utc>) -> String {
    format_utc_rfc3339(now - Duration::hours(CREATION_WINDOW_HOURS))
}

#[derive(Serialize)]
struct ButtonCreated {
    id: String,
}

async fn create_button(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<CreateButtonRequest>,
) -> Result<(StatusCode, Json<ButtonCreated>)> {
    let now = Utc::now();
    let now_str = format_utc_rfc3339(now);
    let id = uuid::Uuid::new_v4().to_string();

    // Validate fully before touching storage
    let draft = request.into_button(id, &user, "", &now_str)?;

    let profile = state
        .db
        .get_user(&user.discord_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    if !profile.is_active {
        tracing::warn!(discord_id = %user.discord_id, "Inactive user tried to create a button");
        return Err(AppError::Forbidden);
    }
    let button = AudioButton {
        uploaded_by_name: profile.display_name,
        ..draft
    };

    let created = state
        .db
        .create_button(&button, &window_start(now), state.config.button_daily_limit)
        .await?;

    Ok((StatusCode::CREATED, Json(ButtonCreated { id: created.id })))
}

// ─── Interactions ────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayCountResponse {
    play_count: u64,
}

async fn record_play(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlayCountResponse>> {
    let play_count = state.db.increment_play_count(&id).await?;
    Ok(Json(PlayCountResponse { play_count }))
}

async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ReactionToggle>> {
    toggle(&state, ReactionKind::Like, &user, &id).await
}

async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ReactionToggle>> {
    toggle(&state, ReactionKind::Favorite, &user, &id).await
}

async fn toggle(
    state: &AppState,
    kind: ReactionKind,
    user: &AuthUser,
    button_id: &str,
) -> Result<Json<ReactionToggle>> {
    let outcome = state
        .db
        .toggle_reaction(kind, &user.discord_id, button_id)
        .await?;
    Ok(Json(outcome))
}
