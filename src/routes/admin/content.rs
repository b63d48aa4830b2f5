// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin CRUD for audio buttons, videos, and works, plus YouTube sync.

use super::not_found;
use crate::error::{AppError, Result};
use crate::extractors::ValidatedJson;
use crate::models::{AudioButton, AudioButtonCategory, Price, Video, Work};
use crate::routes::check_tags;
use crate::routes::pagination::{ListResponse, Page, PageParams};
use crate::services::SyncReport;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

const MAX_SYNC_IDS: usize = 200;
const DEFAULT_CHANNEL_SYNC: u32 = 50;
const MAX_CHANNEL_SYNC: u32 = 500;

// ─── Audio Buttons ───────────────────────────────────────────

pub(super) async fn list_buttons(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<AudioButton>>> {
    let page = Page::try_from(&params)?;
    let items = state.db.list_buttons(page.fetch_limit(), page.offset()?).await?;
    Ok(Json(page.respond(items)))
}

pub(super) async fn get_button(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AudioButton>> {
    let button = state
        .db
        .get_button(&id)
        .await?
        .ok_or_else(|| not_found("audio button", &id))?;
    Ok(Json(button))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(super) struct ButtonUpdate {
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    title: Option<String>,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    description: Option<String>,
    #[validate(length(max = 10, message = "at most 10 tags are allowed"))]
    tags: Option<Vec<String>>,
    category: Option<AudioButtonCategory>,
    is_public: Option<bool>,
}

pub(super) async fn update_button(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<ButtonUpdate>,
) -> Result<Json<AudioButton>> {
    let tags = update.tags.as_deref().map(check_tags).transpose()?;
    let title = update.title.as_deref().map(non_blank_title).transpose()?;

    let mut button = state
        .db
        .get_button(&id)
        .await?
        .ok_or_else(|| not_found("audio button", &id))?;

    if let Some(title) = title {
        button.title = title;
    }
    if let Some(description) = update.description {
        let description = description.trim();
        button.description = (!description.is_empty()).then(|| description.to_string());
    }
    if let Some(tags) = tags {
        button.tags = tags;
    }
    if let Some(category) = update.category {
        button.category = category;
    }
    if let Some(is_public) = update.is_public {
        button.is_public = is_public;
    }
    button.updated_at = now_rfc3339();

    state.db.upsert_button(&button).await?;
    tracing::info!(
        button_id = %id,
        category = button.category.as_str(),
        is_public = button.is_public,
        "Audio button updated by admin"
    );

    Ok(Json(button))
}

pub(super) async fn delete_button(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.get_button(&id).await?.is_none() {
        return Err(not_found("audio button", &id));
    }
    if state.db.has_favorites_for_button(&id).await? {
        return Err(AppError::Conflict(format!(
            "audio button {} is still in users' favorites",
            id
        )));
    }

    state.db.delete_button(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Videos ──────────────────────────────────────────────────

pub(super) async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<Video>>> {
    let page = Page::try_from(&params)?;
    let items = state.db.list_videos(page.fetch_limit(), page.offset()?).await?;
    Ok(Json(page.respond(items)))
}

pub(super) async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Video>> {
    let video = state
        .db
        .get_video(&id)
        .await?
        .ok_or_else(|| not_found("video", &id))?;
    Ok(Json(video))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(super) struct VideoUpdate {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    title: Option<String>,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    description: Option<String>,
    #[validate(length(max = 20, message = "at most 20 playlist tags are allowed"))]
    playlist_tags: Option<Vec<String>>,
}

pub(super) async fn update_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<VideoUpdate>,
) -> Result<Json<Video>> {
    let playlist_tags = update.playlist_tags.as_deref().map(check_tags).transpose()?;
    let title = update.title.as_deref().map(non_blank_title).transpose()?;

    let mut video = state
        .db
        .get_video(&id)
        .await?
        .ok_or_else(|| not_found("video", &id))?;

    if let Some(title) = title {
        video.title = title;
    }
    if let Some(description) = update.description {
        video.description = description;
    }
    if let Some(playlist_tags) = playlist_tags {
        video.playlist_tags = playlist_tags;
    }
    video.updated_at = Some(now_rfc3339());

    state.db.upsert_video(&video).await?;
    tracing::info!(video_id = %id, "Video updated by admin");

    Ok(Json(video))
}

pub(super) async fn delete_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.get_video(&id).await?.is_none() {
        return Err(not_found("video", &id));
    }
    if state.db.has_buttons_for_video(&id).await? {
        return Err(AppError::Conflict(format!(
            "video {} still has audio buttons",
            id
        )));
    }

    state.db.delete_video(&id).await?;
    tracing::info!(video_id = %id, "Video deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}

/// Either an explicit ID list or a channel crawl.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(super) struct SyncRequest {
    #[validate(length(min = 1, max = 200, message = "videoIds must contain 1-200 ids"))]
    video_ids: Option<Vec<String>>,
    #[serde(default)]
    channel: bool,
    max_videos: Option<u32>,
}

/// What a sync request resolves to.
#[derive(Debug, PartialEq, Eq)]
enum SyncTarget {
    Videos(Vec<String>),
    Channel { max: u32 },
}

impl SyncRequest {
    fn target(self) -> Result<SyncTarget> {
        match (self.video_ids, self.channel) {
            (Some(_), true) => Err(AppError::BadRequest(
                "specify either videoIds or channel, not both".to_string(),
            )),
            (Some(ids), false) => {
                let mut seen = HashSet::new();
                let ids: Vec<String> = ids
                    .iter()
                    .map(|id| id.trim())
                    .filter(|id| !id.is_empty() && seen.insert(*id))
                    .map(str::to_string)
                    .collect();
                if ids.is_empty() || ids.len() > MAX_SYNC_IDS {
                    return Err(AppError::BadRequest(
                        "videoIds must contain 1-200 ids".to_string(),
                    ));
                }
                Ok(SyncTarget::Videos(ids))
            }
            (None, true) => Ok(SyncTarget::Channel {
                max: self
                    .max_videos
                    .unwrap_or(DEFAULT_CHANNEL_SYNC)
                    .clamp(1, MAX_CHANNEL_SYNC),
            }),
            (None, false) => Err(AppError::BadRequest(
                "videoIds or channel is required".to_string(),
            )),
        }
    }
}

pub(super) async fn sync_videos(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SyncRequest>,
) -> Result<Json<SyncReport>> {
    let report = match request.target()? {
        SyncTarget::Videos(ids) => state.youtube.sync_videos(&ids).await?,
        SyncTarget::Channel { max } => {
            let channel_id = state.config.youtube_channel_id.as_deref().ok_or_else(|| {
                AppError::BadRequest("YOUTUBE_CHANNEL_ID is not configured".to_string())
            })?;
            state.youtube.sync_channel(channel_id, max).await?
        }
    };

    tracing::info!(
        requested = report.requested,
        stored = report.stored,
        quota_used = report.quota_used,
        "Video sync finished"
    );

    Ok(Json(report))
}

// ─── Works ───────────────────────────────────────────────────

pub(super) async fn list_works(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<Work>>> {
    let page = Page::try_from(&params)?;
    let items = state.db.list_works(page.fetch_limit(), page.offset()?).await?;
    Ok(Json(page.respond(items)))
}

pub(super) async fn get_work(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Work>> {
    let work = state
        .db
        .get_work(&id)
        .await?
        .ok_or_else(|| not_found("work", &id))?;
    Ok(Json(work))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(super) struct WorkUpdate {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    title: Option<String>,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    description: Option<String>,
    price: Option<Price>,
    #[validate(length(max = 20, message = "at most 20 tags are allowed"))]
    tags: Option<Vec<String>>,
    on_sale: Option<bool>,
}

pub(super) async fn update_work(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<WorkUpdate>,
) -> Result<Json<Work>> {
    if update
        .price
        .as_ref()
        .and_then(|p| p.discount)
        .is_some_and(|d| d > 100)
    {
        return Err(AppError::BadRequest(
            "price.discount must be 0-100".to_string(),
        ));
    }
    let tags = update.tags.as_deref().map(check_tags).transpose()?;
    let title = update.title.as_deref().map(non_blank_title).transpose()?;

    let mut work = state
        .db
        .get_work(&id)
        .await?
        .ok_or_else(|| not_found("work", &id))?;

    if let Some(title) = title {
        work.title = title;
    }
    if let Some(description) = update.description {
        work.description = description;
    }
    if let Some(price) = update.price {
        work.price = Some(price);
    }
    if let Some(tags) = tags {
        work.tags = tags;
    }
    if let Some(on_sale) = update.on_sale {
        work.on_sale = on_sale;
    }
    work.updated_at = now_rfc3339();

    state.db.upsert_work(&work).await?;
    tracing::info!(work_id = %id, "Work updated by admin");

    Ok(Json(work))
}

pub(super) async fn delete_work(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.get_work(&id).await?.is_none() {
        return Err(not_found("work", &id));
    }
    state.db.delete_work(&id).await?;
    tracing::info!(work_id = %id, "Work deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}

fn non_blank_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title must not be blank".to_string()));
    }
    Ok(title.to_string())
}
