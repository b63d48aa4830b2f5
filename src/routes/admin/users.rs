// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin management of users and contact submissions.

use super::not_found;
use crate::db::firestore::MAX_SCAN_DOCS;
use crate::error::{AppError, Result};
use crate::extractors::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::models::{Contact, ContactPriority, ContactStats, ContactStatus, User, UserRole};
use crate::routes::pagination::{ListResponse, Page};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Parse an optional enum filter; blank means no filter.
fn parse_filter<T: std::str::FromStr<Err = String>>(raw: Option<&str>) -> Result<Option<T>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>().map_err(AppError::BadRequest))
        .transpose()
}

// ─── Users ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(super) struct UserListParams {
    page: Option<String>,
    per_page: Option<String>,
    role: Option<String>,
}

pub(super) async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserListParams>,
) -> Result<Json<ListResponse<User>>> {
    let page = Page::parse(params.page.as_deref(), params.per_page.as_deref())?;
    let role: Option<UserRole> = parse_filter(params.role.as_deref())?;

    let items = state
        .db
        .list_users(role, page.fetch_limit(), page.offset()?)
        .await?;
    Ok(Json(page.respond(items)))
}

pub(super) async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    let user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| not_found("user", &id))?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserUpdate {
    #[validate(length(min = 1, max = 50, message = "displayName must be 1-50 characters"))]
    display_name: Option<String>,
    role: Option<UserRole>,
    is_active: Option<bool>,
}

impl UserUpdate {
    /// Admins can't lock themselves out.
    fn check_self_edit(&self, admin: &AuthUser, target_id: &str) -> Result<()> {
        if admin.discord_id != target_id {
            return Ok(());
        }
        if self.is_active == Some(false) {
            return Err(AppError::BadRequest(
                "cannot deactivate your own account".to_string(),
            ));
        }
        if self.role.is_some_and(|role| role != admin.role) {
            return Err(AppError::BadRequest(
                "cannot change your own role".to_string(),
            ));
        }
        Ok(())
    }
}

pub(super) async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<UserUpdate>,
) -> Result<Json<User>> {
    update.check_self_edit(&admin, &id)?;

    let mut user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| not_found("user", &id))?;

    if let Some(display_name) = update.display_name {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::BadRequest(
                "displayName must not be blank".to_string(),
            ));
        }
        user.display_name = display_name.to_string();
    }
    if let Some(role) = update.role {
        user.role = role;
    }
    if let Some(is_active) = update.is_active {
        user.is_active = is_active;
    }
    user.updated_at = now_rfc3339();

    state.db.upsert_user(&user).await?;
    tracing::info!(
        admin = %admin.discord_id,
        user = %id,
        role = user.role.as_str(),
        is_active = user.is_active,
        "User updated by admin"
    );

    Ok(Json(user))
}

/// Users are never hard-deleted; DELETE clears `isActive`.
pub(super) async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if admin.discord_id == id {
        return Err(AppError::BadRequest(
            "cannot deactivate your own account".to_string(),
        ));
    }

    let mut user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| not_found("user", &id))?;

    user.is_active = false;
    user.updated_at = now_rfc3339();
    state.db.upsert_user(&user).await?;

    tracing::info!(admin = %admin.discord_id, user = %id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Contacts ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(super) struct ContactListParams {
    page: Option<String>,
    per_page: Option<String>,
    status: Option<String>,
}

pub(super) async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ContactListParams>,
) -> Result<Json<ListResponse<Contact>>> {
    let page = Page::parse(params.page.as_deref(), params.per_page.as_deref())?;
    let status: Option<ContactStatus> = parse_filter(params.status.as_deref())?;

    let items = state
        .db
        .list_contacts(status, page.fetch_limit(), page.offset()?)
        .await?;
    Ok(Json(page.respond(items)))
}

pub(super) async fn contact_stats(State(state): State<Arc<AppState>>) -> Result<Json<ContactStats>> {
    let contacts = state.db.list_contacts(None, MAX_SCAN_DOCS, 0).await?;
    Ok(Json(ContactStats::from_contacts(&contacts)))
}

pub(super) async fn get_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Contact>> {
    let contact = state
        .db
        .get_contact(&id)
        .await?
        .ok_or_else(|| not_found("contact", &id))?;
    Ok(Json(contact))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(super) struct ContactUpdate {
    status: Option<ContactStatus>,
    priority: Option<ContactPriority>,
    #[validate(length(max = 1000, message = "adminNote must be at most 1000 characters"))]
    admin_note: Option<String>,
}

pub(super) async fn update_contact(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<ContactUpdate>,
) -> Result<Json<Contact>> {
    let mut contact = state
        .db
        .get_contact(&id)
        .await?
        .ok_or_else(|| not_found("contact", &id))?;

    if let Some(status) = update.status {
        contact.status = status;
    }
    if let Some(priority) = update.priority {
        contact.priority = priority;
    }
    if let Some(note) = update.admin_note {
        let note = note.trim();
        contact.admin_note = (!note.is_empty()).then(|| note.to_string());
    }
    contact.handled_by = Some(admin.discord_id.clone());
    contact.updated_at = now_rfc3339();

    state.db.upsert_contact(&contact).await?;
    tracing::info!(
        admin = %admin.discord_id,
        contact_id = %id,
        status = contact.status.as_str(),
        "Contact updated"
    );

    Ok(Json(contact))
}

pub(super) async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.get_contact(&id).await?.is_none() {
        return Err(not_found("contact", &id));
    }
    state.db.delete_contact(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
