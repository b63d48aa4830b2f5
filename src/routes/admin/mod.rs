// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin API over the Firestore collections and the quota tracker.
//!
//! Auth and the admin role check are applied in routes/mod.rs.

mod content;
mod quota;
mod users;

use crate::error::AppError;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/buttons", get(content::list_buttons))
        .route(
            "/api/admin/buttons/{id}",
            get(content::get_button)
                .put(content::update_button)
                .delete(content::delete_button),
        )
        .route("/api/admin/videos", get(content::list_videos))
        .route("/api/admin/videos/sync", post(content::sync_videos))
        .route(
            "/api/admin/videos/{id}",
            get(content::get_video)
                .put(content::update_video)
                .delete(content::delete_video),
        )
        .route("/api/admin/works", get(content::list_works))
        .route(
            "/api/admin/works/{id}",
            get(content::get_work)
                .put(content::update_work)
                .delete(content::delete_work),
        )
        .route("/api/admin/users", get(users::list_users))
        .route(
            "/api/admin/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::deactivate_user),
        )
        .route("/api/admin/contacts", get(users::list_contacts))
        .route("/api/admin/contacts/stats", get(users::contact_stats))
        .route(
            "/api/admin/contacts/{id}",
            get(users::get_contact)
                .put(users::update_contact)
                .delete(users::delete_contact),
        )
        .route("/api/admin/quota", get(quota::get_usage))
        .route("/api/admin/quota/plan", get(quota::get_plan))
        .route("/api/admin/quota/report", get(quota::get_report))
        .route("/api/admin/quota/reset", post(quota::reset))
}

fn not_found(kind: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind, id))
}
