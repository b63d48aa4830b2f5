// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::services::quota::{OperationPlan, QuotaUsageStats};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

pub(super) async fn get_usage(State(state): State<Arc<AppState>>) -> Json<QuotaUsageStats> {
    Json(state.quota.usage_stats())
}

#[derive(Debug, Deserialize)]
pub(super) struct PlanParams {
    videos: Option<String>,
}

/// Plan a fetch of `videos` videos against the remaining quota.
pub(super) async fn get_plan(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlanParams>,
) -> Result<Json<OperationPlan>> {
    let desired = params
        .videos
        .as_deref()
        .map(str::trim)
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or_else(|| {
            AppError::BadRequest("videos must be a non-negative integer".to_string())
        })?;

    Ok(Json(state.quota.suggest_optimal_operations(desired)))
}

/// Plain-text daily report.
pub(super) async fn get_report(State(state): State<Arc<AppState>>) -> String {
    state.quota.daily_report()
}

/// Zero the counters, e.g. after the quota was raised in the console.
pub(super) async fn reset(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
) -> Json<QuotaUsageStats> {
    let before = state.quota.usage_stats().used;
    state.quota.reset();
    tracing::warn!(admin = %admin.discord_id, used_before = before, "Quota tracker reset");
    Json(state.quota.usage_stats())
}
