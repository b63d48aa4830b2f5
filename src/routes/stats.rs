//! Public aggregate stats over recent audio buttons.

use crate::db::firestore::MAX_SCAN_DOCS;
use crate::error::Result;
use crate::models::{AudioButton, AudioButtonStats, TagStats};
use crate::search::parse_limit;
use crate::search::source::{collapse, run_source};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_TAG_LIMIT: u32 = 20;
const MAX_TAG_LIMIT: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stats/tags", get(get_tag_stats))
        .route("/api/stats/buttons", get(get_button_stats))
}

/// Recent public buttons; empty if storage is unavailable.
///
/// The scan reads up to 1000 documents, so it runs under its own timeout
/// rather than the per-source search bound.
async fn scan_buttons(state: &AppState) -> Vec<AudioButton> {
    collapse(
        "audioButtons",
        run_source(
            state.config.stats_scan_timeout,
            state.catalog.recent_public_buttons(MAX_SCAN_DOCS),
        )
        .await,
    )
}

#[derive(Deserialize)]
struct TagStatsParams {
    limit: Option<String>,
}

async fn get_tag_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TagStatsParams>,
) -> Result<Json<TagStats>> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_TAG_LIMIT, MAX_TAG_LIMIT)?;
    let buttons = scan_buttons(&state).await;
    Ok(Json(TagStats::from_buttons(&buttons, limit as usize)))
}

async fn get_button_stats(State(state): State<Arc<AppState>>) -> Json<AudioButtonStats> {
    let buttons = scan_buttons(&state).await;
    Json(AudioButtonStats::from_buttons(&buttons))
}
