// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public search routes.

use crate::error::{AppError, Result};
use crate::search::autocomplete::{self, validate_query, AutocompleteResponse};
use crate::search::unified::{self, SearchRequest, SearchType, UnifiedSearchResponse};
use crate::search::{parse_limit, ButtonFilterParams, ButtonFilters};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/autocomplete", get(get_autocomplete))
        .route("/api/search", get(get_search))
}

#[derive(Deserialize)]
struct AutocompleteParams {
    q: Option<String>,
    limit: Option<String>,
}

async fn get_autocomplete(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AutocompleteParams>,
) -> Result<Json<AutocompleteResponse>> {
    let query = validate_query(params.q.as_deref())?;
    let limit = parse_limit(
        params.limit.as_deref(),
        autocomplete::DEFAULT_LIMIT,
        autocomplete::MAX_LIMIT,
    )?;

    let response = autocomplete::autocomplete(
        state.catalog.as_ref(),
        &query,
        limit,
        state.config.search_source_timeout,
    )
    .await;

    Ok(Json(response))
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    limit: Option<String>,
    #[serde(flatten)]
    filters: ButtonFilterParams,
}

impl SearchParams {
    fn into_request(self) -> Result<SearchRequest> {
        let query = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::BadRequest("Query parameter 'q' is required".to_string()))?
            .to_lowercase();

        let kind: SearchType = self
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();

        let limit = parse_limit(self.limit.as_deref(), unified::DEFAULT_LIMIT, unified::MAX_LIMIT)?;
        let filters = ButtonFilters::from_params(&self.filters, chrono::Utc::now())?;

        Ok(SearchRequest {
            query,
            kind,
            limit,
            filters,
        })
    }
}

async fn get_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<UnifiedSearchResponse>> {
    let request = params.into_request()?;

    let response = unified::unified_search(
        state.catalog.as_ref(),
        &request,
        state.config.search_source_timeout,
    )
    .await;

    Ok(Json(response))
}
