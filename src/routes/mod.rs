// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod admin;
pub mod buttons;
pub mod contact;
pub mod pagination;
pub mod search;
pub mod stats;

use crate::error::{AppError, Result};
use crate::middleware::auth::{require_admin, require_auth};
use crate::middleware::security::{add_security_headers, no_store};
use crate::AppState;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Each tag must be 1-20 characters after trimming.
pub(crate) fn check_tags(tags: &[String]) -> Result<Vec<String>> {
    tags.iter()
        .map(|tag| {
            let tag = tag.trim();
            match tag.chars().count() {
                1..=20 => Ok(tag.to_string()),
                _ => Err(AppError::BadRequest(format!(
                    "tag '{}' must be 1-20 characters",
                    tag
                ))),
            }
        })
        .collect()
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(search::routes())
        .merge(stats::routes())
        .merge(contact::routes())
        .merge(buttons::public_routes());

    let member_routes = buttons::member_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Layers run outside-in: auth, then the admin role check.
    let admin_routes = admin::routes()
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(middleware::from_fn(no_store));

    Router::new()
        .merge(public_routes)
        .merge(member_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(add_security_headers))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tags_trims_and_bounds_length() {
        let tags = vec![" 挨拶 ".to_string(), "朝".to_string()];
        assert_eq!(check_tags(&tags).unwrap(), vec!["挨拶", "朝"]);

        assert!(check_tags(&["  ".to_string()]).is_err());
        assert!(check_tags(&["あ".repeat(21)]).is_err());
        assert!(check_tags(&["あ".repeat(20)]).is_ok());
    }
}
