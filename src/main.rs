// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! suzumina-api server
//!
//! Serves search, stats, contact, and admin endpoints for the audio button
//! fan site, backed by Firestore and the YouTube Data API.

use std::sync::Arc;
use suzumina_api::{config::Config, db::FirestoreDb, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting suzumina API");

    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    if config.youtube_api_key.is_none() {
        tracing::warn!("YOUTUBE_API_KEY not set; video sync is disabled");
    }

    let catalog = Arc::new(db.clone());
    let state = Arc::new(AppState::new(config.clone(), db, catalog));

    let app = suzumina_api::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("suzumina_api=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
