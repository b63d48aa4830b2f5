// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! suzumina-api: backend for a fan site sharing YouTube audio buttons
//!
//! This crate serves search and autocomplete over audio buttons, videos,
//! and DLsite works, tracks YouTube Data API quota, and exposes admin CRUD
//! over the Firestore collections.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use search::Catalog;
use services::{QuotaConfig, QuotaHandle, QuotaTracker, YouTubeClient, YouTubeService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    /// Read seam for search and stats
    pub catalog: Arc<dyn Catalog>,
    pub quota: QuotaHandle,
    pub youtube: YouTubeService,
}

impl AppState {
    /// Wire services from configuration.
    ///
    /// The quota tracker is created here and shared with the YouTube client.
    pub fn new(config: Config, db: FirestoreDb, catalog: Arc<dyn Catalog>) -> Self {
        let quota: QuotaHandle = Arc::new(QuotaTracker::new(QuotaConfig::from_app_config(&config)));
        let client = YouTubeClient::new(config.youtube_api_key.clone(), quota.clone());
        let youtube = YouTubeService::new(client, db.clone());

        Self {
            config,
            db,
            catalog,
            quota,
            youtube,
        }
    }
}
