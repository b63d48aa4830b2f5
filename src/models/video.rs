// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! YouTube video metadata stored in Firestore (`videos`).

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stored video record. The document ID is the YouTube video ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub channel_id: String,
    #[serde(default)]
    pub channel_title: String,
    /// ISO 8601
    pub published_at: String,
    #[serde(default)]
    pub thumbnail_url: String,
    /// When metadata was last pulled from YouTube (ISO 8601)
    pub last_fetched_at: String,
    /// ISO 8601 duration from YouTube (e.g. "PT1H2M3S")
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
    /// Live broadcast state: none, live, upcoming
    #[serde(default)]
    pub live_broadcast_content: Option<String>,
    #[serde(default)]
    pub audio_button_count: u32,
    /// Admin-assigned playlist tags
    #[serde(default)]
    pub playlist_tags: Vec<String>,
    /// Last admin edit (ISO 8601)
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Public statistics snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub view_count: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub like_count: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub comment_count: Option<u64>,
}

impl Video {
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
    }
}
