// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Audio button model: a named clip of a YouTube video.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Audio button category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum AudioButtonCategory {
    Voice,
    Bgm,
    Se,
    Talk,
    Singing,
    Other,
}

impl AudioButtonCategory {
    pub const ALL: [AudioButtonCategory; 6] = [
        AudioButtonCategory::Voice,
        AudioButtonCategory::Bgm,
        AudioButtonCategory::Se,
        AudioButtonCategory::Talk,
        AudioButtonCategory::Singing,
        AudioButtonCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioButtonCategory::Voice => "voice",
            AudioButtonCategory::Bgm => "bgm",
            AudioButtonCategory::Se => "se",
            AudioButtonCategory::Talk => "talk",
            AudioButtonCategory::Singing => "singing",
            AudioButtonCategory::Other => "other",
        }
    }
}

/// Stored audio button record in Firestore (`audioButtons`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AudioButton {
    /// Document ID
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: AudioButtonCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    /// YouTube video the clip was cut from
    pub source_video_id: String,
    #[serde(default)]
    pub source_video_title: Option<String>,
    /// Clip start (seconds)
    pub start_time: f64,
    /// Clip end (seconds)
    pub end_time: f64,
    /// Discord ID of the creator
    pub uploaded_by: String,
    pub uploaded_by_name: String,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub play_count: u64,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub like_count: u64,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub favorite_count: u64,
    /// ISO 8601
    pub created_at: String,
    /// ISO 8601
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}

impl AudioButton {
    /// Clip length in seconds (never negative).
    pub fn duration_secs(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Case-insensitive substring match over the searchable text fields.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
            || self
                .source_video_title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(needle))
    }
}
