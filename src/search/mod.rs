// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Search ranking aggregator.
//!
//! Both entry points fan out one read per content category (audio buttons,
//! videos, works), filter the recent documents in memory, and merge the
//! results. A failing or slow category degrades to empty; the request as a
//! whole never fails because of one source.

pub mod autocomplete;
pub mod filters;
pub mod memory;
pub mod source;
pub mod unified;

use crate::error::AppError;
use crate::models::{AudioButton, Video, Work};
use async_trait::async_trait;

pub use autocomplete::{autocomplete, AutocompleteResponse, Suggestion, SuggestionType};
pub use filters::{ButtonFilterParams, ButtonFilters};
pub use memory::MemoryCatalog;
pub use source::SourceError;
pub use unified::{unified_search, SearchRequest, SearchType, UnifiedSearchResponse};

/// Read access to the recent documents search and stats scan over.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Most recent public audio buttons, newest first.
    async fn recent_public_buttons(&self, limit: u32) -> Result<Vec<AudioButton>, AppError>;

    /// Public audio buttons with the highest play counts.
    async fn most_played_buttons(&self, limit: u32) -> Result<Vec<AudioButton>, AppError>;

    /// Most recently published videos.
    async fn recent_videos(&self, limit: u32) -> Result<Vec<Video>, AppError>;

    /// Most recently added works.
    async fn recent_works(&self, limit: u32) -> Result<Vec<Work>, AppError>;
}

/// Parse an optional `limit` query parameter and clamp it into `1..=max`.
///
/// Non-numeric input is rejected rather than defaulted.
pub fn parse_limit(raw: Option<&str>, default: u32, max: u32) -> Result<u32, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };

    let value: i64 = raw
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid limit '{}': must be a number", raw)))?;

    Ok(value.clamp(1, i64::from(max)) as u32)
}
