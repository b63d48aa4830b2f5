// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unified search across audio buttons, videos, and works.

use crate::error::AppError;
use crate::models::{AudioButton, Video, Work};
use crate::search::filters::ButtonFilters;
use crate::search::source::{collapse, run_source, SourceResult};
use crate::search::Catalog;
use serde::Serialize;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;
/// Per-category cap when searching every category at once.
pub const MIXED_CATEGORY_LIMIT: u32 = 6;

const BUTTON_SCAN_LIMIT: u32 = 500;
const VIDEO_SCAN_LIMIT: u32 = 200;
const WORK_SCAN_LIMIT: u32 = 200;

/// Content selector for `type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    #[default]
    All,
    Buttons,
    Videos,
    Works,
}

impl FromStr for SearchType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SearchType::All),
            "buttons" => Ok(SearchType::Buttons),
            "videos" => Ok(SearchType::Videos),
            "works" => Ok(SearchType::Works),
            other => Err(AppError::BadRequest(format!(
                "Invalid type '{}': expected all, buttons, videos, or works",
                other
            ))),
        }
    }
}

impl SearchType {
    /// Limit for `category`, or `None` if the category isn't searched.
    pub fn category_limit(self, category: SearchType, limit: u32) -> Option<u32> {
        if self == category {
            Some(limit)
        } else if self == SearchType::All {
            Some(limit.min(MIXED_CATEGORY_LIMIT))
        } else {
            None
        }
    }
}

/// A validated search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Trimmed and lowercased
    pub query: String,
    pub kind: SearchType,
    pub limit: u32,
    pub filters: ButtonFilters,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryCounts {
    pub buttons: usize,
    pub videos: usize,
    pub works: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryFlags {
    pub buttons: bool,
    pub videos: bool,
    pub works: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSearchResponse {
    pub audio_buttons: Vec<AudioButton>,
    pub videos: Vec<Video>,
    pub works: Vec<Work>,
    pub total_count: CategoryCounts,
    pub has_more: CategoryFlags,
}

/// Matched buttons with the pre-truncation count.
#[derive(Debug, Clone, Default)]
pub struct ButtonHits {
    pub items: Vec<AudioButton>,
    pub total: usize,
    pub has_more: bool,
}

/// Filter, order, and truncate buttons.
pub fn search_buttons(
    buttons: Vec<AudioButton>,
    query: &str,
    filters: &ButtonFilters,
    limit: u32,
) -> ButtonHits {
    let mut items: Vec<AudioButton> = buttons
        .into_iter()
        .filter(|b| b.is_public && b.matches_text(query) && filters.matches(b))
        .collect();
    let total = items.len();

    filters.sort(&mut items, query);
    items.truncate(limit as usize);

    ButtonHits {
        items,
        total,
        has_more: total > limit as usize,
    }
}

pub fn search_videos(videos: Vec<Video>, query: &str, limit: u32) -> Vec<Video> {
    videos
        .into_iter()
        .filter(|v| v.matches_text(query))
        .take(limit as usize)
        .collect()
}

pub fn search_works(works: Vec<Work>, query: &str, limit: u32) -> Vec<Work> {
    works
        .into_iter()
        .filter(|w| w.matches_text(query))
        .take(limit as usize)
        .collect()
}

/// Run a unified search. Never fails: unavailable categories come back empty.
pub async fn unified_search(
    catalog: &dyn Catalog,
    request: &SearchRequest,
    timeout: Duration,
) -> UnifiedSearchResponse {
    let query = request.query.as_str();
    let button_limit = request.kind.category_limit(SearchType::Buttons, request.limit);
    let video_limit = request.kind.category_limit(SearchType::Videos, request.limit);
    let work_limit = request.kind.category_limit(SearchType::Works, request.limit);

    let (buttons, videos, works) = tokio::join!(
        optional_source(button_limit, timeout, |limit| async move {
            let buttons = catalog.recent_public_buttons(BUTTON_SCAN_LIMIT).await?;
            Ok(search_buttons(buttons, query, &request.filters, limit))
        }),
        optional_source(video_limit, timeout, |limit| async move {
            let videos = catalog.recent_videos(VIDEO_SCAN_LIMIT).await?;
            Ok(search_videos(videos, query, limit))
        }),
        optional_source(work_limit, timeout, |limit| async move {
            let works = catalog.recent_works(WORK_SCAN_LIMIT).await?;
            Ok(search_works(works, query, limit))
        }),
    );

    let buttons = collapse("audioButtons", buttons);
    let videos = collapse("videos", videos);
    let works = collapse("works", works);

    let reached = |items: usize, limit: Option<u32>| limit.is_some_and(|l| items >= l as usize);

    let response = UnifiedSearchResponse {
        total_count: CategoryCounts {
            buttons: buttons.total,
            videos: videos.len(),
            works: works.len(),
        },
        has_more: CategoryFlags {
            buttons: buttons.has_more,
            videos: reached(videos.len(), video_limit),
            works: reached(works.len(), work_limit),
        },
        audio_buttons: buttons.items,
        videos,
        works,
    };

    tracing::debug!(
        query,
        kind = ?request.kind,
        buttons = response.total_count.buttons,
        videos = response.total_count.videos,
        works = response.total_count.works,
        "Unified search served"
    );

    response
}

/// Run `source` only when the category is selected.
async fn optional_source<T, F, Fut>(
    limit: Option<u32>,
    timeout: Duration,
    source: F,
) -> SourceResult<T>
where
    T: Default,
    F: FnOnce(u32) -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    match limit {
        Some(limit) => run_source(timeout, source(limit)).await,
        None => Ok(T::default()),
    }
}
