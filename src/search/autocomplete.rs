// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Autocomplete suggestions.
//!
//! Suggestions come from four kinds of candidate:
//! - tags on recent audio buttons, with curated popular tags pinned first
//! - titles of the most played audio buttons
//! - video titles
//! - work titles
//!
//! Each kind gets a fixed share of the requested limit. The merged list is
//! deduplicated by text, ranked, and truncated.

use crate::error::AppError;
use crate::models::{AudioButton, Video, Work};
use crate::search::source::{collapse, run_source};
use crate::search::Catalog;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Queries shorter than this (in characters) return nothing.
pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_QUERY_CHARS: usize = 100;
pub const DEFAULT_LIMIT: u32 = 8;
pub const MAX_LIMIT: u32 = 20;

const BUTTON_SCAN_LIMIT: u32 = 500;
const TITLE_SCAN_LIMIT: u32 = 200;
const VIDEO_SCAN_LIMIT: u32 = 100;
const WORK_SCAN_LIMIT: u32 = 100;

/// Count reported for pinned popular tags.
pub const PINNED_COUNT: u64 = 999;

const VIDEO_ICON: &str = "📹";

/// A curated tag that is always pinned when it matches.
pub struct PopularTag {
    pub name: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
}

pub const POPULAR_TAGS: &[PopularTag] = &[
    PopularTag { name: "挨拶", icon: "👋", category: "基本" },
    PopularTag { name: "応援", icon: "📣", category: "感情" },
    PopularTag { name: "感謝", icon: "🙏", category: "感情" },
    PopularTag { name: "日常", icon: "🌙", category: "生活" },
    PopularTag { name: "ゲーム", icon: "🎮", category: "趣味" },
    PopularTag { name: "歌", icon: "🎵", category: "音楽" },
    PopularTag { name: "雑談", icon: "💬", category: "会話" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Tag,
    Title,
    Video,
    Work,
}

impl SuggestionType {
    /// Higher ranks first.
    fn priority(self) -> u8 {
        match self {
            SuggestionType::Tag => 3,
            SuggestionType::Title => 2,
            SuggestionType::Video | SuggestionType::Work => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Pinned popular tag
    pub popular: bool,
}

impl Suggestion {
    fn new(id: String, text: &str, kind: SuggestionType) -> Self {
        Self {
            id,
            text: text.to_string(),
            kind,
            category: None,
            icon: None,
            count: None,
            popular: false,
        }
    }
}

/// Suggestions produced per kind, before merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SourceCounts {
    pub tags: usize,
    pub titles: usize,
    pub videos: usize,
    pub works: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutocompleteMeta {
    pub query: String,
    pub total: usize,
    pub sources: SourceCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<Suggestion>,
    pub meta: AutocompleteMeta,
}

/// Portion of the limit each suggestion kind may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shares {
    pub tags: usize,
    pub titles: usize,
    pub videos: usize,
    pub works: usize,
}

impl Shares {
    /// 60% tags, 30% titles, 10% each for videos and works, rounded up.
    pub fn for_limit(limit: usize) -> Self {
        Self {
            tags: (limit * 6).div_ceil(10),
            titles: (limit * 3).div_ceil(10),
            videos: limit.div_ceil(10),
            works: limit.div_ceil(10),
        }
    }
}

/// Validate the raw `q` parameter. Returns it trimmed.
pub fn validate_query(raw: Option<&str>) -> Result<String, AppError> {
    let query = raw.map(str::trim).unwrap_or_default();
    let chars = query.chars().count();
    if chars == 0 {
        return Err(AppError::BadRequest("Query parameter 'q' is required".to_string()));
    }
    if chars > MAX_QUERY_CHARS {
        return Err(AppError::BadRequest(format!(
            "Query must be at most {} characters",
            MAX_QUERY_CHARS
        )));
    }
    Ok(query.to_string())
}

/// Tag suggestions from popular tags and tag frequency. `needle` is lowercased.
pub fn tag_suggestions(buttons: &[AudioButton], needle: &str, share: usize) -> Vec<Suggestion> {
    let popular: Vec<Suggestion> = POPULAR_TAGS
        .iter()
        .filter(|tag| tag.name.to_lowercase().contains(needle))
        .map(|tag| Suggestion {
            category: Some(tag.category.to_string()),
            icon: Some(tag.icon.to_string()),
            count: Some(PINNED_COUNT),
            popular: true,
            ..Suggestion::new(format!("popular-tag-{}", tag.name), tag.name, SuggestionType::Tag)
        })
        .collect();

    let mut counts: HashMap<&str, u64> = HashMap::new();
    for tag in buttons.iter().flat_map(|b| &b.tags) {
        if tag.to_lowercase().contains(needle) {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    let mut dynamic: Vec<(&str, u64)> = counts.into_iter().collect();
    dynamic.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let dynamic = dynamic
        .into_iter()
        .take(share.saturating_sub(popular.len()))
        .map(|(tag, count)| Suggestion {
            count: Some(count),
            ..Suggestion::new(format!("dynamic-tag-{}", tag), tag, SuggestionType::Tag)
        });

    let mut seen = HashSet::new();
    popular
        .into_iter()
        .chain(dynamic)
        .filter(|s| seen.insert(s.text.clone()))
        .take(share)
        .collect()
}

/// Audio button titles, most played first.
pub fn title_suggestions(buttons: &[AudioButton], needle: &str, share: usize) -> Vec<Suggestion> {
    let mut matches: Vec<&AudioButton> = buttons
        .iter()
        .filter(|b| b.title.to_lowercase().contains(needle))
        .collect();
    matches.sort_by_key(|b| Reverse(b.play_count));

    matches
        .into_iter()
        .take(share)
        .map(|b| Suggestion {
            count: Some(b.play_count),
            ..Suggestion::new(format!("audio-title-{}", b.id), &b.title, SuggestionType::Title)
        })
        .collect()
}

pub fn video_suggestions(videos: &[Video], needle: &str, share: usize) -> Vec<Suggestion> {
    videos
        .iter()
        .filter(|v| v.matches_text(needle))
        .take(share)
        .map(|v| Suggestion {
            icon: Some(VIDEO_ICON.to_string()),
            ..Suggestion::new(format!("video-title-{}", v.id), &v.title, SuggestionType::Video)
        })
        .collect()
}

pub fn work_suggestions(works: &[Work], needle: &str, share: usize) -> Vec<Suggestion> {
    works
        .iter()
        .filter(|w| w.title.to_lowercase().contains(needle))
        .take(share)
        .map(|w| Suggestion::new(format!("work-title-{}", w.id), &w.title, SuggestionType::Work))
        .collect()
}

/// Dedupe by text (first wins), rank, and truncate to `limit`.
///
/// Order: pinned first, then tag > title > video = work, then count
/// descending. The sort is stable, so merge order breaks remaining ties.
pub fn rank_suggestions(merged: Vec<Suggestion>, limit: usize) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<Suggestion> = merged
        .into_iter()
        .filter(|s| seen.insert(s.text.clone()))
        .collect();

    ranked.sort_by_key(|s| {
        (
            Reverse(s.popular),
            Reverse(s.kind.priority()),
            Reverse(s.count.unwrap_or(0)),
        )
    });
    ranked.truncate(limit);
    ranked
}

/// Run autocomplete for an already validated query.
pub async fn autocomplete(
    catalog: &dyn Catalog,
    query: &str,
    limit: u32,
    timeout: Duration,
) -> AutocompleteResponse {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_CHARS {
        return AutocompleteResponse {
            suggestions: Vec::new(),
            meta: AutocompleteMeta {
                query: query.to_string(),
                total: 0,
                sources: SourceCounts::default(),
            },
        };
    }

    let limit = limit as usize;
    let shares = Shares::for_limit(limit);
    let needle = needle.as_str();

    let (tags, titles, videos, works) = tokio::join!(
        run_source(timeout, async {
            let buttons = catalog.recent_public_buttons(BUTTON_SCAN_LIMIT).await?;
            Ok(tag_suggestions(&buttons, needle, shares.tags))
        }),
        run_source(timeout, async {
            let buttons = catalog.most_played_buttons(TITLE_SCAN_LIMIT).await?;
            Ok(title_suggestions(&buttons, needle, shares.titles))
        }),
        run_source(timeout, async {
            let videos = catalog.recent_videos(VIDEO_SCAN_LIMIT).await?;
            Ok(video_suggestions(&videos, needle, shares.videos))
        }),
        run_source(timeout, async {
            let works = catalog.recent_works(WORK_SCAN_LIMIT).await?;
            Ok(work_suggestions(&works, needle, shares.works))
        }),
    );

    let tags = collapse("audioButtons", tags);
    let titles = collapse("popularAudioButtons", titles);
    let videos = collapse("videos", videos);
    let works = collapse("works", works);

    let sources = SourceCounts {
        tags: tags.len(),
        titles: titles.len(),
        videos: videos.len(),
        works: works.len(),
    };

    let merged = tags.into_iter().chain(titles).chain(videos).chain(works).collect();
    let suggestions = rank_suggestions(merged, limit);

    tracing::debug!(
        query,
        total = suggestions.len(),
        tags = sources.tags,
        titles = sources.titles,
        videos = sources.videos,
        works = sources.works,
        "Autocomplete served"
    );

    AutocompleteResponse {
        meta: AutocompleteMeta {
            query: query.to_string(),
            total: suggestions.len(),
            sources,
        },
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audio_button::fixtures::button;
    use crate::search::MemoryCatalog;

    fn sug(text: &str, kind: SuggestionType, count: Option<u64>, popular: bool) -> Suggestion {
        Suggestion {
            count,
            popular,
            ..Suggestion::new(text.to_string(), text, kind)
        }
    }

    #[test]
    fn test_shares_round_up() {
        assert_eq!(
            Shares::for_limit(8),
            Shares { tags: 5, titles: 3, videos: 1, works: 1 }
        );
        assert_eq!(
            Shares::for_limit(20),
            Shares { tags: 12, titles: 6, videos: 2, works: 2 }
        );
        assert_eq!(
            Shares::for_limit(1),
            Shares { tags: 1, titles: 1, videos: 1, works: 1 }
        );
    }

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query(Some("  挨拶 ")).unwrap(), "挨拶");
        assert!(validate_query(None).is_err());
        assert!(validate_query(Some("   ")).is_err());
        assert!(validate_query(Some(&"あ".repeat(100))).is_ok());
        assert!(validate_query(Some(&"あ".repeat(101))).is_err());
    }

    #[test]
    fn test_popular_tags_are_pinned_with_metadata() {
        let buttons = vec![button("1", "a", &["挨拶の練習", "挨拶の練習"]), button("2", "b", &["挨拶"])];

        let tags = tag_suggestions(&buttons, "挨拶", 5);

        assert_eq!(tags[0].text, "挨拶");
        assert!(tags[0].popular);
        assert_eq!(tags[0].count, Some(PINNED_COUNT));
        assert_eq!(tags[0].icon.as_deref(), Some("👋"));
        assert_eq!(tags[0].category.as_deref(), Some("基本"));
        // The dynamic "挨拶" duplicate of the popular tag is dropped.
        let texts: Vec<&str> = tags.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["挨拶", "挨拶の練習"]);
        assert_eq!(tags[1].count, Some(2));
        assert!(!tags[1].popular);
    }

    #[test]
    fn test_tag_suggestions_respect_share() {
        let buttons = vec![button("1", "a", &["ab1", "ab2", "ab3", "ab4"])];
        assert_eq!(tag_suggestions(&buttons, "ab", 2).len(), 2);
    }

    #[test]
    fn test_title_suggestions_by_play_count() {
        let mut a = button("a", "おはよう", &[]);
        a.play_count = 3;
        let mut b = button("b", "おはようございます", &[]);
        b.play_count = 10;
        let c = button("c", "おやすみ", &[]);

        let titles = title_suggestions(&[a, b, c], "おはよう", 3);

        let ids: Vec<&str> = titles.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["audio-title-b", "audio-title-a"]);
        assert_eq!(titles[0].count, Some(10));
    }

    #[test]
    fn test_rank_orders_pinned_then_type_then_count() {
        let merged = vec![
            sug("dyn", SuggestionType::Tag, Some(5), false),
            sug("title-low", SuggestionType::Title, Some(1), false),
            sug("title-high", SuggestionType::Title, Some(50), false),
            sug("vid", SuggestionType::Video, None, false),
            sug("pinned", SuggestionType::Tag, Some(PINNED_COUNT), true),
            sug("work", SuggestionType::Work, None, false),
        ];

        let ranked = rank_suggestions(merged, 10);

        let texts: Vec<&str> = ranked.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["pinned", "dyn", "title-high", "title-low", "vid", "work"]);
    }

    #[test]
    fn test_rank_dedupes_first_occurrence_and_truncates() {
        let merged = vec![
            sug("same", SuggestionType::Tag, Some(1), false),
            sug("same", SuggestionType::Title, Some(100), false),
            sug("other", SuggestionType::Video, None, false),
            sug("third", SuggestionType::Work, None, false),
        ];

        let ranked = rank_suggestions(merged, 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].text, "same");
        assert_eq!(ranked[0].kind, SuggestionType::Tag);
    }

    #[test]
    fn test_rank_never_places_unpinned_before_pinned() {
        // Counts above the pinned value must not outrank pinned tags.
        let merged = vec![
            sug("huge", SuggestionType::Tag, Some(10_000), false),
            sug("pinned", SuggestionType::Tag, Some(PINNED_COUNT), true),
        ];

        let ranked = rank_suggestions(merged, 2);
        assert!(ranked[0].popular);
    }

    #[tokio::test]
    async fn test_short_query_skips_storage() {
        let catalog = MemoryCatalog::new();
        let result = autocomplete(&catalog, "a", 8, Duration::from_secs(1)).await;

        assert!(result.suggestions.is_empty());
        assert_eq!(result.meta.total, 0);
        assert_eq!(catalog.reads(), 0);
    }

    #[tokio::test]
    async fn test_two_char_multibyte_query_is_searched() {
        let catalog = MemoryCatalog::new().with_buttons(vec![button("1", "x", &["歌枠"])]);
        let result = autocomplete(&catalog, "歌枠", 8, Duration::from_secs(1)).await;

        assert_eq!(catalog.reads(), 4);
        assert_eq!(result.suggestions[0].text, "歌枠");
    }

    #[tokio::test]
    async fn test_titles_come_from_most_played_not_most_recent() {
        // The classic sits behind a full recent-scan window of newer buttons.
        let mut buttons: Vec<AudioButton> = (0..BUTTON_SCAN_LIMIT)
            .map(|i| button(&format!("new{}", i), "新作", &[]))
            .collect();
        let mut classic = button("old", "伝説のおはよう", &[]);
        classic.play_count = 10_000;
        buttons.push(classic);
        let catalog = MemoryCatalog::new().with_buttons(buttons);

        let result = autocomplete(&catalog, "おはよう", 8, Duration::from_secs(1)).await;

        assert_eq!(result.meta.sources.titles, 1);
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.id == "audio-title-old" && s.count == Some(10_000)));
    }
}
