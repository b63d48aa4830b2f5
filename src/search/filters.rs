// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Audio button filters and ordering for unified search.

use crate::error::AppError;
use crate::models::AudioButton;
use crate::time_utils::{jst_date, jst_midnight_utc, parse_rfc3339};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Deserialize;
use std::cmp::Reverse;
use std::str::FromStr;

/// Result ordering for audio buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Title matches first, then newest
    #[default]
    Relevance,
    Newest,
    Oldest,
    /// Most liked
    Popular,
    MostPlayed,
}

impl FromStr for SortBy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortBy::Relevance),
            "newest" => Ok(SortBy::Newest),
            "oldest" => Ok(SortBy::Oldest),
            "popular" => Ok(SortBy::Popular),
            "mostPlayed" => Ok(SortBy::MostPlayed),
            other => Err(AppError::BadRequest(format!("Invalid sortBy '{}'", other))),
        }
    }
}

/// Named creation-date windows, evaluated in JST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangePreset {
    Today,
    /// Monday through Sunday
    ThisWeek,
    ThisMonth,
    Last30Days,
    /// Use `dateFrom` / `dateTo`
    Custom,
}

impl FromStr for DateRangePreset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateRangePreset::Today),
            "this_week" => Ok(DateRangePreset::ThisWeek),
            "this_month" => Ok(DateRangePreset::ThisMonth),
            "last_30_days" => Ok(DateRangePreset::Last30Days),
            "custom" => Ok(DateRangePreset::Custom),
            other => Err(AppError::BadRequest(format!("Invalid dateRange '{}'", other))),
        }
    }
}

impl DateRangePreset {
    /// Half-open `[from, to)` window containing `now`. `None` for `Custom`.
    pub fn range(self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let today = jst_date(now);
        match self {
            DateRangePreset::Today => Some((
                jst_midnight_utc(today),
                jst_midnight_utc(today + Duration::days(1)),
            )),
            DateRangePreset::ThisWeek => {
                let monday =
                    today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
                Some((
                    jst_midnight_utc(monday),
                    jst_midnight_utc(monday + Duration::days(7)),
                ))
            }
            DateRangePreset::ThisMonth => {
                let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
                let next = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)?
                };
                Some((jst_midnight_utc(first), jst_midnight_utc(next)))
            }
            DateRangePreset::Last30Days => Some((now - Duration::days(30), now)),
            DateRangePreset::Custom => None,
        }
    }
}

/// How multiple requested tags combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagMode {
    #[default]
    Any,
    All,
}

impl FromStr for TagMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(TagMode::Any),
            "all" => Ok(TagMode::All),
            other => Err(AppError::BadRequest(format!("Invalid tagMode '{}'", other))),
        }
    }
}

/// Inclusive bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Filter parameters as they arrive in the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonFilterParams {
    pub sort_by: Option<String>,
    pub date_range: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub play_count_min: Option<String>,
    pub play_count_max: Option<String>,
    pub like_count_min: Option<String>,
    pub like_count_max: Option<String>,
    pub favorite_count_min: Option<String>,
    pub favorite_count_max: Option<String>,
    pub duration_min: Option<String>,
    pub duration_max: Option<String>,
    /// Comma-separated
    pub tags: Option<String>,
    pub tag_mode: Option<String>,
}

/// Validated audio button filters.
#[derive(Debug, Clone, Default)]
pub struct ButtonFilters {
    pub sort_by: SortBy,
    pub created_after: Option<DateTime<Utc>>,
    /// Exclusive
    pub created_before: Option<DateTime<Utc>>,
    pub play_count: Bounds<u64>,
    pub like_count: Bounds<u64>,
    pub favorite_count: Bounds<u64>,
    /// Seconds
    pub duration: Bounds<f64>,
    /// Lowercased
    pub tags: Vec<String>,
    pub tag_mode: TagMode,
}

fn non_empty(raw: Option<&String>) -> Option<&str> {
    raw.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn parse_count(name: &str, raw: Option<&String>) -> Result<Option<u64>, AppError> {
    non_empty(raw)
        .map(|v| {
            v.parse::<u64>().map_err(|_| {
                AppError::BadRequest(format!("Invalid {} '{}': must be a non-negative integer", name, v))
            })
        })
        .transpose()
}

fn parse_seconds(name: &str, raw: Option<&String>) -> Result<Option<f64>, AppError> {
    non_empty(raw)
        .map(|v| {
            v.parse::<f64>()
                .ok()
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Invalid {} '{}': must be seconds", name, v))
                })
        })
        .transpose()
}

fn parse_date(name: &str, raw: Option<&String>) -> Result<Option<DateTime<Utc>>, AppError> {
    non_empty(raw)
        .map(|v| {
            parse_rfc3339(v).ok_or_else(|| {
                AppError::BadRequest(format!("Invalid {} '{}': must be RFC3339 datetime", name, v))
            })
        })
        .transpose()
}

impl ButtonFilters {
    /// Validate raw parameters. Date presets resolve against `now`.
    pub fn from_params(params: &ButtonFilterParams, now: DateTime<Utc>) -> Result<Self, AppError> {
        let sort_by: SortBy = non_empty(params.sort_by.as_ref())
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();
        let tag_mode: TagMode = non_empty(params.tag_mode.as_ref())
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();
        let preset: Option<DateRangePreset> = non_empty(params.date_range.as_ref())
            .map(str::parse)
            .transpose()?;

        let (created_after, created_before) = match preset.and_then(|p| p.range(now)) {
            Some((from, to)) => (Some(from), Some(to)),
            None => (
                parse_date("dateFrom", params.date_from.as_ref())?,
                parse_date("dateTo", params.date_to.as_ref())?,
            ),
        };

        let tags = params
            .tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            sort_by,
            created_after,
            created_before,
            play_count: Bounds {
                min: parse_count("playCountMin", params.play_count_min.as_ref())?,
                max: parse_count("playCountMax", params.play_count_max.as_ref())?,
            },
            like_count: Bounds {
                min: parse_count("likeCountMin", params.like_count_min.as_ref())?,
                max: parse_count("likeCountMax", params.like_count_max.as_ref())?,
            },
            favorite_count: Bounds {
                min: parse_count("favoriteCountMin", params.favorite_count_min.as_ref())?,
                max: parse_count("favoriteCountMax", params.favorite_count_max.as_ref())?,
            },
            duration: Bounds {
                min: parse_seconds("durationMin", params.duration_min.as_ref())?,
                max: parse_seconds("durationMax", params.duration_max.as_ref())?,
            },
            tags,
            tag_mode,
        })
    }

    /// Whether `button` passes every filter (text matching is separate).
    pub fn matches(&self, button: &AudioButton) -> bool {
        if !(self.play_count.contains(button.play_count)
            && self.like_count.contains(button.like_count)
            && self.favorite_count.contains(button.favorite_count)
            && self.duration.contains(button.duration_secs()))
        {
            return false;
        }

        if self.created_after.is_some() || self.created_before.is_some() {
            // Undated buttons can't satisfy a date window.
            let Some(created) = parse_rfc3339(&button.created_at) else {
                return false;
            };
            if self.created_after.is_some_and(|from| created < from)
                || self.created_before.is_some_and(|to| created >= to)
            {
                return false;
            }
        }

        if self.tags.is_empty() {
            return true;
        }
        let has_tag = |wanted: &String| button.tags.iter().any(|t| t.to_lowercase() == *wanted);
        match self.tag_mode {
            TagMode::Any => self.tags.iter().any(has_tag),
            TagMode::All => self.tags.iter().all(has_tag),
        }
    }

    /// Order matched buttons. `query` must be lowercased.
    pub fn sort(&self, buttons: &mut [AudioButton], query: &str) {
        let created = |b: &AudioButton| parse_rfc3339(&b.created_at);
        match self.sort_by {
            SortBy::Relevance => buttons.sort_by_cached_key(|b| {
                (!b.title.to_lowercase().contains(query), Reverse(created(b)))
            }),
            SortBy::Newest => buttons.sort_by_cached_key(|b| Reverse(created(b))),
            SortBy::Oldest => buttons.sort_by_cached_key(created),
            SortBy::Popular => buttons.sort_by_key(|b| Reverse(b.like_count)),
            SortBy::MostPlayed => buttons.sort_by_key(|b| Reverse(b.play_count)),
        }
    }
}
