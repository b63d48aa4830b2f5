// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! YouTube Data API quota tracking.
//!
//! Keeps an in-process running total of quota units spent against the daily
//! ceiling, broken down per operation. State is not persisted: it resets on
//! restart and is not shared between Cloud Run instances. The daily counter
//! rolls over at midnight JST (when Google resets the quota); an hourly
//! counter rolls over one hour after its last reset.
//!
//! Callers hold a [`QuotaHandle`] injected through `AppState`, never a
//! global.

use crate::config::{Config, DEFAULT_DAILY_QUOTA};
use crate::time_utils::{format_utc_rfc3339, jst_date};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Maximum video IDs returned per `search.list` page.
pub const VIDEO_IDS_PER_SEARCH_PAGE: u64 = 50;

/// API operations with a fixed quota cost.
///
/// See <https://developers.google.com/youtube/v3/determine_quota_cost>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuotaOperation {
    Search,
    SearchWithSnippet,
    VideosWithSnippet,
    VideosWithStatistics,
    VideosWithContentDetails,
    VideosWithLiveStreamingDetails,
    VideosWithTopicDetails,
    VideosWithStatus,
    VideosWithRecordingDetails,
    VideosWithPlayer,
    /// snippet + statistics + contentDetails + liveStreamingDetails + ...
    VideosFullDetails,
}

impl QuotaOperation {
    pub const ALL: [QuotaOperation; 11] = [
        QuotaOperation::Search,
        QuotaOperation::SearchWithSnippet,
        QuotaOperation::VideosWithSnippet,
        QuotaOperation::VideosWithStatistics,
        QuotaOperation::VideosWithContentDetails,
        QuotaOperation::VideosWithLiveStreamingDetails,
        QuotaOperation::VideosWithTopicDetails,
        QuotaOperation::VideosWithStatus,
        QuotaOperation::VideosWithRecordingDetails,
        QuotaOperation::VideosWithPlayer,
        QuotaOperation::VideosFullDetails,
    ];

    /// Quota units charged per unit of batch.
    pub fn cost(self) -> u64 {
        match self {
            QuotaOperation::Search | QuotaOperation::SearchWithSnippet => 100,
            QuotaOperation::VideosFullDetails => 8,
            _ => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QuotaOperation::Search => "search",
            QuotaOperation::SearchWithSnippet => "searchWithSnippet",
            QuotaOperation::VideosWithSnippet => "videosWithSnippet",
            QuotaOperation::VideosWithStatistics => "videosWithStatistics",
            QuotaOperation::VideosWithContentDetails => "videosWithContentDetails",
            QuotaOperation::VideosWithLiveStreamingDetails => "videosWithLiveStreamingDetails",
            QuotaOperation::VideosWithTopicDetails => "videosWithTopicDetails",
            QuotaOperation::VideosWithStatus => "videosWithStatus",
            QuotaOperation::VideosWithRecordingDetails => "videosWithRecordingDetails",
            QuotaOperation::VideosWithPlayer => "videosWithPlayer",
            QuotaOperation::VideosFullDetails => "videosFullDetails",
        }
    }

    /// Single-part reads that count toward the efficiency score.
    fn is_efficient(self) -> bool {
        matches!(
            self,
            QuotaOperation::VideosWithSnippet
                | QuotaOperation::VideosWithStatistics
                | QuotaOperation::VideosWithContentDetails
        )
    }
}

impl std::fmt::Display for QuotaOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for QuotaOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuotaOperation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| format!("unknown quota operation '{}'", s))
    }
}

/// Ceilings and alert thresholds.
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    pub daily_limit: u64,
    /// When set, `can_execute` also requires the hourly budget.
    pub hourly_limit: Option<u64>,
    /// Percent of the daily limit that triggers a warning.
    pub daily_warning_percent: f64,
    /// Percent of the daily limit that triggers an error-level alert.
    pub daily_critical_percent: f64,
    /// Hourly units that trigger a warning.
    pub hourly_warning_units: u64,
    /// Warn when the current burn rate projects past 90% of the daily limit.
    pub predictive_alerts: bool,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_limit: DEFAULT_DAILY_QUOTA,
            hourly_limit: None,
            daily_warning_percent: 80.0,
            daily_critical_percent: 95.0,
            hourly_warning_units: 2500,
            predictive_alerts: true,
        }
    }
}

impl QuotaConfig {
    pub fn from_app_config(config: &Config) -> Self {
        Self {
            daily_limit: config.youtube_daily_quota,
            hourly_limit: config.youtube_hourly_quota,
            ..Self::default()
        }
    }
}

/// Time source, injectable for tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Snapshot returned by [`QuotaTracker::usage_stats`].
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct QuotaUsageStats {
    /// Units used today
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub used: u64,
    /// `daily_limit - used`; negative once the budget is overdrawn
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub remaining: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub daily_limit: u64,
    pub percent_used: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub hourly_used: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub hourly_limit: Option<u64>,
    /// Units charged per operation name
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub per_operation: BTreeMap<String, u64>,
    /// Batch quantity recorded per operation name
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub calls_by_operation: BTreeMap<String, u64>,
    /// Start of the current quota day (RFC3339)
    pub day_started: String,
    /// 0..=1, higher means cheaper reads dominate
    pub efficiency_score: f64,
}

/// Result of [`QuotaTracker::suggest_optimal_operations`].
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct OperationPlan {
    pub feasible: bool,
    /// Units the full plan for the requested batch would cost
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub estimated_cost: u64,
    pub plan: String,
    pub alternatives: Vec<String>,
    /// Largest batch whose full plan fits the remaining budget
    pub max_affordable: u32,
}

struct QuotaState {
    daily_used: u64,
    hourly_used: u64,
    units_by_operation: BTreeMap<QuotaOperation, u64>,
    calls_by_operation: BTreeMap<QuotaOperation, u64>,
    day_started: DateTime<Utc>,
    hour_started: DateTime<Utc>,
}

impl QuotaState {
    fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            daily_used: 0,
            hourly_used: 0,
            units_by_operation: BTreeMap::new(),
            calls_by_operation: BTreeMap::new(),
            day_started: now,
            hour_started: now,
        }
    }

    fn roll_windows(&mut self, now: DateTime<Utc>) {
        if jst_date(now) != jst_date(self.day_started) {
            tracing::info!(
                previous_usage = self.daily_used,
                "YouTube quota daily reset"
            );
            self.daily_used = 0;
            self.units_by_operation.clear();
            self.calls_by_operation.clear();
            self.day_started = now;
        }

        if now.signed_duration_since(self.hour_started) >= Duration::hours(1) {
            tracing::debug!(
                previous_usage = self.hourly_used,
                "YouTube quota hourly reset"
            );
            self.hourly_used = 0;
            self.hour_started = now;
        }
    }
}

/// Process-lifetime quota tracker.
pub struct QuotaTracker {
    config: QuotaConfig,
    clock: Clock,
    state: Mutex<QuotaState>,
}

/// Shared handle to the tracker.
pub type QuotaHandle = Arc<QuotaTracker>;

impl QuotaTracker {
    pub fn new(config: QuotaConfig) -> Self {
        Self::with_clock(config, Arc::new(Utc::now))
    }

    pub fn with_clock(config: QuotaConfig, clock: Clock) -> Self {
        let now = clock();
        tracing::info!(
            daily_limit = config.daily_limit,
            hourly_limit = ?config.hourly_limit,
            "YouTube quota tracker initialized"
        );
        Self {
            config,
            clock,
            state: Mutex::new(QuotaState::fresh(now)),
        }
    }

    /// Lock state and apply any pending day/hour rollover.
    fn lock(&self) -> (MutexGuard<'_, QuotaState>, DateTime<Utc>) {
        let now = (self.clock)();
        // The state is plain counters, so a poisoned lock is still consistent.
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.roll_windows(now);
        (state, now)
    }

    /// Charge `op.cost() * batch` units. Returns the units charged.
    pub fn record(&self, op: QuotaOperation, batch: u32) -> u64 {
        let cost = op.cost().saturating_mul(u64::from(batch));
        let (mut state, now) = self.lock();

        state.daily_used = state.daily_used.saturating_add(cost);
        state.hourly_used = state.hourly_used.saturating_add(cost);
        *state.units_by_operation.entry(op).or_insert(0) += cost;
        *state.calls_by_operation.entry(op).or_insert(0) += u64::from(batch);

        tracing::debug!(
            operation = %op,
            batch,
            cost,
            daily_usage = state.daily_used,
            hourly_usage = state.hourly_used,
            "YouTube quota recorded"
        );

        self.check_alerts(&state, now);
        cost
    }

    /// Whether `op` with `batch` fits in the remaining budget.
    ///
    /// Landing exactly on the ceiling is allowed.
    pub fn can_execute(&self, op: QuotaOperation, batch: u32) -> bool {
        let required = op.cost().saturating_mul(u64::from(batch));
        let (state, _) = self.lock();

        let daily_ok = state.daily_used.saturating_add(required) <= self.config.daily_limit;
        let hourly_ok = self
            .config
            .hourly_limit
            .is_none_or(|limit| state.hourly_used.saturating_add(required) <= limit);

        if !(daily_ok && hourly_ok) {
            tracing::warn!(
                operation = %op,
                required,
                daily_used = state.daily_used,
                hourly_used = state.hourly_used,
                reason = if daily_ok { "hourly_limit" } else { "daily_limit" },
                "Insufficient YouTube quota"
            );
        }

        daily_ok && hourly_ok
    }

    pub fn usage_stats(&self) -> QuotaUsageStats {
        let (state, _) = self.lock();
        self.stats_from(&state)
    }

    fn stats_from(&self, state: &QuotaState) -> QuotaUsageStats {
        let limit = self.config.daily_limit;
        QuotaUsageStats {
            used: state.daily_used,
            remaining: signed_remaining(limit, state.daily_used),
            daily_limit: limit,
            percent_used: percent(state.daily_used, limit),
            hourly_used: state.hourly_used,
            hourly_limit: self.config.hourly_limit,
            per_operation: by_name(&state.units_by_operation),
            calls_by_operation: by_name(&state.calls_by_operation),
            day_started: format_utc_rfc3339(state.day_started),
            efficiency_score: efficiency_score(&state.calls_by_operation),
        }
    }

    /// Plan a channel sync for `desired` videos against the remaining budget.
    ///
    /// A full plan costs one `search` per 50 videos plus `videosFullDetails`
    /// per video. When it doesn't fit, the batch is degraded to the largest
    /// size that does.
    pub fn suggest_optimal_operations(&self, desired: u32) -> OperationPlan {
        let remaining = {
            let (state, _) = self.lock();
            signed_remaining(self.config.daily_limit, state.daily_used)
        };
        let budget = u64::try_from(remaining).unwrap_or(0);

        let search_cost = search_cost(desired);
        let details_cost = u64::from(desired) * QuotaOperation::VideosFullDetails.cost();
        let estimated_cost = search_cost + details_cost;
        let feasible = estimated_cost <= budget;

        let max_affordable = if feasible {
            desired
        } else {
            largest_affordable(desired, budget)
        };

        let mut alternatives = Vec::new();
        if !feasible {
            let snippet_cost = search_cost + snippet_only_cost(desired);
            if snippet_cost <= budget {
                alternatives.push(format!(
                    "Fetch snippet only for {} videos ({} units)",
                    desired, snippet_cost
                ));
            }
            if max_affordable > 0 {
                alternatives.push(format!(
                    "Reduce target to {} videos ({} units)",
                    max_affordable,
                    full_plan_cost(max_affordable)
                ));
            }
        }

        OperationPlan {
            feasible,
            estimated_cost,
            plan: format!(
                "search: {} units, details: {} units",
                search_cost, details_cost
            ),
            alternatives,
            max_affordable,
        }
    }

    /// Plain-text daily summary.
    pub fn daily_report(&self) -> String {
        let stats = self.usage_stats();
        let mut lines = vec![
            "YouTube API Daily Report".to_string(),
            "=".repeat(30),
            format!(
                "Used: {}/{} ({}%)",
                stats.used,
                stats.daily_limit,
                stats.percent_used.round()
            ),
            format!("Remaining: {}", stats.remaining),
            format!("Efficiency: {}%", (stats.efficiency_score * 100.0).round()),
            String::new(),
            "By operation:".to_string(),
        ];
        lines.extend(stats.calls_by_operation.iter().map(|(op, count)| {
            let units = stats.per_operation.get(op).copied().unwrap_or(0);
            format!("  {}: {} calls, {} units", op, count, units)
        }));
        lines.join("\n")
    }

    /// Zero all counters and restart both windows.
    pub fn reset(&self) {
        let now = (self.clock)();
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        *state = QuotaState::fresh(now);
    }

    fn check_alerts(&self, state: &QuotaState, now: DateTime<Utc>) {
        let limit = self.config.daily_limit;
        let daily_percent = percent(state.daily_used, limit);
        let remaining = signed_remaining(limit, state.daily_used);

        if daily_percent >= self.config.daily_critical_percent {
            tracing::error!(
                daily_usage = state.daily_used,
                percentage = daily_percent.round(),
                remaining,
                "YouTube quota at critical level"
            );
        } else if daily_percent >= self.config.daily_warning_percent {
            tracing::warn!(
                daily_usage = state.daily_used,
                percentage = daily_percent.round(),
                remaining,
                "YouTube quota at warning level"
            );
        }

        if state.hourly_used >= self.config.hourly_warning_units {
            tracing::warn!(
                hourly_usage = state.hourly_used,
                hourly_limit = ?self.config.hourly_limit,
                "YouTube hourly quota usage high"
            );
        }

        if self.config.predictive_alerts {
            let hours_elapsed =
                now.signed_duration_since(state.day_started).num_seconds() as f64 / 3600.0;
            // Too little data in the first hour to extrapolate.
            if hours_elapsed >= 1.0 {
                let rate = state.daily_used as f64 / hours_elapsed;
                let predicted = rate * 24.0;
                if predicted > limit as f64 * 0.9 {
                    tracing::warn!(
                        current_rate = rate.round(),
                        predicted_daily_usage = predicted.round(),
                        daily_limit = limit,
                        "YouTube quota projected to run out"
                    );
                }
            }
        }
    }
}

fn signed_remaining(limit: u64, used: u64) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX) - i64::try_from(used).unwrap_or(i64::MAX)
}

fn percent(used: u64, limit: u64) -> f64 {
    if limit == 0 {
        return if used == 0 { 0.0 } else { 100.0 };
    }
    used as f64 / limit as f64 * 100.0
}

fn by_name(map: &BTreeMap<QuotaOperation, u64>) -> BTreeMap<String, u64> {
    map.iter().map(|(op, v)| (op.name().to_string(), *v)).collect()
}

fn efficiency_score(calls: &BTreeMap<QuotaOperation, u64>) -> f64 {
    let total: u64 = calls.values().sum();
    if total == 0 {
        return 1.0;
    }

    let efficient: u64 = calls
        .iter()
        .filter(|(op, _)| op.is_efficient())
        .map(|(_, n)| *n)
        .sum();
    let searches = calls.get(&QuotaOperation::Search).copied().unwrap_or(0);
    let penalty = (searches as f64 * 0.1).min(0.5);

    (efficient as f64 / total as f64 - penalty).clamp(0.0, 1.0)
}

fn search_cost(videos: u32) -> u64 {
    u64::from(videos).div_ceil(VIDEO_IDS_PER_SEARCH_PAGE) * QuotaOperation::Search.cost()
}

fn snippet_only_cost(videos: u32) -> u64 {
    u64::from(videos) * QuotaOperation::VideosWithSnippet.cost()
}

fn full_plan_cost(videos: u32) -> u64 {
    search_cost(videos) + u64::from(videos) * QuotaOperation::VideosFullDetails.cost()
}

/// Largest `n <= desired` whose full plan fits `budget`. Cost is monotonic in `n`.
fn largest_affordable(desired: u32, budget: u64) -> u32 {
    let (mut lo, mut hi) = (0u32, desired);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if full_plan_cost(mid) <= budget {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}
