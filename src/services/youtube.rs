// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! YouTube Data API v3 client and video sync.
//!
//! Handles:
//! - Channel video discovery (`search.list`)
//! - Video detail fetches (`videos.list`)
//! - Quota gating: every call is checked against the [`QuotaHandle`]
//!   before it is sent and recorded after it succeeds
//! - Upserting fetched videos into Firestore

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{Video, VideoStatistics};
use crate::services::quota::{QuotaHandle, QuotaOperation, VIDEO_IDS_PER_SEARCH_PAGE};
use crate::time_utils::now_rfc3339;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
/// `videos.list` accepts at most 50 IDs per call.
const MAX_IDS_PER_VIDEOS_CALL: usize = 50;
const VIDEO_PARTS: &str =
    "snippet,contentDetails,statistics,liveStreamingDetails,topicDetails,status,recordingDetails,player";
const MAX_CONCURRENT_LOOKUPS: usize = 10;

/// YouTube Data API client.
#[derive(Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    quota: QuotaHandle,
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>, quota: QuotaHandle) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            quota,
        }
    }

    /// Point the client at another API host (emulators, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn quota(&self) -> &QuotaHandle {
        &self.quota
    }

    /// Fail before any request if the budget can't cover `op`.
    fn reserve(&self, op: QuotaOperation, batch: u32) -> Result<(), AppError> {
        if self.quota.can_execute(op, batch) {
            Ok(())
        } else {
            Err(AppError::QuotaExceeded(format!(
                "{} x{} needs {} units",
                op,
                batch,
                op.cost() * u64::from(batch)
            )))
        }
    }

    fn api_key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::YouTubeApi("YOUTUBE_API_KEY is not configured".to_string()))
    }

    /// List up to `max` video IDs from a channel, newest first.
    pub async fn search_channel_video_ids(
        &self,
        channel_id: &str,
        max: u32,
    ) -> Result<Vec<String>, AppError> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        while ids.len() < max as usize {
            self.reserve(QuotaOperation::Search, 1)?;
            let key = self.api_key()?;

            let remaining = max as usize - ids.len();
            let page_size = remaining.min(VIDEO_IDS_PER_SEARCH_PAGE as usize).to_string();
            let mut query = vec![
                ("part", "id"),
                ("channelId", channel_id),
                ("type", "video"),
                ("order", "date"),
                ("maxResults", page_size.as_str()),
                ("key", key),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: SearchListResponse = self.get_json("search", &query).await?;
            self.quota.record(QuotaOperation::Search, 1);

            ids.extend(page.items.into_iter().filter_map(|item| item.id.video_id));
            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        ids.truncate(max as usize);
        tracing::debug!(channel_id, count = ids.len(), "Channel video IDs fetched");
        Ok(ids)
    }

    /// Fetch full details for `ids`, 50 per call.
    ///
    /// The whole batch must fit the budget before the first call goes out.
    /// If the budget shrinks mid-run, the videos already paid for are
    /// returned rather than dropped.
    pub async fn fetch_video_details(&self, ids: &[String]) -> Result<Vec<Video>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.reserve(QuotaOperation::VideosFullDetails, ids.len() as u32)?;
        let key = self.api_key()?;

        let mut videos = Vec::with_capacity(ids.len());

        for (index, chunk) in ids.chunks(MAX_IDS_PER_VIDEOS_CALL).enumerate() {
            let batch = chunk.len() as u32;
            if let Err(e) = self.reserve(QuotaOperation::VideosFullDetails, batch) {
                tracing::warn!(
                    fetched = videos.len(),
                    skipped = ids.len() - index * MAX_IDS_PER_VIDEOS_CALL,
                    error = %e,
                    "Quota ran out during video detail fetch"
                );
                break;
            }

            let joined = chunk.join(",");
            let query = [("part", VIDEO_PARTS), ("id", joined.as_str()), ("key", key)];
            let response: VideoListResponse = self.get_json("videos", &query).await?;
            self.quota.record(QuotaOperation::VideosFullDetails, batch);

            let fetched_at = now_rfc3339();
            videos.extend(
                response
                    .items
                    .into_iter()
                    .map(|item| item.into_video(&fetched_at)),
            );
        }

        Ok(videos)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::YouTubeApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if body.contains(AppError::YOUTUBE_QUOTA_EXCEEDED) {
                tracing::warn!(endpoint, "YouTube reported quota exhausted");
                return Err(AppError::YouTubeApi(
                    AppError::YOUTUBE_QUOTA_EXCEEDED.to_string(),
                ));
            }

            return Err(AppError::YouTubeApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::YouTubeApi(format!("JSON parse error: {}", e)))
    }
}

// ─── API Responses ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    content_details: Option<ContentDetails>,
    statistics: Option<ApiStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    description: String,
    channel_id: String,
    #[serde(default)]
    channel_title: String,
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    live_broadcast_content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

/// Counts arrive as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

fn parse_count(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.parse().ok())
}

impl VideoItem {
    fn into_video(self, fetched_at: &str) -> Video {
        let thumbnails = self.snippet.thumbnails;
        let thumbnail_url = thumbnails
            .high
            .or(thumbnails.medium)
            .or(thumbnails.default)
            .map(|t| t.url)
            .unwrap_or_default();

        Video {
            id: self.id,
            title: self.snippet.title,
            description: self.snippet.description,
            channel_id: self.snippet.channel_id,
            channel_title: self.snippet.channel_title,
            published_at: self.snippet.published_at,
            thumbnail_url,
            last_fetched_at: fetched_at.to_string(),
            duration: self.content_details.and_then(|c| c.duration),
            statistics: self.statistics.map(|s| VideoStatistics {
                view_count: parse_count(s.view_count),
                like_count: parse_count(s.like_count),
                comment_count: parse_count(s.comment_count),
            }),
            live_broadcast_content: self.snippet.live_broadcast_content,
            audio_button_count: 0,
            playlist_tags: Vec::new(),
            updated_at: None,
        }
    }
}

// ─── Sync Service ────────────────────────────────────────────

/// Outcome of a sync run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub requested: usize,
    pub fetched: usize,
    pub stored: usize,
    /// Units spent by this run
    pub quota_used: u64,
}

/// Syncs YouTube video metadata into the `videos` collection.
#[derive(Clone)]
pub struct YouTubeService {
    client: YouTubeClient,
    db: FirestoreDb,
}

impl YouTubeService {
    pub fn new(client: YouTubeClient, db: FirestoreDb) -> Self {
        Self { client, db }
    }

    /// Fetch and upsert specific videos.
    ///
    /// Site-managed fields (`audioButtonCount`, `playlistTags`) survive the
    /// refresh.
    pub async fn sync_videos(&self, ids: &[String]) -> Result<SyncReport, AppError> {
        let before = self.client.quota().usage_stats().used;

        let fetched = self.client.fetch_video_details(ids).await?;
        let fetched_count = fetched.len();

        let merged: Vec<Video> = stream::iter(fetched)
            .map(|mut video| async move {
                if let Some(existing) = self.db.get_video(&video.id).await? {
                    video.audio_button_count = existing.audio_button_count;
                    video.playlist_tags = existing.playlist_tags;
                    video.updated_at = existing.updated_at;
                }
                Ok::<_, AppError>(video)
            })
            .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
            .collect::<Vec<Result<Video, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Video>, AppError>>()?;

        self.db.upsert_videos(&merged).await?;

        let report = SyncReport {
            requested: ids.len(),
            fetched: fetched_count,
            stored: merged.len(),
            quota_used: self.client.quota().usage_stats().used.saturating_sub(before),
        };
        tracing::info!(
            requested = report.requested,
            stored = report.stored,
            quota_used = report.quota_used,
            "YouTube videos synced"
        );
        Ok(report)
    }

    /// Discover up to `max` recent videos on a channel and sync them.
    pub async fn sync_channel(&self, channel_id: &str, max: u32) -> Result<SyncReport, AppError> {
        let before = self.client.quota().usage_stats().used;
        let ids = self.client.search_channel_video_ids(channel_id, max).await?;
        let mut report = self.sync_videos(&ids).await?;
        report.quota_used = self.client.quota().usage_stats().used.saturating_sub(before);
        Ok(report)
    }
}
