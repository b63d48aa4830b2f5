//! In-memory [`Catalog`] for tests, benches, and offline runs.

use crate::error::AppError;
use crate::models::{AudioButton, Video, Work};
use crate::search::Catalog;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Fixed documents served newest-first, with per-category failure injection.
#[derive(Default)]
pub struct MemoryCatalog {
    buttons: Vec<AudioButton>,
    videos: Vec<Video>,
    works: Vec<Work>,
    fail_buttons: bool,
    fail_videos: bool,
    fail_works: bool,
    latency: Option<Duration>,
    reads: AtomicUsize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buttons(mut self, buttons: Vec<AudioButton>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_videos(mut self, videos: Vec<Video>) -> Self {
        self.videos = videos;
        self
    }

    pub fn with_works(mut self, works: Vec<Work>) -> Self {
        self.works = works;
        self
    }

    /// Make every audio button read fail.
    pub fn failing_buttons(mut self) -> Self {
        self.fail_buttons = true;
        self
    }

    pub fn failing_videos(mut self) -> Self {
        self.fail_videos = true;
        self
    }

    pub fn failing_works(mut self) -> Self {
        self.fail_works = true;
        self
    }

    /// Delay every read by `latency`, like a slow backend.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of category reads served (including failed ones).
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    async fn read<T: Clone>(&self, items: &[T], fail: bool, what: &str, limit: u32) -> Result<Vec<T>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if fail {
            return Err(AppError::Database(format!("{} unavailable", what)));
        }
        Ok(items.iter().take(limit as usize).cloned().collect())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn recent_public_buttons(&self, limit: u32) -> Result<Vec<AudioButton>, AppError> {
        let public: Vec<AudioButton> = self.buttons.iter().filter(|b| b.is_public).cloned().collect();
        self.read(&public, self.fail_buttons, "audioButtons", limit).await
    }

    async fn most_played_buttons(&self, limit: u32) -> Result<Vec<AudioButton>, AppError> {
        let mut public: Vec<AudioButton> = self.buttons.iter().filter(|b| b.is_public).cloned().collect();
        public.sort_by_key(|b| std::cmp::Reverse(b.play_count));
        self.read(&public, self.fail_buttons, "audioButtons", limit).await
    }

    async fn recent_videos(&self, limit: u32) -> Result<Vec<Video>, AppError> {
        self.read(&self.videos, self.fail_videos, "videos", limit).await
    }

    async fn recent_works(&self, limit: u32) -> Result<Vec<Work>, AppError> {
        self.read(&self.works, self.fail_works, "works", limit).await
    }
}
