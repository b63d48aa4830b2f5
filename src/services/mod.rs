// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod quota;
pub mod youtube;

pub use quota::{QuotaConfig, QuotaHandle, QuotaOperation, QuotaTracker};
pub use youtube::{SyncReport, YouTubeClient, YouTubeService};
