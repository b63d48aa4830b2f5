// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod audio_button;
pub mod contact;
pub mod reaction;
pub mod stats;
pub mod user;
pub mod video;
pub mod work;

pub use audio_button::{AudioButton, AudioButtonCategory};
pub use contact::{Contact, ContactCategory, ContactPriority, ContactStats, ContactStatus};
pub use reaction::{Favorite, Like};
pub use stats::{AudioButtonStats, TagStats};
pub use user::{User, UserRole};
pub use video::{Video, VideoStatistics};
pub use work::{Price, Work};
