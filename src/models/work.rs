// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DLsite work model (`dlsiteWorks`).

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stored work record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: String,
    /// DLsite product ID (e.g. RJ01234567)
    pub product_id: String,
    pub title: String,
    /// Circle (publisher) name
    pub circle: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: String,
    pub work_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub sales_count: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Price information in yen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub current: u32,
    #[serde(default)]
    pub original: Option<u32>,
    /// Discount percentage (0-100)
    #[serde(default)]
    pub discount: Option<u8>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "JPY".to_string()
}

impl Work {
    /// Match against title, circle, and author. `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.circle.to_lowercase().contains(needle)
            || self
                .author
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(needle))
    }
}
