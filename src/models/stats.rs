//! Audio button aggregates for the stats endpoints.
//!
//! Computed in memory over a bounded scan of recent public buttons; there
//! is no pre-aggregated document to keep in sync.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{AudioButton, AudioButtonCategory};

/// Tag frequency entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u32,
}

/// Tag frequencies over a set of audio buttons.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagStats {
    /// Sorted by count descending, then tag name ascending
    pub tags: Vec<TagCount>,
    /// Distinct tags seen (before truncation)
    pub distinct_tags: u32,
    /// Buttons scanned
    pub buttons_scanned: u32,
}

impl TagStats {
    /// Count tags and keep the `limit` most frequent.
    ///
    /// A tag repeated on the same button counts once for that button.
    pub fn from_buttons<'a>(buttons: impl IntoIterator<Item = &'a AudioButton>, limit: usize) -> Self {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        let mut scanned = 0u32;

        for button in buttons {
            scanned += 1;
            let mut seen: Vec<&str> = Vec::with_capacity(button.tags.len());
            for tag in &button.tags {
                let tag = tag.trim();
                if tag.is_empty() || seen.contains(&tag) {
                    continue;
                }
                seen.push(tag);
                *counts.entry(tag).or_insert(0) += 1;
            }
        }

        let distinct_tags = counts.len() as u32;
        let mut tags: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        tags.truncate(limit);

        Self {
            tags,
            distinct_tags,
            buttons_scanned: scanned,
        }
    }
}

/// Totals over a set of audio buttons.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioButtonStats {
    pub total_count: u32,
    /// Every category is present, zero if unused
    pub category_counts: BTreeMap<AudioButtonCategory, u32>,
    pub total_play_count: u64,
    pub total_like_count: u64,
}

impl Default for AudioButtonStats {
    fn default() -> Self {
        Self {
            total_count: 0,
            category_counts: AudioButtonCategory::ALL.iter().map(|c| (*c, 0)).collect(),
            total_play_count: 0,
            total_like_count: 0,
        }
    }
}

impl AudioButtonStats {
    pub fn from_buttons<'a>(buttons: impl IntoIterator<Item = &'a AudioButton>) -> Self {
        let mut stats = Self::default();
        for button in buttons {
            stats.total_count += 1;
            *stats.category_counts.entry(button.category).or_insert(0) += 1;
            stats.total_play_count += button.play_count;
            stats.total_like_count += button.like_count;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audio_button::fixtures::button;

    #[test]
    fn test_tag_stats_orders_by_count_then_name() {
        let buttons = vec![
            button("1", "a", &["挨拶", "朝"]),
            button("2", "b", &["挨拶", "夜"]),
            button("3", "c", &["挨拶", "夜"]),
            button("4", "d", &["朝"]),
        ];

        let stats = TagStats::from_buttons(&buttons, 10);

        assert_eq!(stats.buttons_scanned, 4);
        assert_eq!(stats.distinct_tags, 3);
        let names: Vec<(&str, u32)> = stats.tags.iter().map(|t| (t.tag.as_str(), t.count)).collect();
        assert_eq!(names, vec![("挨拶", 3), ("夜", 2), ("朝", 2)]);
    }

    #[test]
    fn test_tag_stats_counts_duplicate_tag_once_per_button() {
        let buttons = vec![button("1", "a", &["歌", "歌", " "])];

        let stats = TagStats::from_buttons(&buttons, 10);

        assert_eq!(stats.tags, vec![TagCount { tag: "歌".to_string(), count: 1 }]);
    }

    #[test]
    fn test_tag_stats_truncates() {
        let buttons = vec![button("1", "a", &["a", "b", "c"])];
        let stats = TagStats::from_buttons(&buttons, 2);
        assert_eq!(stats.tags.len(), 2);
        assert_eq!(stats.distinct_tags, 3);
    }

    #[test]
    fn test_button_stats_totals() {
        let mut a = button("1", "a", &[]);
        a.play_count = 10;
        a.like_count = 2;
        let mut b = button("2", "b", &[]);
        b.category = AudioButtonCategory::Bgm;
        b.play_count = 5;

        let stats = AudioButtonStats::from_buttons(&[a, b]);

        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.total_play_count, 15);
        assert_eq!(stats.total_like_count, 2);
        assert_eq!(stats.category_counts[&AudioButtonCategory::Voice], 1);
        assert_eq!(stats.category_counts[&AudioButtonCategory::Bgm], 1);
        assert_eq!(stats.category_counts[&AudioButtonCategory::Singing], 0);
        assert_eq!(stats.category_counts.len(), 6);
    }
}
