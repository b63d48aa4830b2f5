// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Run with: FIRESTORE_EMULATOR_HOST=localhost:8081 cargo test --test firestore_integration
//!
//! The emulator provides a clean state for each test run.

use suzumina_api::db::{ButtonOrder, ReactionKind};
use suzumina_api::error::AppError;
use suzumina_api::models::{
    Contact, ContactCategory, ContactPriority, ContactStatus, Favorite, UserRole,
};
use suzumina_api::search::Catalog;

mod common;
use common::{button, test_db, user, video};

/// Unique suffix for test isolation.
fn unique_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

// ═══════════════════════════════════════════════════════════════════════════
// AUDIO BUTTON TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_button_upsert_and_get() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id("btn");

    assert!(db.get_button(&id).await.unwrap().is_none());

    db.upsert_button(&button(&id, "おはよう", &["挨拶"]))
        .await
        .unwrap();

    let stored = db.get_button(&id).await.unwrap().expect("button stored");
    assert_eq!(stored.title, "おはよう");
    assert_eq!(stored.tags, vec!["挨拶"]);
}

#[tokio::test]
async fn test_play_count_increments() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id("btn");
    db.upsert_button(&button(&id, "play me", &[])).await.unwrap();

    assert_eq!(db.increment_play_count(&id).await.unwrap(), 1);
    assert_eq!(db.increment_play_count(&id).await.unwrap(), 2);
    assert_eq!(db.get_button(&id).await.unwrap().unwrap().play_count, 2);
}

#[tokio::test]
async fn test_play_count_missing_button() {
    require_emulator!();

    let db = test_db().await;

    let result = db.increment_play_count(&unique_id("missing")).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_like_toggle_adjusts_count() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id("btn");
    db.upsert_button(&button(&id, "like me", &[])).await.unwrap();

    let on = db.toggle_reaction(ReactionKind::Like, "u1", &id).await.unwrap();
    assert!(on.active);
    assert_eq!(on.count, 1);

    let second = db.toggle_reaction(ReactionKind::Like, "u2", &id).await.unwrap();
    assert_eq!(second.count, 2);

    let off = db.toggle_reaction(ReactionKind::Like, "u1", &id).await.unwrap();
    assert!(!off.active);
    assert_eq!(off.count, 1);

    assert_eq!(db.get_button(&id).await.unwrap().unwrap().like_count, 1);
}

#[tokio::test]
async fn test_favorite_blocks_button_delete_check() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id("btn");
    db.upsert_button(&button(&id, "keep me", &[])).await.unwrap();

    assert!(!db.has_favorites_for_button(&id).await.unwrap());

    let fav = db
        .toggle_reaction(ReactionKind::Favorite, "u1", &id)
        .await
        .unwrap();
    assert!(fav.active);
    assert!(db.has_favorites_for_button(&id).await.unwrap());

    db.toggle_reaction(ReactionKind::Favorite, "u1", &id)
        .await
        .unwrap();
    assert!(!db.has_favorites_for_button(&id).await.unwrap());
}

#[tokio::test]
async fn test_delete_button_removes_likes() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id("btn");
    db.upsert_button(&button(&id, "delete me", &[])).await.unwrap();
    db.toggle_reaction(ReactionKind::Like, "u1", &id).await.unwrap();
    db.toggle_reaction(ReactionKind::Like, "u2", &id).await.unwrap();

    let deleted = db.delete_button(&id).await.unwrap();

    assert_eq!(deleted, 3);
    assert!(db.get_button(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_like_toggles_keep_count_consistent() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id("btn");
    db.upsert_button(&button(&id, "contended", &[])).await.unwrap();

    // u1 and u3 end up liking; u2 toggles on then off
    let (a, b, c, d) = tokio::join!(
        db.toggle_reaction(ReactionKind::Like, "u1", &id),
        db.toggle_reaction(ReactionKind::Like, "u2", &id),
        db.toggle_reaction(ReactionKind::Like, "u3", &id),
        db.toggle_reaction(ReactionKind::Like, "u2", &id),
    );
    for outcome in [a, b, c, d] {
        outcome.unwrap();
    }

    let stored = db.get_button(&id).await.unwrap().unwrap();
    let likes = db.count_reactions(ReactionKind::Like, &id).await.unwrap();
    assert_eq!(likes, 2);
    assert_eq!(stored.like_count, likes as u64);
}

#[tokio::test]
async fn test_concurrent_plays_are_all_counted() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id("btn");
    db.upsert_button(&button(&id, "hot", &[])).await.unwrap();

    let (a, b, c) = tokio::join!(
        db.increment_play_count(&id),
        db.increment_play_count(&id),
        db.increment_play_count(&id),
    );
    let mut seen = vec![a.unwrap(), b.unwrap(), c.unwrap()];
    seen.sort_unstable();

    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(db.get_button(&id).await.unwrap().unwrap().play_count, 3);
}

#[tokio::test]
async fn test_create_button_updates_video() {
    require_emulator!();

    let db = test_db().await;
    let video_id = unique_id("vid");
    db.upsert_video(&video(&video_id, "朝活配信")).await.unwrap();

    let mut clip = button(&unique_id("btn"), "おはよう", &[]);
    clip.source_video_id = video_id.clone();
    clip.uploaded_by = unique_id("creator");

    let created = db
        .create_button(&clip, "2000-01-01T00:00:00Z", 20)
        .await
        .unwrap();

    assert_eq!(created.source_video_title.as_deref(), Some("朝活配信"));
    let stored = db.get_button(&clip.id).await.unwrap().expect("button stored");
    assert_eq!(stored.source_video_title.as_deref(), Some("朝活配信"));
    assert_eq!(
        db.get_video(&video_id).await.unwrap().unwrap().audio_button_count,
        1
    );

    db.delete_button(&clip.id).await.unwrap();
    assert_eq!(
        db.get_video(&video_id).await.unwrap().unwrap().audio_button_count,
        0
    );
}

#[tokio::test]
async fn test_create_button_missing_video() {
    require_emulator!();

    let db = test_db().await;
    let mut clip = button(&unique_id("btn"), "orphan", &[]);
    clip.source_video_id = unique_id("nope");

    let result = db.create_button(&clip, "2000-01-01T00:00:00Z", 20).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert!(db.get_button(&clip.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_button_rate_limited() {
    require_emulator!();

    let db = test_db().await;
    let video_id = unique_id("vid");
    db.upsert_video(&video(&video_id, "歌枠")).await.unwrap();
    let creator = unique_id("creator");

    let make = |n: usize| {
        let mut clip = button(&unique_id(&format!("btn{}", n)), "clip", &[]);
        clip.source_video_id = video_id.clone();
        clip.uploaded_by = creator.clone();
        clip.created_at = "2026-04-01T00:00:00Z".to_string();
        clip
    };

    db.create_button(&make(0), "2026-03-31T00:00:00Z", 2).await.unwrap();
    db.create_button(&make(1), "2026-03-31T00:00:00Z", 2).await.unwrap();
    let third = make(2);
    let result = db.create_button(&third, "2026-03-31T00:00:00Z", 2).await;

    assert!(matches!(result, Err(AppError::RateLimited(_))));
    assert!(db.get_button(&third.id).await.unwrap().is_none());
    assert_eq!(
        db.get_video(&video_id).await.unwrap().unwrap().audio_button_count,
        2
    );

    // Older buttons fall out of the window
    db.create_button(&third, "2026-04-02T00:00:00Z", 2).await.unwrap();
}

#[tokio::test]
async fn test_public_list_filters_by_video_and_visibility() {
    require_emulator!();

    let db = test_db().await;
    let video_id = unique_id("vid");

    let mut quiet = button(&unique_id("quiet"), "quiet", &[]);
    quiet.source_video_id = video_id.clone();
    quiet.play_count = 1;
    let mut loud = button(&unique_id("loud"), "loud", &[]);
    loud.source_video_id = video_id.clone();
    loud.play_count = 50;
    let mut hidden = button(&unique_id("hidden"), "hidden", &[]);
    hidden.source_video_id = video_id.clone();
    hidden.is_public = false;
    for b in [&quiet, &loud, &hidden] {
        db.upsert_button(b).await.unwrap();
    }

    let listed = db
        .list_public_buttons(Some(&video_id), ButtonOrder::MostPlayed, 10, 0)
        .await
        .unwrap();

    let ids: Vec<&str> = listed.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec![loud.id.as_str(), quiet.id.as_str()]);
}

#[tokio::test]
async fn test_catalog_returns_only_public_buttons() {
    require_emulator!();

    let db = test_db().await;
    let public_id = unique_id("pub");
    let private_id = unique_id("priv");

    let mut public = button(&public_id, "public", &[]);
    public.created_at = "2099-01-01T00:00:00Z".to_string();
    let mut private = button(&private_id, "private", &[]);
    private.is_public = false;
    private.created_at = "2099-01-01T00:00:00Z".to_string();
    db.upsert_button(&public).await.unwrap();
    db.upsert_button(&private).await.unwrap();

    let recent = db.recent_public_buttons(50).await.unwrap();

    assert!(recent.iter().any(|b| b.id == public_id));
    assert!(recent.iter().all(|b| b.is_public));
}

// ═══════════════════════════════════════════════════════════════════════════
// VIDEO TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_video_referenced_by_button() {
    require_emulator!();

    let db = test_db().await;
    let video_id = unique_id("vid");
    db.upsert_video(&video(&video_id, "歌枠")).await.unwrap();

    assert!(!db.has_buttons_for_video(&video_id).await.unwrap());

    let mut clip = button(&unique_id("btn"), "clip", &[]);
    clip.source_video_id = video_id.clone();
    db.upsert_button(&clip).await.unwrap();

    assert!(db.has_buttons_for_video(&video_id).await.unwrap());
}

#[tokio::test]
async fn test_upsert_videos_batch() {
    require_emulator!();

    let db = test_db().await;
    let videos: Vec<_> = (0..5)
        .map(|i| video(&unique_id(&format!("vid{}", i)), "batch"))
        .collect();

    db.upsert_videos(&videos).await.unwrap();

    for v in &videos {
        assert!(db.get_video(&v.id).await.unwrap().is_some());
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER & CONTACT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_list_users_by_role() {
    require_emulator!();

    let db = test_db().await;
    let admin_id = unique_id("admin");
    db.upsert_user(&user(&admin_id, UserRole::Admin)).await.unwrap();
    db.upsert_user(&user(&unique_id("member"), UserRole::Member))
        .await
        .unwrap();

    let admins = db.list_users(Some(UserRole::Admin), 100, 0).await.unwrap();

    assert!(admins.iter().any(|u| u.discord_id == admin_id));
    assert!(admins.iter().all(|u| u.role == UserRole::Admin));
}

#[tokio::test]
async fn test_contact_lifecycle() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id("contact");
    let now = chrono::Utc::now().to_rfc3339();
    let contact = Contact {
        id: id.clone(),
        category: ContactCategory::Feature,
        subject: "要望".to_string(),
        content: "検索にタグ絞り込みが欲しいです".to_string(),
        email: None,
        ip_address: "203.0.113.7".to_string(),
        user_agent: "test".to_string(),
        status: ContactStatus::New,
        priority: ContactPriority::Medium,
        admin_note: None,
        handled_by: None,
        created_at: now.clone(),
        updated_at: now,
    };

    db.upsert_contact(&contact).await.unwrap();
    let new = db
        .list_contacts(Some(ContactStatus::New), 100, 0)
        .await
        .unwrap();
    assert!(new.iter().any(|c| c.id == id));

    db.delete_contact(&id).await.unwrap();
    assert!(db.get_contact(&id).await.unwrap().is_none());
}

#[test]
fn test_favorite_serializes_camel_case() {
    let favorite = Favorite {
        user_id: "1".to_string(),
        audio_button_id: "b".to_string(),
        added_at: "2026-01-01T00:00:00Z".to_string(),
    };
    let json = serde_json::to_value(&favorite).unwrap();
    assert_eq!(json["audioButtonId"], "b");
    assert_eq!(json["addedAt"], "2026-01-01T00:00:00Z");
}
