// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Audio buttons (admin CRUD, play counts, reactions)
//! - Videos and DLsite works (admin CRUD, YouTube sync)
//! - Users and contacts (admin CRUD)
//! - Recent-document scans backing search and stats

use crate::db::collections;
use crate::error::AppError;
use crate::models::reaction::reaction_doc_id;
use crate::models::{AudioButton, Contact, ContactStatus, Favorite, Like, User, UserRole, Video, Work};
use crate::search::Catalog;
use crate::time_utils::now_rfc3339;
use async_trait::async_trait;
use futures_util::{stream, FutureExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Upper bound on documents read for in-memory aggregates.
pub const MAX_SCAN_DOCS: u32 = 1000;

/// Which per-user reaction collection to toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Favorite,
}

impl ReactionKind {
    fn collection(self) -> &'static str {
        match self {
            ReactionKind::Like => collections::LIKES,
            ReactionKind::Favorite => collections::FAVORITES,
        }
    }
}

/// Ordering for the public button list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonOrder {
    #[default]
    Newest,
    Oldest,
    /// Most liked
    Popular,
    MostPlayed,
}

impl ButtonOrder {
    fn field(self) -> (&'static str, firestore::FirestoreQueryDirection) {
        use firestore::FirestoreQueryDirection::{Ascending, Descending};
        match self {
            ButtonOrder::Newest => ("createdAt", Descending),
            ButtonOrder::Oldest => ("createdAt", Ascending),
            ButtonOrder::Popular => ("likeCount", Descending),
            ButtonOrder::MostPlayed => ("playCount", Descending),
        }
    }
}

impl std::str::FromStr for ButtonOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(ButtonOrder::Newest),
            "oldest" => Ok(ButtonOrder::Oldest),
            "popular" => Ok(ButtonOrder::Popular),
            "mostPlayed" => Ok(ButtonOrder::MostPlayed),
            other => Err(AppError::BadRequest(format!("Invalid sortBy '{}'", other))),
        }
    }
}

enum ButtonCreation {
    Created(Box<AudioButton>),
    RateLimited,
    VideoMissing,
}

/// Outcome of a like/favorite toggle.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionToggle {
    /// Whether the reaction exists after the toggle
    pub active: bool,
    /// Updated counter on the audio button
    pub count: u64,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic Document Helpers ────────────────────────────────

    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn put_doc<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_doc(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Page through a collection, newest first by `order_field`.
    async fn list_docs<T>(
        &self,
        collection: &str,
        order_field: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .order_by([(order_field, firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Audio Button Operations ─────────────────────────────────

    pub async fn get_button(&self, id: &str) -> Result<Option<AudioButton>, AppError> {
        self.get_doc(collections::AUDIO_BUTTONS, id).await
    }

    pub async fn list_buttons(&self, limit: u32, offset: u32) -> Result<Vec<AudioButton>, AppError> {
        self.list_docs(collections::AUDIO_BUTTONS, "createdAt", limit, offset)
            .await
    }

    pub async fn upsert_button(&self, button: &AudioButton) -> Result<(), AppError> {
        self.put_doc(collections::AUDIO_BUTTONS, &button.id, button)
            .await
    }

    /// Whether any user has favorited the button.
    pub async fn has_favorites_for_button(&self, button_id: &str) -> Result<bool, AppError> {
        let favorites: Vec<Favorite> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::FAVORITES)
            .filter(|q| q.for_all([q.field("audioButtonId").eq(button_id)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(!favorites.is_empty())
    }

    /// Delete a button and the likes pointing at it.
    ///
    /// Callers must check favorites first; those block deletion. The source
    /// video's `audioButtonCount` drops by one in the same transaction that
    /// removes the button.
    pub async fn delete_button(&self, button_id: &str) -> Result<usize, AppError> {
        let likes: Vec<Like> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::LIKES)
            .filter(|q| q.for_all([q.field("audioButtonId").eq(button_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let count = likes.len();
        self.batch_delete(&likes, collections::LIKES, |like: &Like| {
            reaction_doc_id(&like.user_id, &like.audio_button_id)
        })
        .await?;

        let owned_id = button_id.to_string();
        let source_video = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let button_id = owned_id.clone();
                async move {
                    let button: Option<AudioButton> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::AUDIO_BUTTONS)
                        .obj()
                        .one(&button_id)
                        .await?;
                    let Some(button) = button else {
                        return Ok(None);
                    };

                    let video: Option<Video> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::VIDEOS)
                        .obj()
                        .one(&button.source_video_id)
                        .await?;
                    if let Some(mut video) = video {
                        video.audio_button_count = video.audio_button_count.saturating_sub(1);
                        db.fluent()
                            .update()
                            .in_col(collections::VIDEOS)
                            .document_id(&video.id)
                            .object(&video)
                            .add_to_transaction(transaction)?;
                    }

                    db.fluent()
                        .delete()
                        .from(collections::AUDIO_BUTTONS)
                        .document_id(&button_id)
                        .add_to_transaction(transaction)?;

                    Ok(Some(button.source_video_id))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Button deletion failed: {}", e)))?;

        tracing::info!(
            button_id,
            source_video = ?source_video,
            likes_deleted = count,
            "Audio button deleted"
        );
        Ok(count + 1)
    }

    /// Public buttons, optionally from one video, in `order` and paged.
    pub async fn list_public_buttons(
        &self,
        video_id: Option<&str>,
        order: ButtonOrder,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<AudioButton>, AppError> {
        let (field, direction) = order.field();
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::AUDIO_BUTTONS);

        let query = match video_id {
            Some(video_id) => query.filter(move |q| {
                q.for_all([
                    q.field("isPublic").eq(true),
                    q.field("sourceVideoId").eq(video_id),
                ])
            }),
            None => query.filter(|q| q.for_all([q.field("isPublic").eq(true)])),
        };

        query
            .order_by([(field, direction)])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a new button and bump the source video's `audioButtonCount`.
    ///
    /// The creator's buttons since `since` are counted inside the same
    /// transaction, so parallel submissions can't both slip under
    /// `max_recent`. `sourceVideoTitle` is filled from the stored video.
    pub async fn create_button(
        &self,
        button: &AudioButton,
        since: &str,
        max_recent: u32,
    ) -> Result<AudioButton, AppError> {
        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let mut button = button.clone();
                let since = since.to_string();
                async move {
                    let recent: Vec<AudioButton> = db
                        .fluent()
                        .select()
                        .from(collections::AUDIO_BUTTONS)
                        .filter(|q| {
                            q.for_all([
                                q.field("uploadedBy").eq(button.uploaded_by.as_str()),
                                q.field("createdAt").greater_than_or_equal(since.as_str()),
                            ])
                        })
                        .limit(max_recent)
                        .obj()
                        .query()
                        .await?;
                    if recent.len() >= max_recent as usize {
                        return Ok(ButtonCreation::RateLimited);
                    }

                    let video: Option<Video> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::VIDEOS)
                        .obj()
                        .one(&button.source_video_id)
                        .await?;
                    let Some(mut video) = video else {
                        return Ok(ButtonCreation::VideoMissing);
                    };

                    video.audio_button_count += 1;
                    button.source_video_title = Some(video.title.clone());

                    db.fluent()
                        .update()
                        .in_col(collections::VIDEOS)
                        .document_id(&video.id)
                        .object(&video)
                        .add_to_transaction(transaction)?;
                    db.fluent()
                        .update()
                        .in_col(collections::AUDIO_BUTTONS)
                        .document_id(&button.id)
                        .object(&button)
                        .add_to_transaction(transaction)?;

                    Ok(ButtonCreation::Created(Box::new(button)))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Button creation failed: {}", e)))?;

        match outcome {
            ButtonCreation::Created(button) => {
                tracing::info!(
                    button_id = %button.id,
                    video_id = %button.source_video_id,
                    uploaded_by = %button.uploaded_by,
                    "Audio button created"
                );
                Ok(*button)
            }
            ButtonCreation::RateLimited => Err(AppError::RateLimited(format!(
                "at most {} buttons per 24 hours",
                max_recent
            ))),
            ButtonCreation::VideoMissing => Err(AppError::BadRequest(format!(
                "source video {} not found",
                button.source_video_id
            ))),
        }
    }

    /// Atomically bump `playCount`. Returns the new count.
    pub async fn increment_play_count(&self, button_id: &str) -> Result<u64, AppError> {
        let owned_id = button_id.to_string();

        let play_count = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let button_id = owned_id.clone();
                async move {
                    let button: Option<AudioButton> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::AUDIO_BUTTONS)
                        .obj()
                        .one(&button_id)
                        .await?;
                    let Some(mut button) = button else {
                        return Ok(None);
                    };
                    button.play_count += 1;

                    db.fluent()
                        .update()
                        .in_col(collections::AUDIO_BUTTONS)
                        .document_id(&button_id)
                        .object(&button)
                        .add_to_transaction(transaction)?;

                    Ok(Some(button.play_count))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Play count transaction failed: {}", e)))?;

        play_count.ok_or_else(|| AppError::NotFound(format!("audio button {}", button_id)))
    }

    /// Toggle a like or favorite and adjust the button's counter together.
    ///
    /// Both documents are read through the transaction, so a conflicting
    /// toggle aborts the commit and the whole read-modify-write is retried.
    pub async fn toggle_reaction(
        &self,
        kind: ReactionKind,
        user_id: &str,
        button_id: &str,
    ) -> Result<ReactionToggle, AppError> {
        let owned_user = user_id.to_string();
        let owned_button = button_id.to_string();
        let collection = kind.collection();

        let toggled = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let user_id = owned_user.clone();
                let button_id = owned_button.clone();
                async move {
                    let button: Option<AudioButton> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::AUDIO_BUTTONS)
                        .obj()
                        .one(&button_id)
                        .await?;
                    let Some(mut button) = button else {
                        return Ok(None);
                    };

                    let doc_id = reaction_doc_id(&user_id, &button_id);
                    let exists = match kind {
                        ReactionKind::Like => db
                            .fluent()
                            .select()
                            .by_id_in(collection)
                            .obj::<Like>()
                            .one(&doc_id)
                            .await?
                            .is_some(),
                        ReactionKind::Favorite => db
                            .fluent()
                            .select()
                            .by_id_in(collection)
                            .obj::<Favorite>()
                            .one(&doc_id)
                            .await?
                            .is_some(),
                    };

                    let counter = match kind {
                        ReactionKind::Like => &mut button.like_count,
                        ReactionKind::Favorite => &mut button.favorite_count,
                    };

                    if exists {
                        *counter = counter.saturating_sub(1);
                        db.fluent()
                            .delete()
                            .from(collection)
                            .document_id(&doc_id)
                            .add_to_transaction(transaction)?;
                    } else {
                        *counter += 1;
                        let now = now_rfc3339();
                        match kind {
                            ReactionKind::Like => {
                                db.fluent()
                                    .update()
                                    .in_col(collection)
                                    .document_id(&doc_id)
                                    .object(&Like {
                                        user_id: user_id.clone(),
                                        audio_button_id: button_id.clone(),
                                        liked_at: now,
                                    })
                                    .add_to_transaction(transaction)?;
                            }
                            ReactionKind::Favorite => {
                                db.fluent()
                                    .update()
                                    .in_col(collection)
                                    .document_id(&doc_id)
                                    .object(&Favorite {
                                        user_id: user_id.clone(),
                                        audio_button_id: button_id.clone(),
                                        added_at: now,
                                    })
                                    .add_to_transaction(transaction)?;
                            }
                        }
                    }
                    let count = *counter;

                    db.fluent()
                        .update()
                        .in_col(collections::AUDIO_BUTTONS)
                        .document_id(&button_id)
                        .object(&button)
                        .add_to_transaction(transaction)?;

                    Ok(Some(ReactionToggle {
                        active: !exists,
                        count,
                    }))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Reaction transaction failed: {}", e)))?;

        let toggled =
            toggled.ok_or_else(|| AppError::NotFound(format!("audio button {}", button_id)))?;

        tracing::debug!(
            user_id,
            button_id,
            kind = ?kind,
            active = toggled.active,
            count = toggled.count,
            "Reaction toggled"
        );

        Ok(toggled)
    }

    /// Number of reaction documents of `kind` pointing at a button.
    pub async fn count_reactions(
        &self,
        kind: ReactionKind,
        button_id: &str,
    ) -> Result<usize, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(kind.collection())
            .filter(|q| q.for_all([q.field("audioButtonId").eq(button_id)]));

        let count = match kind {
            ReactionKind::Like => query.obj::<Like>().query().await.map(|docs| docs.len()),
            ReactionKind::Favorite => query.obj::<Favorite>().query().await.map(|docs| docs.len()),
        };
        count.map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Video Operations ────────────────────────────────────────

    pub async fn get_video(&self, id: &str) -> Result<Option<Video>, AppError> {
        self.get_doc(collections::VIDEOS, id).await
    }

    pub async fn list_videos(&self, limit: u32, offset: u32) -> Result<Vec<Video>, AppError> {
        self.list_docs(collections::VIDEOS, "publishedAt", limit, offset)
            .await
    }

    pub async fn upsert_video(&self, video: &Video) -> Result<(), AppError> {
        self.put_doc(collections::VIDEOS, &video.id, video).await
    }

    /// Store multiple videos with bounded concurrency.
    pub async fn upsert_videos(&self, videos: &[Video]) -> Result<(), AppError> {
        let writes: Vec<_> = videos.iter().map(|video| self.upsert_video(video)).collect();
        stream::iter(writes)
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(())
    }

    /// Whether any audio button was cut from the video.
    pub async fn has_buttons_for_video(&self, video_id: &str) -> Result<bool, AppError> {
        let buttons: Vec<AudioButton> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::AUDIO_BUTTONS)
            .filter(|q| q.for_all([q.field("sourceVideoId").eq(video_id)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(!buttons.is_empty())
    }

    pub async fn delete_video(&self, id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::VIDEOS, id).await
    }

    // ─── Work Operations ─────────────────────────────────────────

    pub async fn get_work(&self, id: &str) -> Result<Option<Work>, AppError> {
        self.get_doc(collections::WORKS, id).await
    }

    pub async fn list_works(&self, limit: u32, offset: u32) -> Result<Vec<Work>, AppError> {
        self.list_docs(collections::WORKS, "createdAt", limit, offset)
            .await
    }

    pub async fn upsert_work(&self, work: &Work) -> Result<(), AppError> {
        self.put_doc(collections::WORKS, &work.id, work).await
    }

    pub async fn delete_work(&self, id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::WORKS, id).await
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by Discord ID.
    pub async fn get_user(&self, discord_id: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, discord_id).await
    }

    pub async fn list_users(
        &self,
        role: Option<UserRole>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<User>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS);

        let query = if let Some(role) = role {
            query.filter(move |q| q.for_all([q.field("role").eq(role.as_str())]))
        } else {
            query
        };

        query
            .order_by([("createdAt", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.put_doc(collections::USERS, &user.discord_id, user)
            .await
    }

    // ─── Contact Operations ──────────────────────────────────────

    pub async fn get_contact(&self, id: &str) -> Result<Option<Contact>, AppError> {
        self.get_doc(collections::CONTACTS, id).await
    }

    pub async fn list_contacts(
        &self,
        status: Option<ContactStatus>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Contact>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::CONTACTS);

        let query = if let Some(status) = status {
            query.filter(move |q| q.for_all([q.field("status").eq(status.as_str())]))
        } else {
            query
        };

        query
            .order_by([("createdAt", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn upsert_contact(&self, contact: &Contact) -> Result<(), AppError> {
        self.put_doc(collections::CONTACTS, &contact.id, contact)
            .await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::CONTACTS, id).await
    }

    // ─── Helper Methods ──────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}

#[async_trait]
impl Catalog for FirestoreDb {
    async fn recent_public_buttons(&self, limit: u32) -> Result<Vec<AudioButton>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::AUDIO_BUTTONS)
            .filter(|q| q.for_all([q.field("isPublic").eq(true)]))
            .order_by([("createdAt", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn most_played_buttons(&self, limit: u32) -> Result<Vec<AudioButton>, AppError> {
        self.list_public_buttons(None, ButtonOrder::MostPlayed, limit, 0)
            .await
    }

    async fn recent_videos(&self, limit: u32) -> Result<Vec<Video>, AppError> {
        self.list_videos(limit, 0).await
    }

    async fn recent_works(&self, limit: u32) -> Result<Vec<Work>, AppError> {
        self.list_works(limit, 0).await
    }
}
