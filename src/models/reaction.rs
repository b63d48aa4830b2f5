// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user reactions to audio buttons (`favorites`, `likes`).

use serde::{Deserialize, Serialize};

/// A user's favorite of an audio button.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub user_id: String,
    pub audio_button_id: String,
    pub added_at: String,
}

/// A user's like of an audio button.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub user_id: String,
    pub audio_button_id: String,
    pub liked_at: String,
}

/// Document ID for a user/button reaction pair.
///
/// Both halves are URL-encoded; Firestore document IDs may not contain `/`.
pub fn reaction_doc_id(user_id: &str, audio_button_id: &str) -> String {
    format!(
        "{}_{}",
        urlencoding::encode(user_id),
        urlencoding::encode(audio_button_id)
    )
}
