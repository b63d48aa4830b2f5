//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{ButtonOrder, FirestoreDb, ReactionKind, ReactionToggle};

/// Collection names as constants.
pub mod collections {
    pub const AUDIO_BUTTONS: &str = "audioButtons";
    pub const VIDEOS: &str = "videos";
    /// DLsite works
    pub const WORKS: &str = "dlsiteWorks";
    /// User profiles (keyed by Discord ID)
    pub const USERS: &str = "users";
    pub const CONTACTS: &str = "contacts";
    /// Keyed by `{userId}_{audioButtonId}`
    pub const FAVORITES: &str = "favorites";
    /// Keyed by `{userId}_{audioButtonId}`
    pub const LIKES: &str = "likes";
}
