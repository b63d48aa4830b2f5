//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Site role, in increasing privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Member,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Member => "member",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(UserRole::Member),
            "moderator" => Ok(UserRole::Moderator),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// User profile stored in Firestore. Created on first Discord sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Discord user ID (also used as document ID)
    pub discord_id: String,
    pub username: String,
    pub display_name: String,
    /// Avatar URL
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: String,
}

fn default_active() -> bool {
    true
}
