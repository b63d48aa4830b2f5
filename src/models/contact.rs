// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contact form submissions (`contacts`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactCategory {
    Bug,
    Feature,
    Usage,
    Other,
}

/// Triage state of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Reviewing,
    Resolved,
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ContactStatus::New),
            "reviewing" => Ok(ContactStatus::Reviewing),
            "resolved" => Ok(ContactStatus::Resolved),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Reviewing => "reviewing",
            ContactStatus::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPriority {
    Low,
    Medium,
    High,
}

/// Stored contact record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub category: ContactCategory,
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub email: Option<String>,
    pub ip_address: String,
    pub user_agent: String,
    pub status: ContactStatus,
    pub priority: ContactPriority,
    #[serde(default)]
    pub admin_note: Option<String>,
    /// Discord ID of the admin who last handled it
    #[serde(default)]
    pub handled_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Contact counts for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
    pub total: u32,
    pub new: u32,
    pub reviewing: u32,
    pub resolved: u32,
    pub high_priority: u32,
}

impl ContactStats {
    pub fn from_contacts<'a>(contacts: impl IntoIterator<Item = &'a Contact>) -> Self {
        let mut stats = Self::default();
        for contact in contacts {
            stats.total += 1;
            match contact.status {
                ContactStatus::New => stats.new += 1,
                ContactStatus::Reviewing => stats.reviewing += 1,
                ContactStatus::Resolved => stats.resolved += 1,
            }
            if contact.priority == ContactPriority::High {
                stats.high_priority += 1;
            }
        }
        stats
    }
}
