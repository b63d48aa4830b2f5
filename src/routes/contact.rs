// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public contact form.

use crate::error::{AppError, Result};
use crate::extractors::ValidatedJson;
use crate::models::{Contact, ContactCategory, ContactPriority, ContactStatus};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/contact", post(submit_contact))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub category: ContactCategory,
    #[validate(length(min = 1, max = 100, message = "subject must be 1-100 characters"))]
    pub subject: String,
    #[validate(length(min = 10, max = 2000, message = "content must be 10-2000 characters"))]
    pub content: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email(message = "email is not a valid address"))]
    pub email: Option<String>,
}

/// Forms submit an untouched email input as `""`.
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[derive(Serialize)]
struct ContactCreated {
    id: String,
}

/// First hop of `x-forwarded-for`, as set by the load balancer.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|ua| !ua.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

async fn submit_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactCreated>)> {
    let subject = request.subject.trim();
    if subject.is_empty() {
        return Err(AppError::BadRequest(
            "subject must be 1-100 characters".to_string(),
        ));
    }

    let now = now_rfc3339();
    let contact = Contact {
        id: uuid::Uuid::new_v4().to_string(),
        category: request.category,
        subject: subject.to_string(),
        content: request.content,
        email: request.email,
        ip_address: client_ip(&headers),
        user_agent: user_agent(&headers),
        status: ContactStatus::New,
        priority: ContactPriority::Medium,
        admin_note: None,
        handled_by: None,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.upsert_contact(&contact).await?;

    tracing::info!(
        contact_id = %contact.id,
        category = ?contact.category,
        "Contact submitted"
    );

    Ok((StatusCode::CREATED, Json(ContactCreated { id: contact.id })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers), "203.0.113.7");
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn test_empty_email_is_none() {
        let request: ContactRequest = serde_json::from_str(
            r#"{"category":"bug","subject":"s","content":"0123456789","email":""}"#,
        )
        .unwrap();
        assert_eq!(request.email, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_invalid_email_fails_validation() {
        let request: ContactRequest = serde_json::from_str(
            r#"{"category":"bug","subject":"s","content":"0123456789","email":"nope"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_short_content_fails_validation() {
        let request: ContactRequest =
            serde_json::from_str(r#"{"category":"other","subject":"s","content":"short"}"#)
                .unwrap();
        assert!(request.validate().is_err());
    }
}
