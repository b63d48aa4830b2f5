// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT session token tests.
//!
//! Tokens are issued by the Discord sign-in flow on the frontend; these
//! tests pin the claim format the middleware accepts.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use suzumina_api::error::AppError;
use suzumina_api::middleware::auth::verify_jwt;
use suzumina_api::models::UserRole;

mod common;
use common::create_jwt;

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

/// Claims structure that must match what the middleware expects.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    exp: usize,
    iat: usize,
}

fn now() -> usize {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

fn sign(claims: &Claims) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .expect("Failed to create JWT")
}

#[test]
fn test_jwt_roundtrip() {
    let token = create_jwt("123456789012345678", UserRole::Admin, SIGNING_KEY);

    let user = verify_jwt(&token, SIGNING_KEY).expect("token should verify");

    assert_eq!(user.discord_id, "123456789012345678");
    assert_eq!(user.role, UserRole::Admin);
}

#[test]
fn test_role_claim_is_parsed() {
    for (raw, expected) in [
        ("admin", UserRole::Admin),
        ("moderator", UserRole::Moderator),
        ("member", UserRole::Member),
    ] {
        let token = sign(&Claims {
            sub: "42".to_string(),
            role: Some(raw.to_string()),
            exp: now() + 3600,
            iat: now(),
        });

        assert_eq!(verify_jwt(&token, SIGNING_KEY).unwrap().role, expected);
    }
}

#[test]
fn test_unknown_role_is_rejected() {
    let token = sign(&Claims {
        sub: "42".to_string(),
        role: Some("owner".to_string()),
        exp: now() + 3600,
        iat: now(),
    });

    assert!(matches!(
        verify_jwt(&token, SIGNING_KEY),
        Err(AppError::InvalidToken)
    ));
}

#[test]
fn test_missing_role_defaults_to_member() {
    let token = sign(&Claims {
        sub: "7".to_string(),
        role: None,
        exp: now() + 3600,
        iat: now(),
    });

    let user = verify_jwt(&token, SIGNING_KEY).unwrap();
    assert_eq!(user.role, UserRole::Member);
}

#[test]
fn test_wrong_key_is_rejected() {
    let token = create_jwt("7", UserRole::Admin, b"another_key_that_is_32_bytes!!!!");

    assert!(matches!(
        verify_jwt(&token, SIGNING_KEY),
        Err(AppError::InvalidToken)
    ));
}

#[test]
fn test_expired_token_is_rejected() {
    let token = sign(&Claims {
        sub: "7".to_string(),
        role: Some("admin".to_string()),
        exp: now() - 3600,
        iat: now() - 7200,
    });

    assert!(matches!(
        verify_jwt(&token, SIGNING_KEY),
        Err(AppError::InvalidToken)
    ));
}

#[test]
fn test_empty_subject_is_rejected() {
    let token = sign(&Claims {
        sub: " ".to_string(),
        role: None,
        exp: now() + 3600,
        iat: now(),
    });

    assert!(matches!(
        verify_jwt(&token, SIGNING_KEY),
        Err(AppError::InvalidToken)
    ));
}
