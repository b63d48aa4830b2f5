// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.
//!
//! Sessions are issued by the sign-in flow as HS256 JWTs carrying the
//! Discord ID and site role. This module only verifies them.

use crate::error::AppError;
use crate::models::UserRole;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie set by the frontend.
pub const SESSION_COOKIE: &str = "suzumina_token";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (Discord user ID)
    pub sub: String,
    /// Site role at sign-in
    #[serde(default)]
    pub role: UserRole,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub discord_id: String,
    pub role: UserRole,
}

/// Session token from the cookie, falling back to a Bearer header.
fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Decode and validate a session token.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Result<AuthUser, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        AppError::InvalidToken
    })?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(AppError::InvalidToken);
    }

    Ok(AuthUser {
        discord_id: token_data.claims.sub,
        role: token_data.claims.role,
    })
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&jar, request.headers()).ok_or(AppError::Unauthorized)?;
    let auth_user = verify_jwt(&token, &state.config.jwt_signing_key)?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Middleware that requires an admin session. Layer inside `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(AppError::Unauthorized)?;

    if !user.role.is_admin() {
        tracing::warn!(discord_id = %user.discord_id, role = ?user.role, "Admin route denied");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
