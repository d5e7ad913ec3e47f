// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.
//!
//! Verification fails closed: a missing token, a bad signature, an expired
//! token or a token without a subject all end the request as unauthorized.

use crate::error::AppError;
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

/// Cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "imagify_token";

/// Header the web client sends the token in.
pub const TOKEN_HEADER: &str = "token";

const TOKEN_LIFETIME_SECS: usize = 30 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    #[serde(default)]
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&jar, request.headers()).ok_or(AppError::Unauthorized)?;
    let user_id = verify_jwt(&token, &state.config.jwt_signing_key)?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// Token from the cookie, the `token` header, or a bearer header, in that order.
fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    if let Some(token) = headers.get(TOKEN_HEADER).and_then(|h| h.to_str().ok()) {
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Verify a token and return the user id it asserts.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Result<String, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

    if token_data.claims.sub.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(token_data.claims.sub)
}

/// Create a JWT for a user session.
pub fn create_jwt(user_id: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

    #[test]
    fn test_create_then_verify() {
        let token = create_jwt("user_abc", KEY).unwrap();
        assert_eq!(verify_jwt(&token, KEY).unwrap(), "user_abc");
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = create_jwt("user_abc", KEY).unwrap();
        assert!(matches!(
            verify_jwt(&token, b"another_key"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_empty_subject_rejected() {
        let token = create_jwt("", KEY).unwrap();
        assert!(matches!(verify_jwt(&token, KEY), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_token_header_preferred_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, "from-token-header".parse().unwrap());
        headers.insert(header::AUTHORIZATION, "Bearer from-bearer".parse().unwrap());

        let token = extract_token(&CookieJar::new(), &headers);
        assert_eq!(token.as_deref(), Some("from-token-header"));

        headers.remove(TOKEN_HEADER);
        let token = extract_token(&CookieJar::new(), &headers);
        assert_eq!(token.as_deref(), Some("from-bearer"));
    }
}
