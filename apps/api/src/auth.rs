//! Session token service.
//!
//! Issues and verifies bearer tokens. A token is an HS256-signed JWT
//! carrying `{user_id, iat, exp}`, and it is only honored while the raw
//! token string is present in the in-process [`TokenRegistry`] - the
//! signature proves authenticity, the registry provides revocation.
//!
//! Verification order is fixed and observable:
//! 1. unknown to the registry          → `Unknown`
//! 2. undecodable / missing user id    → `Malformed`
//! 3. past expiry (claim or registry)  → `Expired`, evicting the token
//!
//! Expired tokens are garbage-collected by the verification that
//! encounters them; there is no background sweeper.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::registry::{TokenRecord, TokenRegistry};
use crate::AppState;

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Opaque generated user identifier
    pub user_id: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Token verification/issuance failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Token absent from the live-token registry.
    #[error("invalid token")]
    Unknown,

    /// Token past its expiry. The offending token has been evicted.
    #[error("token expired")]
    Expired,

    /// Token could not be decoded or carries no user identifier.
    #[error("token verification failed")]
    Malformed,

    /// Signing failed at issuance. Not a client fault.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Credentials returned by a successful session start.
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    pub user_id: String,
    pub token: String,
}

/// Issues, verifies, and revokes session tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_secs: i64,
    registry: Arc<TokenRegistry>,
}

impl TokenService {
    /// Creates a token service over the given registry.
    pub fn new(secret: impl Into<String>, ttl_secs: i64, registry: Arc<TokenRegistry>) -> Self {
        TokenService {
            secret: secret.into(),
            ttl_secs,
            registry,
        }
    }

    /// Mints a session for a freshly generated user id and registers the
    /// token. The user id is not tied to any persisted record.
    pub async fn start_session(&self) -> Result<SessionCredentials, AuthError> {
        let user_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.ttl_secs);

        let claims = Claims {
            user_id: user_id.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))?;

        self.registry
            .insert(
                token.clone(),
                TokenRecord {
                    user_id: user_id.clone(),
                    created_at: now,
                    expires_at,
                },
            )
            .await;

        debug!(%user_id, "session started");

        Ok(SessionCredentials { user_id, token })
    }

    /// Verifies a token and returns the embedded user id.
    ///
    /// Does not extend expiry (no sliding expiration). An expired token is
    /// removed from the registry as a side effect.
    pub async fn verify(&self, token: &str) -> Result<String, AuthError> {
        let Some(record) = self.registry.get(token).await else {
            return Err(AuthError::Unknown);
        };

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        );

        let claims = match decoded {
            Ok(data) => data.claims,
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                self.registry.remove(token).await;
                return Err(AuthError::Expired);
            }
            Err(_) => return Err(AuthError::Malformed),
        };

        if claims.user_id.is_empty() {
            return Err(AuthError::Malformed);
        }

        // The registry expiry is checked without leeway; the signature
        // check above allows the library default.
        if Utc::now() > record.expires_at {
            self.registry.remove(token).await;
            return Err(AuthError::Expired);
        }

        Ok(claims.user_id)
    }

    /// Removes a token from the registry if present; returns whether
    /// removal occurred. Idempotent.
    pub async fn revoke(&self, token: &str) -> bool {
        self.registry.remove(token).await
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Axum extractor holding the verified user id of the calling session.
///
/// Protected handlers take this as an argument; verification runs before
/// any handler body executes, so no work happens for unauthenticated
/// requests.
pub struct Bearer(pub String);

impl FromRequestParts<AppState> for Bearer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or(ApiError::Auth(AuthError::Unknown))?;

        let user_id = state.tokens.verify(token).await?;
        Ok(Bearer(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(ttl_secs: i64) -> TokenService {
        TokenService::new("test-secret", ttl_secs, Arc::new(TokenRegistry::new()))
    }

    #[tokio::test]
    async fn test_start_and_verify_roundtrip() {
        let service = service(3600);
        let creds = service.start_session().await.unwrap();

        let user_id = service.verify(&creds.token).await.unwrap();
        assert_eq!(user_id, creds.user_id);
    }

    #[tokio::test]
    async fn test_sessions_get_distinct_users_and_tokens() {
        let service = service(3600);
        let a = service.start_session().await.unwrap();
        let b = service.start_session().await.unwrap();

        assert_ne!(a.user_id, b.user_id);
        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn test_unknown_token_rejected_before_decode() {
        let service = service(3600);
        // A structurally valid token that was never registered.
        let other = TokenService::new("test-secret", 3600, Arc::new(TokenRegistry::new()));
        let creds = other.start_session().await.unwrap();

        assert_eq!(service.verify(&creds.token).await, Err(AuthError::Unknown));
    }

    #[tokio::test]
    async fn test_expired_signature_evicts() {
        // Expired well past the decoder's leeway.
        let service = service(-120);
        let creds = service.start_session().await.unwrap();

        assert_eq!(service.verify(&creds.token).await, Err(AuthError::Expired));
        // Evicted: the second attempt no longer finds it registered.
        assert_eq!(service.verify(&creds.token).await, Err(AuthError::Unknown));
    }

    #[tokio::test]
    async fn test_registry_expiry_evicts_within_leeway() {
        // Expired by less than the decoder's 60s leeway: the signature
        // still verifies, the registry expiry check catches it.
        let service = service(-10);
        let creds = service.start_session().await.unwrap();

        assert_eq!(service.verify(&creds.token).await, Err(AuthError::Expired));
        assert_eq!(service.verify(&creds.token).await, Err(AuthError::Unknown));
    }

    #[tokio::test]
    async fn test_malformed_registered_token() {
        let registry = Arc::new(TokenRegistry::new());
        let service = TokenService::new("test-secret", 3600, registry.clone());

        let now = Utc::now();
        registry
            .insert(
                "not-a-jwt".to_string(),
                TokenRecord {
                    user_id: "user-1".to_string(),
                    created_at: now,
                    expires_at: now + Duration::hours(1),
                },
            )
            .await;

        assert_eq!(service.verify("not-a-jwt").await, Err(AuthError::Malformed));
    }

    #[tokio::test]
    async fn test_revoke_then_verify_fails() {
        let service = service(3600);
        let creds = service.start_session().await.unwrap();

        assert!(service.revoke(&creds.token).await);
        assert_eq!(service.verify(&creds.token).await, Err(AuthError::Unknown));
    }

    #[tokio::test]
    async fn test_revoke_twice() {
        let service = service(3600);
        let creds = service.start_session().await.unwrap();

        assert!(service.revoke(&creds.token).await);
        assert!(!service.revoke(&creds.token).await);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("bearer abc"), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
