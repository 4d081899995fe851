//! In-memory registry of live session tokens.
//!
//! Tokens are self-describing (signed, carrying their own expiry), but
//! validity is additionally gated on presence here, which is what makes
//! revocation possible at all. The registry lives only in process memory
//! and is lost on restart; a multi-instance deployment would swap this for
//! an external keyed store behind the same interface.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// Metadata stored per live token.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Registry of issued tokens, keyed by the raw token string.
///
/// A single coarse async lock is sufficient: the map is low-cardinality
/// and every critical section is a handful of hash operations.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    inner: Mutex<HashMap<String, TokenRecord>>,
}

impl TokenRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        TokenRegistry {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a token.
    pub async fn insert(&self, token: String, record: TokenRecord) {
        self.inner.lock().await.insert(token, record);
    }

    /// Returns a copy of the record for a token, if registered.
    pub async fn get(&self, token: &str) -> Option<TokenRecord> {
        self.inner.lock().await.get(token).cloned()
    }

    /// Removes a token. Returns whether it was present. Idempotent.
    pub async fn remove(&self, token: &str) -> bool {
        self.inner.lock().await.remove(token).is_some()
    }

    /// Number of live tokens.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: &str) -> TokenRecord {
        let now = Utc::now();
        TokenRecord {
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + chrono::Duration::hours(24),
        }
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let registry = TokenRegistry::new();
        registry.insert("tok-1".to_string(), record("user-1")).await;

        let found = registry.get("tok-1").await.unwrap();
        assert_eq!(found.user_id, "user-1");
        assert_eq!(registry.len().await, 1);

        assert!(registry.remove("tok-1").await);
        assert!(registry.get("tok-1").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let registry = TokenRegistry::new();
        registry.insert("tok-1".to_string(), record("user-1")).await;

        assert!(registry.remove("tok-1").await);
        assert!(!registry.remove("tok-1").await);
    }

    #[tokio::test]
    async fn test_get_unknown() {
        let registry = TokenRegistry::new();
        assert!(registry.get("nope").await.is_none());
    }
}
