//! Redis-based token backend implementation.
//!
//! # Architecture
//!
//! All records live in a single Redis hash:
//! - **Key**: `auth:passwordless:tokens` (configurable)
//! - **Field**: subject identifier
//! - **Value**: JSON-serialized [`TokenRecord`]
//!
//! Using one hash maps every backend operation onto a single Redis command:
//!
//! | Operation            | Command |
//! |----------------------|---------|
//! | `find_by_subject`    | `HGET`  |
//! | `upsert_by_subject`  | `HSET`  |
//! | `delete_by_subject`  | `HDEL`  |
//! | `delete_all`         | `DEL`   |
//! | `count`              | `HLEN`  |
//!
//! # Security
//!
//! - **Atomic upsert**: `HSET` replaces the field in one command, so concurrent
//!   re-issues for one subject cannot interleave
//! - **Digest only**: the stored JSON holds the digest, never the plaintext
//! - **No Redis TTL**: hash fields cannot expire individually; expiry is checked
//!   by the store, and `HLEN` keeps counting expired records
//!
//! # Example
//!
//! ```no_run
//! use passwordless_tokenstore::stores::RedisTokenBackend;
//! use passwordless_tokenstore::{TokenStore, TokenStoreConfig};
//! use chrono::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = RedisTokenBackend::new("redis://127.0.0.1:6379").await?;
//! let store = TokenStore::new(backend, TokenStoreConfig::default())?;
//!
//! let token = store.issue("user-42", Duration::minutes(10), Some("/billing")).await?;
//! assert!(store.authenticate(&token, "user-42").await?.is_valid());
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, TokenStoreError};
use crate::providers::{TokenBackend, TokenRecord};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

/// Default Redis key holding the token hash.
pub const DEFAULT_TOKENS_KEY: &str = "auth:passwordless:tokens";

/// `Redis`-based token backend.
///
/// # Thread Safety
///
/// This type is `Clone` and can be safely shared across threads.
/// Each clone shares the same `ConnectionManager` (connection pool).
#[derive(Clone)]
pub struct RedisTokenBackend {
    /// Connection manager for connection pooling.
    conn_manager: ConnectionManager,

    /// Hash key holding all records.
    key: String,
}

impl RedisTokenBackend {
    /// Create a new `Redis` token backend using the default key.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - `Redis` connection URL (e.g., "<redis://127.0.0.1:6379>")
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `Redis` URL is malformed
    /// - Connection to `Redis` server fails
    pub async fn new(redis_url: &str) -> Result<Self> {
        Self::with_key(redis_url, DEFAULT_TOKENS_KEY).await
    }

    /// Create a new `Redis` token backend storing records under `key`.
    ///
    /// Separate keys isolate independent stores sharing one `Redis` instance.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `Redis` URL is malformed
    /// - Connection to `Redis` server fails
    /// - `key` is empty
    pub async fn with_key(redis_url: &str, key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(TokenStoreError::Configuration(
                "Redis key must not be empty".to_string(),
            ));
        }

        let client = Client::open(redis_url).map_err(|e| {
            TokenStoreError::Configuration(format!("Failed to create Redis client: {e}"))
        })?;

        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            TokenStoreError::Backend(format!("Failed to create Redis connection manager: {e}"))
        })?;

        tracing::info!(key = key, "RedisTokenBackend initialized successfully");

        Ok(Self {
            conn_manager,
            key: key.to_string(),
        })
    }

    /// Hash key holding the records.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl TokenBackend for RedisTokenBackend {
    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<TokenRecord>> {
        let mut conn = self.conn_manager.clone();

        let value: Option<String> = conn
            .hget(&self.key, subject_id)
            .await
            .map_err(|e| TokenStoreError::Backend(format!("Failed to load token: {e}")))?;

        value
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    TokenStoreError::Backend(format!("Failed to decode token record: {e}"))
                })
            })
            .transpose()
    }

    async fn upsert_by_subject(&self, record: TokenRecord) -> Result<()> {
        let mut conn = self.conn_manager.clone();

        let json = serde_json::to_string(&record).map_err(|e| {
            TokenStoreError::Backend(format!("Failed to encode token record: {e}"))
        })?;

        // HSET replaces an existing field atomically.
        let _: i64 = conn
            .hset(&self.key, &record.subject_id, json)
            .await
            .map_err(|e| TokenStoreError::Backend(format!("Failed to store token: {e}")))?;

        tracing::debug!(
            subject_id = %record.subject_id,
            expires_at = %record.expires_at,
            "Stored token record in Redis"
        );

        Ok(())
    }

    async fn delete_by_subject(&self, subject_id: &str) -> Result<()> {
        let mut conn = self.conn_manager.clone();

        let deleted: i64 = conn
            .hdel(&self.key, subject_id)
            .await
            .map_err(|e| TokenStoreError::Backend(format!("Failed to delete token: {e}")))?;

        if deleted > 0 {
            tracing::debug!(subject_id = subject_id, "Deleted token record from Redis");
        } else {
            tracing::trace!(
                subject_id = subject_id,
                "Token delete: field not found (already deleted or never existed)"
            );
        }

        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let mut conn = self.conn_manager.clone();

        let _: i64 = conn
            .del(&self.key)
            .await
            .map_err(|e| TokenStoreError::Backend(format!("Failed to clear tokens: {e}")))?;

        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let mut conn = self.conn_manager.clone();

        conn.hlen(&self.key)
            .await
            .map_err(|e| TokenStoreError::Backend(format!("Failed to count tokens: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[allow(clippy::expect_used)] // Test code
    async fn create_test_backend(key: &str) -> RedisTokenBackend {
        let backend = RedisTokenBackend::with_key("redis://127.0.0.1:6379", key)
            .await
            .expect("Failed to create backend");
        backend.delete_all().await.expect("Failed to reset key");
        backend
    }

    fn record(subject_id: &str, digest: &str) -> TokenRecord {
        TokenRecord::new(
            subject_id.to_string(),
            digest.to_string(),
            Utc::now() + Duration::minutes(10),
            Some("/home".to_string()),
        )
    }

    #[tokio::test]
    #[ignore] // Requires Redis running at localhost:6379
    #[allow(clippy::unwrap_used)] // Test code
    async fn test_redis_record_lifecycle() {
        let backend = create_test_backend("test:passwordless:lifecycle").await;
        assert_eq!(backend.key(), "test:passwordless:lifecycle");

        assert!(backend.find_by_subject("alice").await.unwrap().is_none());

        backend.upsert_by_subject(record("alice", "digest-1")).await.unwrap();
        backend.upsert_by_subject(record("alice", "digest-2")).await.unwrap();
        backend.upsert_by_subject(record("bob", "digest-3")).await.unwrap();

        assert_eq!(backend.count().await.unwrap(), 2);
        let stored = backend.find_by_subject("alice").await.unwrap().unwrap();
        assert_eq!(stored.token_digest, "digest-2");
        assert_eq!(stored.origin.as_deref(), Some("/home"));

        backend.delete_by_subject("alice").await.unwrap();
        backend.delete_by_subject("alice").await.unwrap();
        assert_eq!(backend.count().await.unwrap(), 1);

        backend.delete_all().await.unwrap();
        assert_eq!(backend.count().await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    #[allow(clippy::unwrap_used)] // Test code
    async fn test_concurrent_upserts_keep_one_field() {
        let backend = create_test_backend("test:passwordless:concurrent").await;

        let mut handles = vec![];
        for i in 0..10 {
            let backend = backend.clone();
            handles.push(tokio::spawn(async move {
                backend
                    .upsert_by_subject(record("alice", &format!("digest-{i}")))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(backend.count().await.unwrap(), 1);
        backend.delete_all().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let result = RedisTokenBackend::with_key("redis://127.0.0.1:6379", "").await;
        assert!(matches!(result, Err(TokenStoreError::Configuration(_))));
    }
}
