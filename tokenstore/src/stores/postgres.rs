//! PostgreSQL token backend implementation.
//!
//! Records live in the `passwordless_tokens` table, keyed by `subject_id`.
//! Re-issue uses `INSERT ... ON CONFLICT (subject_id) DO UPDATE`, so the
//! create-or-replace is a single statement guarded by the primary key.
//!
//! # Example
//!
//! ```no_run
//! use passwordless_tokenstore::stores::PostgresTokenBackend;
//! use passwordless_tokenstore::{TokenStore, TokenStoreConfig};
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgresql://localhost/auth").await?;
//! let backend = PostgresTokenBackend::new(pool);
//! backend.migrate().await?;
//!
//! let store = TokenStore::new(backend, TokenStoreConfig::from_env())?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, TokenStoreError};
use crate::providers::{TokenBackend, TokenRecord};
use sqlx::{PgPool, Row};

/// `PostgreSQL` token backend.
#[derive(Debug, Clone)]
pub struct PostgresTokenBackend {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresTokenBackend {
    /// Create a new `PostgreSQL` token backend.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns error if migrations fail.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| TokenStoreError::Backend(format!("Migration failed: {e}")))?;
        Ok(())
    }

    fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<TokenRecord> {
        let decode = |e: sqlx::Error| {
            TokenStoreError::Backend(format!("Failed to decode token row: {e}"))
        };

        Ok(TokenRecord {
            subject_id: row.try_get("subject_id").map_err(decode)?,
            token_digest: row.try_get("token_digest").map_err(decode)?,
            expires_at: row.try_get("expires_at").map_err(decode)?,
            origin: row.try_get("origin").map_err(decode)?,
        })
    }
}

impl TokenBackend for PostgresTokenBackend {
    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<TokenRecord>> {
        let row = sqlx::query(
            r"
            SELECT subject_id, token_digest, expires_at, origin
            FROM passwordless_tokens
            WHERE subject_id = $1
            ",
        )
        .bind(subject_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TokenStoreError::Backend(format!("Failed to load token: {e}")))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn upsert_by_subject(&self, record: TokenRecord) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO passwordless_tokens (subject_id, token_digest, expires_at, origin)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subject_id)
            DO UPDATE SET
                token_digest = EXCLUDED.token_digest,
                expires_at = EXCLUDED.expires_at,
                origin = EXCLUDED.origin
            ",
        )
        .bind(&record.subject_id)
        .bind(&record.token_digest)
        .bind(record.expires_at)
        .bind(&record.origin)
        .execute(&self.pool)
        .await
        .map_err(|e| TokenStoreError::Backend(format!("Failed to store token: {e}")))?;

        Ok(())
    }

    async fn delete_by_subject(&self, subject_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM passwordless_tokens WHERE subject_id = $1")
            .bind(subject_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TokenStoreError::Backend(format!("Failed to delete token: {e}")))?;

        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        sqlx::query("TRUNCATE TABLE passwordless_tokens")
            .execute(&self.pool)
            .await
            .map_err(|e| TokenStoreError::Backend(format!("Failed to clear tokens: {e}")))?;

        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM passwordless_tokens")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| TokenStoreError::Backend(format!("Failed to count tokens: {e}")))?;

        u64::try_from(count)
            .map_err(|e| TokenStoreError::Backend(format!("Invalid token count: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, DurationRound, Utc};

    #[tokio::test]
    #[ignore] // Requires PostgreSQL at DATABASE_URL
    #[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
    async fn test_postgres_record_lifecycle() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.expect("Failed to connect");
        let backend = PostgresTokenBackend::new(pool);
        backend.migrate().await.unwrap();
        backend.delete_all().await.unwrap();

        // TIMESTAMPTZ keeps microseconds.
        let expires_at = (Utc::now() + Duration::minutes(10))
            .duration_trunc(Duration::microseconds(1))
            .unwrap();
        let first = TokenRecord::new("alice".into(), "digest-1".into(), expires_at, None);
        let second = TokenRecord::new(
            "alice".into(),
            "digest-2".into(),
            expires_at,
            Some("/home".into()),
        );

        backend.upsert_by_subject(first).await.unwrap();
        backend.upsert_by_subject(second.clone()).await.unwrap();

        assert_eq!(backend.count().await.unwrap(), 1);
        assert_eq!(backend.find_by_subject("alice").await.unwrap(), Some(second));

        backend.delete_by_subject("alice").await.unwrap();
        backend.delete_by_subject("alice").await.unwrap();
        assert!(backend.find_by_subject("alice").await.unwrap().is_none());
        assert_eq!(backend.count().await.unwrap(), 0);
    }
}
