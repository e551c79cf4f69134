//! Token backend trait.
//!
//! This module defines the persistence capability the token store depends on:
//! one record per subject, replaced atomically on every re-issue.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored login token, one per subject.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Subject (user/account) the token is bound to. Unique key.
    pub subject_id: String,

    /// One-way digest of the plaintext token.
    pub token_digest: String,

    /// Absolute expiration time.
    pub expires_at: DateTime<Utc>,

    /// Destination to redirect to after successful authentication.
    pub origin: Option<String>,
}

impl TokenRecord {
    /// Create a new token record.
    #[must_use]
    pub const fn new(
        subject_id: String,
        token_digest: String,
        expires_at: DateTime<Utc>,
        origin: Option<String>,
    ) -> Self {
        Self {
            subject_id,
            token_digest,
            expires_at,
            origin,
        }
    }

    /// Returns `true` if the record is no longer valid at `now`.
    ///
    /// A record is still valid at the exact instant of `expires_at`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// Digest stays out of logs.
impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("subject_id", &self.subject_id)
            .field("token_digest", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Persistence backend for token records.
///
/// # Implementation Notes
///
/// - **CRITICAL**: `upsert_by_subject()` MUST be a single atomic create-or-replace
///   (`Redis` `HSET`, `PostgreSQL` `INSERT ... ON CONFLICT DO UPDATE`). A
///   read-then-write sequence loses updates when two re-issues race.
/// - Expired records are returned as-is. Expiry is judged by the caller.
/// - Deleting an absent record is not an error.
pub trait TokenBackend: Send + Sync {
    /// Look up the record for a subject.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: a record exists (it may be expired)
    /// - `Ok(None)`: no record for this subject
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn find_by_subject(
        &self,
        subject_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<TokenRecord>>> + Send;

    /// Atomically create or fully replace the record keyed by `record.subject_id`.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn upsert_by_subject(
        &self,
        record: TokenRecord,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Delete the record for a subject. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn delete_by_subject(
        &self,
        subject_id: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Delete every record.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn delete_all(&self) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Number of stored records, expired ones included.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn count(&self) -> impl std::future::Future<Output = Result<u64>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_at: DateTime<Utc>) -> TokenRecord {
        TokenRecord::new(
            "alice".to_string(),
            "$2b$10$secretdigest".to_string(),
            expires_at,
            Some("/dashboard".to_string()),
        )
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let rec = record(now);

        assert!(!rec.is_expired_at(now));
        assert!(!rec.is_expired_at(now - Duration::milliseconds(1)));
        assert!(rec.is_expired_at(now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_debug_redacts_digest() {
        let rendered = format!("{:?}", record(Utc::now()));

        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("secretdigest"));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_json_roundtrip_keeps_missing_origin() {
        let mut rec = record(Utc::now());
        rec.origin = None;

        let json = serde_json::to_string(&rec).unwrap();
        let back: TokenRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back, rec);
    }
}
