//! Mock token backend for testing.

use crate::error::{Result, TokenStoreError};
use crate::providers::{TokenBackend, TokenRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Mock token backend.
///
/// In-memory backend for testing. Every write is a single `HashMap::insert`
/// under the mutex, so create-or-replace is atomic per subject.
#[derive(Debug, Clone, Default)]
pub struct MockTokenBackend {
    records: Arc<Mutex<HashMap<String, TokenRecord>>>,
    failing: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockTokenBackend {
    /// Create a new, empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with [`TokenStoreError::Backend`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of backend operations attempted so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Get the stored record for a subject (for testing).
    #[must_use]
    pub fn get(&self, subject_id: &str) -> Option<TokenRecord> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(subject_id).cloned())
    }

    /// Get all stored records (for testing).
    #[must_use]
    pub fn get_all(&self) -> HashMap<String, TokenRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Insert a record directly, bypassing the store (for seeding fixtures).
    pub fn insert_raw(&self, record: TokenRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(record.subject_id.clone(), record);
        }
    }

    fn enter(&self) -> Result<MutexGuard<'_, HashMap<String, TokenRecord>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(TokenStoreError::Backend(
                "Mock backend configured to fail".to_string(),
            ));
        }

        self.records
            .lock()
            .map_err(|_| TokenStoreError::Backend("Mock backend lock poisoned".to_string()))
    }
}

impl TokenBackend for MockTokenBackend {
    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<TokenRecord>> {
        let records = self.enter()?;
        Ok(records.get(subject_id).cloned())
    }

    async fn upsert_by_subject(&self, record: TokenRecord) -> Result<()> {
        let mut records = self.enter()?;
        records.insert(record.subject_id.clone(), record);
        Ok(())
    }

    async fn delete_by_subject(&self, subject_id: &str) -> Result<()> {
        let mut records = self.enter()?;
        records.remove(subject_id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let mut records = self.enter()?;
        records.clear();
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let records = self.enter()?;
        Ok(records.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(subject_id: &str, digest: &str) -> TokenRecord {
        TokenRecord::new(
            subject_id.to_string(),
            digest.to_string(),
            Utc::now() + Duration::minutes(10),
            None,
        )
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_record() {
        let backend = MockTokenBackend::new();

        backend.upsert_by_subject(record("alice", "first")).await.unwrap();
        backend.upsert_by_subject(record("alice", "second")).await.unwrap();

        assert_eq!(backend.count().await.unwrap(), 1);
        assert_eq!(
            backend.find_by_subject("alice").await.unwrap().unwrap().token_digest,
            "second"
        );
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let backend = MockTokenBackend::new();

        backend.delete_by_subject("nobody").await.unwrap();
        backend.upsert_by_subject(record("alice", "digest")).await.unwrap();
        backend.delete_by_subject("alice").await.unwrap();
        backend.delete_by_subject("alice").await.unwrap();

        assert!(backend.find_by_subject("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_all() {
        let backend = MockTokenBackend::new();

        backend.upsert_by_subject(record("alice", "a")).await.unwrap();
        backend.upsert_by_subject(record("bob", "b")).await.unwrap();
        backend.delete_all().await.unwrap();

        assert_eq!(backend.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let backend = MockTokenBackend::new();
        backend.set_failing(true);

        let err = backend.count().await.unwrap_err();
        assert!(matches!(err, TokenStoreError::Backend(_)));
        assert_eq!(backend.call_count(), 1);

        backend.set_failing(false);
        assert_eq!(backend.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_leave_one_record() {
        let backend = MockTokenBackend::new();

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
    }
}
