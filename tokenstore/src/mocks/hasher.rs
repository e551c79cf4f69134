//! Mock token hasher for testing.
//!
//! Salted SHA-256 instead of `bcrypt`, so tests run at memory speed.
//! Digest format: `mock${cost}${salt}${hex}`.

use crate::error::{Result, TokenStoreError};
use crate::providers::TokenHasher;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

const PREFIX: &str = "mock";

/// Mock token hasher.
#[derive(Debug, Clone, Default)]
pub struct MockTokenHasher {
    salt_counter: Arc<AtomicU64>,
    failing: Arc<AtomicBool>,
    hash_calls: Arc<AtomicUsize>,
    verify_calls: Arc<AtomicUsize>,
}

impl MockTokenHasher {
    /// Create a new mock hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with [`TokenStoreError::Hashing`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `hash()` calls so far.
    #[must_use]
    pub fn hash_calls(&self) -> usize {
        self.hash_calls.load(Ordering::SeqCst)
    }

    /// Number of `verify()` calls so far.
    #[must_use]
    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    fn check_failing(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TokenStoreError::Hashing(
                "Mock hasher configured to fail".to_string(),
            ));
        }
        Ok(())
    }

    fn digest_hex(salt: &str, plaintext: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(b"$");
        hasher.update(plaintext.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl TokenHasher for MockTokenHasher {
    async fn hash(&self, plaintext: &str, cost: u32) -> Result<String> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;

        let salt = format!("{:016x}", self.salt_counter.fetch_add(1, Ordering::SeqCst));
        let hex = Self::digest_hex(&salt, plaintext);
        Ok(format!("{PREFIX}${cost}${salt}${hex}"))
    }

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;

        let parts: Vec<&str> = digest.split('$').collect();
        let [PREFIX, _cost, salt, expected] = parts.as_slice() else {
            return Err(TokenStoreError::Hashing(
                "Malformed mock digest".to_string(),
            ));
        };

        let actual = Self::digest_hex(salt, plaintext);
        Ok(constant_time_eq::constant_time_eq(
            actual.as_bytes(),
            expected.as_bytes(),
        ))
    }
}
