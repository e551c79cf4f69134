//! `bcrypt` token hasher.
//!
//! `bcrypt` is deliberately slow, so both operations run on the blocking
//! thread pool instead of the async worker threads.
//!
//! `bcrypt` only reads the first 72 bytes of its input. Longer tokens are
//! refused when hashing and never match when verifying, so two tokens that
//! share a 72-byte prefix cannot stand in for each other.

use crate::error::{Result, TokenStoreError};
use crate::providers::TokenHasher;

/// Lowest cost factor `bcrypt` accepts.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest cost factor `bcrypt` accepts.
pub const MAX_BCRYPT_COST: u32 = 31;

/// Longest input `bcrypt` hashes in full.
pub const MAX_BCRYPT_INPUT_BYTES: usize = 72;

/// Token hasher backed by the `bcrypt` crate.
///
/// `bcrypt::verify` compares digests in constant time.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptHasher;

impl BcryptHasher {
    /// Create a new `bcrypt` hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TokenHasher for BcryptHasher {
    async fn hash(&self, plaintext: &str, cost: u32) -> Result<String> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(TokenStoreError::Hashing(format!(
                "bcrypt cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}, got {cost}"
            )));
        }

        if plaintext.len() > MAX_BCRYPT_INPUT_BYTES {
            return Err(TokenStoreError::Hashing(format!(
                "bcrypt input must be at most {MAX_BCRYPT_INPUT_BYTES} bytes, got {}",
                plaintext.len()
            )));
        }

        let plaintext = plaintext.to_string();

        tokio::task::spawn_blocking(move || {
            bcrypt::hash(plaintext, cost)
                .map_err(|e| TokenStoreError::Hashing(format!("bcrypt hash failed: {e}")))
        })
        .await
        .map_err(|e| TokenStoreError::Hashing(format!("Hashing task failed: {e}")))?
    }

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool> {
        // No stored digest covers more than 72 bytes.
        if plaintext.len() > MAX_BCRYPT_INPUT_BYTES {
            return Ok(false);
        }

        let plaintext = plaintext.to_string();
        let digest = digest.to_string();

        tokio::task::spawn_blocking(move || {
            bcrypt::verify(plaintext, &digest)
                .map_err(|e| TokenStoreError::Hashing(format!("bcrypt verify failed: {e}")))
        })
        .await
        .map_err(|e| TokenStoreError::Hashing(format!("Verification task failed: {e}")))?
    }
}
