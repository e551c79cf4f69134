//! Token hashing trait.

use crate::error::Result;

/// One-way hashing primitive for login tokens.
///
/// # Security Requirements
///
/// 1. **One-way**: the digest must not reveal the plaintext
/// 2. **Salted**: equal tokens should not produce equal digests
/// 3. **Constant-time**: `verify()` must not leak how much of the digest matched
///
/// Failures are reported as [`TokenStoreError::Hashing`](crate::TokenStoreError::Hashing),
/// never folded into a `false` verification result.
pub trait TokenHasher: Send + Sync {
    /// Hash a plaintext token with the given cost factor.
    ///
    /// # Errors
    ///
    /// Returns error if the primitive fails (e.g. unsupported cost).
    fn hash(
        &self,
        plaintext: &str,
        cost: u32,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Check a plaintext token against a stored digest.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the token matches
    /// - `Ok(false)`: the token does not match
    ///
    /// # Errors
    ///
    /// Returns error if the primitive fails (e.g. malformed digest).
    fn verify(
        &self,
        plaintext: &str,
        digest: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}
