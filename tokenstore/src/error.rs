//! Error types for token store operations.

use thiserror::Error;

/// Result type alias for token store operations.
pub type Result<T> = std::result::Result<T, TokenStoreError>;

/// Error taxonomy for the token store.
///
/// An `Err` always means "could not determine validity". A rejected token is
/// never an error: it is reported as [`AuthOutcome::Invalid`](crate::AuthOutcome::Invalid).
/// Callers should fail closed on every variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenStoreError {
    // ═══════════════════════════════════════════════════════════
    // Caller Errors
    // ═══════════════════════════════════════════════════════════

    /// Malformed or missing caller input, detected before any I/O.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The store could not be constructed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ═══════════════════════════════════════════════════════════
    // Collaborator Errors
    // ═══════════════════════════════════════════════════════════

    /// Persistence layer failure (connection, serialization, constraint).
    #[error("Backend error: {0}")]
    Backend(String),

    /// Hashing primitive failure. Not a verification mismatch.
    #[error("Hashing error: {0}")]
    Hashing(String),
}

impl TokenStoreError {
    /// Returns `true` if the caller supplied bad input or configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// # use passwordless_tokenstore::TokenStoreError;
    /// assert!(TokenStoreError::InvalidArgument("uid".into()).is_caller_error());
    /// assert!(TokenStoreError::Configuration("hash_cost".into()).is_caller_error());
    /// assert!(!TokenStoreError::Backend("down".into()).is_caller_error());
    /// ```
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::Configuration(_))
    }

    /// Returns `true` if retrying the same call may succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use passwordless_tokenstore::TokenStoreError;
    /// assert!(TokenStoreError::Backend("timeout".into()).is_retryable());
    /// assert!(!TokenStoreError::InvalidArgument("token".into()).is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Hashing(_))
    }
}
