//! The token store.
//!
//! Owns the mapping from subject identifier to the single live login token,
//! and answers authentication queries against it.
//!
//! # Flow
//!
//! 1. Controller generates a random token ([`generate_token`](crate::utils::generate_token))
//! 2. [`TokenStore::store_or_update`] hashes it and upserts the subject's record
//! 3. Controller delivers the plaintext to the user (e.g. by email)
//! 4. User presents the token, controller calls [`TokenStore::authenticate`]
//! 5. Store looks up the record, checks expiry, verifies the digest
//!
//! # Security
//!
//! - Only digests are persisted; neither token nor digest is ever logged
//! - Re-issuing for a subject replaces the previous token (one live token per subject)
//! - Expired records are treated as absent but are not deleted
//! - Digest comparison is delegated to the hasher's constant-time `verify()`
//! - "Could not verify" is an `Err`; "verification failed" is [`AuthOutcome::Invalid`]

use crate::config::TokenStoreConfig;
use crate::error::{Result, TokenStoreError};
use crate::providers::{BcryptHasher, Clock, SystemClock, TokenBackend, TokenHasher, TokenRecord};
use crate::utils::{generate_token, require_non_empty, require_positive_ttl};
use chrono::{DateTime, Duration, Utc};

/// Result of an authentication attempt that completed without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Token matched a live record.
    Valid {
        /// Stored origin, or an empty string if none was stored.
        origin: String,
    },

    /// No record, expired record, or token mismatch.
    Invalid,
}

impl AuthOutcome {
    /// Returns `true` if the token was accepted.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Origin to redirect to, present only for a valid token.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        match self {
            Self::Valid { origin } => Some(origin.as_str()),
            Self::Invalid => None,
        }
    }

    /// Split into the `(valid, origin)` pair.
    ///
    /// # Examples
    ///
    /// ```
    /// # use passwordless_tokenstore::AuthOutcome;
    /// assert_eq!(AuthOutcome::Invalid.into_parts(), (false, None));
    /// assert_eq!(
    ///     AuthOutcome::Valid { origin: String::new() }.into_parts(),
    ///     (true, Some(String::new()))
    /// );
    /// ```
    #[must_use]
    pub fn into_parts(self) -> (bool, Option<String>) {
        match self {
            Self::Valid { origin } => (true, Some(origin)),
            Self::Invalid => (false, None),
        }
    }
}

/// Single-valid-token-per-subject credential store.
///
/// # Thread Safety
///
/// `TokenStore` holds no locks of its own. It is `Clone` when its
/// collaborators are, and every operation is a single request against the
/// backend, so clones can be used from concurrent tasks as long as the
/// backend offers per-key atomic upserts.
#[derive(Clone)]
pub struct TokenStore<B, H = BcryptHasher, C = SystemClock> {
    backend: B,
    hasher: H,
    clock: C,
    config: TokenStoreConfig,
}

impl<B: TokenBackend> TokenStore<B> {
    /// Create a store using `bcrypt` and the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Configuration`] if `config` is invalid.
    pub fn new(backend: B, config: TokenStoreConfig) -> Result<Self> {
        TokenStoreBuilder::new().backend(backend).config(config).build()
    }
}

impl<B, H, C> TokenStore<B, H, C>
where
    B: TokenBackend,
    H: TokenHasher,
    C: Clock,
{
    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TokenStoreConfig {
        &self.config
    }

    /// Store a new token for a subject, replacing any previous one.
    ///
    /// The record expires at `now + ttl`. Only the most recently issued token
    /// for a subject is ever valid.
    ///
    /// # Errors
    ///
    /// - [`TokenStoreError::InvalidArgument`]: empty token/subject, `ttl` under 1ms,
    ///   or `ttl` past the representable time range (no hashing or backend access happens)
    /// - [`TokenStoreError::Hashing`]: the hasher failed (nothing is written)
    /// - [`TokenStoreError::Backend`]: the write failed
    pub async fn store_or_update(
        &self,
        token: &str,
        subject_id: &str,
        ttl: Duration,
        origin: Option<&str>,
    ) -> Result<()> {
        require_non_empty("token", token)?;
        require_non_empty("subject_id", subject_id)?;
        require_positive_ttl(ttl)?;
        self.expiry_after(ttl)?;

        let token_digest = self.hasher.hash(token, self.config.hash_cost).await?;

        // Expiry counts from the end of hashing.
        let expires_at = self.expiry_after(ttl)?;

        let record = TokenRecord::new(
            subject_id.to_string(),
            token_digest,
            expires_at,
            origin.map(str::to_string),
        );

        self.backend.upsert_by_subject(record).await?;

        tracing::info!(
            subject_id = subject_id,
            ttl_ms = ttl.num_milliseconds(),
            expires_at = %expires_at,
            has_origin = origin.is_some(),
            "Stored login token"
        );

        Ok(())
    }

    fn expiry_after(&self, ttl: Duration) -> Result<DateTime<Utc>> {
        self.clock.now().checked_add_signed(ttl).ok_or_else(|| {
            TokenStoreError::InvalidArgument(format!(
                "ttl of {}ms overflows the expiry timestamp",
                ttl.num_milliseconds()
            ))
        })
    }

    /// Generate a fresh token, store it for `subject_id` and return the plaintext.
    ///
    /// # Errors
    ///
    /// Same as [`TokenStore::store_or_update`].
    pub async fn issue(
        &self,
        subject_id: &str,
        ttl: Duration,
        origin: Option<&str>,
    ) -> Result<String> {
        let token = generate_token();
        self.store_or_update(&token, subject_id, ttl, origin).await?;
        Ok(token)
    }

    /// Check a presented token against the subject's live record.
    ///
    /// # Returns
    ///
    /// - `Ok(AuthOutcome::Valid { origin })`: token matches a live record
    /// - `Ok(AuthOutcome::Invalid)`: no record, expired record, or mismatch
    ///
    /// # Errors
    ///
    /// - [`TokenStoreError::InvalidArgument`]: empty token or subject
    /// - [`TokenStoreError::Backend`]: the lookup failed
    /// - [`TokenStoreError::Hashing`]: the digest could not be checked
    pub async fn authenticate(&self, token: &str, subject_id: &str) -> Result<AuthOutcome> {
        require_non_empty("token", token)?;
        require_non_empty("subject_id", subject_id)?;

        let Some(record) = self.backend.find_by_subject(subject_id).await? else {
            tracing::debug!(subject_id = subject_id, "No login token stored for subject");
            return Ok(AuthOutcome::Invalid);
        };

        let now = self.clock.now();
        if record.is_expired_at(now) {
            tracing::debug!(
                subject_id = subject_id,
                expires_at = %record.expires_at,
                now = %now,
                "Login token expired"
            );
            return Ok(AuthOutcome::Invalid);
        }

        if self.hasher.verify(token, &record.token_digest).await? {
            tracing::info!(subject_id = subject_id, "Login token authenticated");
            Ok(AuthOutcome::Valid {
                origin: record.origin.unwrap_or_default(),
            })
        } else {
            tracing::warn!(subject_id = subject_id, "Login token mismatch");
            Ok(AuthOutcome::Invalid)
        }
    }

    /// Remove the subject's token. Absent subjects are not an error.
    ///
    /// # Errors
    ///
    /// - [`TokenStoreError::InvalidArgument`]: empty subject
    /// - [`TokenStoreError::Backend`]: the delete failed
    pub async fn invalidate_user(&self, subject_id: &str) -> Result<()> {
        require_non_empty("subject_id", subject_id)?;

        self.backend.delete_by_subject(subject_id).await?;

        tracing::debug!(subject_id = subject_id, "Invalidated login token");
        Ok(())
    }

    /// Remove every stored token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Backend`] if the delete failed.
    pub async fn clear(&self) -> Result<()> {
        self.backend.delete_all().await?;

        tracing::info!("Cleared all login tokens");
        Ok(())
    }

    /// Number of stored records, including expired ones not yet removed.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Backend`] if the count failed.
    pub async fn length(&self) -> Result<u64> {
        self.backend.count().await
    }
}

/// Builder for [`TokenStore`] with injectable hasher and clock.
///
/// # Example
///
/// ```
/// use passwordless_tokenstore::{TokenStoreBuilder, TokenStoreConfig};
/// use passwordless_tokenstore::mocks::{MockClock, MockTokenBackend, MockTokenHasher};
///
/// # fn example() -> passwordless_tokenstore::Result<()> {
/// let store = TokenStoreBuilder::new()
///     .backend(MockTokenBackend::new())
///     .hasher(MockTokenHasher::new())
///     .clock(MockClock::default())
///     .config(TokenStoreConfig::new().with_hash_cost(4))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TokenStoreBuilder<B, H = BcryptHasher, C = SystemClock> {
    backend: Option<B>,
    hasher: H,
    clock: C,
    config: TokenStoreConfig,
}

impl<B> TokenStoreBuilder<B> {
    /// Start a builder with `bcrypt`, the system clock and default config.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            backend: None,
            hasher: BcryptHasher::new(),
            clock: SystemClock,
            config: TokenStoreConfig::new(),
        }
    }
}

impl<B> Default for TokenStoreBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B, H, C> TokenStoreBuilder<B, H, C> {
    /// Set the persistence backend (required).
    #[must_use]
    pub fn backend(mut self, backend: B) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Replace the hashing primitive.
    #[must_use]
    pub fn hasher<H2>(self, hasher: H2) -> TokenStoreBuilder<B, H2, C> {
        TokenStoreBuilder {
            backend: self.backend,
            hasher,
            clock: self.clock,
            config: self.config,
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn clock<C2>(self, clock: C2) -> TokenStoreBuilder<B, H, C2> {
        TokenStoreBuilder {
            backend: self.backend,
            hasher: self.hasher,
            clock,
            config: self.config,
        }
    }

    /// Set the configuration.
    #[must_use]
    pub fn config(mut self, config: TokenStoreConfig) -> Self {
        self.config = config;
        self
    }
}

impl<B, H, C> TokenStoreBuilder<B, H, C>
where
    B: TokenBackend,
    H: TokenHasher,
    C: Clock,
{
    /// Build the store.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Configuration`] if no backend was set or the
    /// configuration is invalid.
    pub fn build(self) -> Result<TokenStore<B, H, C>> {
        let backend = self.backend.ok_or_else(|| {
            TokenStoreError::Configuration("a token backend is required".to_string())
        })?;
        self.config.validate()?;

        tracing::info!(hash_cost = self.config.hash_cost, "TokenStore initialized");

        Ok(TokenStore {
            backend,
            hasher: self.hasher,
            clock: self.clock,
            config: self.config,
        })
    }
}
