//! Token store configuration.
//!
//! Values should be provided by the application. [`TokenStoreConfig::from_env`]
//! covers the common case of reading them from the process environment.

use crate::error::{Result, TokenStoreError};
use std::env;

/// Default cost factor passed to the hashing primitive.
pub const DEFAULT_HASH_COST: u32 = 10;

/// Environment variable read by [`TokenStoreConfig::from_env`].
pub const HASH_COST_ENV: &str = "TOKENSTORE_HASH_COST";

/// Token store configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenStoreConfig {
    /// Cost factor of the hashing primitive.
    ///
    /// Higher values trade verification latency for brute-force resistance.
    ///
    /// Default: 10
    pub hash_cost: u32,
}

impl TokenStoreConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hash_cost: DEFAULT_HASH_COST,
        }
    }

    /// Set the hashing cost factor.
    #[must_use]
    pub const fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `TOKENSTORE_HASH_COST`; missing or unparsable values fall back
    /// to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            hash_cost: lookup(HASH_COST_ENV)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_HASH_COST),
        }
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Configuration`] if `hash_cost` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.hash_cost == 0 {
            return Err(TokenStoreError::Configuration(
                "hash_cost must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TokenStoreConfig {
    fn default() -> Self {
        Self::new()
    }
}
