//! # Passwordless Token Store
//!
//! Issues and verifies short-lived login tokens for passwordless
//! authentication, one valid token per subject.
//!
//! ## Features
//!
//! - **One live token per subject**: re-issuing atomically replaces the previous token
//! - **Digest-only storage**: tokens are hashed (`bcrypt` by default) before they reach storage
//! - **Lazy expiry**: expired records are ignored, not swept
//! - **Fail closed**: "could not verify" is an error, distinct from "invalid token"
//! - **Pluggable**: backend, hasher and clock are traits (`Redis`, `PostgreSQL`, mocks)
//!
//! ## Architecture
//!
//! ```text
//! Controller → TokenStore → TokenHasher (hash / verify)
//!                         → TokenBackend (upsert / find / delete / count)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use passwordless_tokenstore::{AuthOutcome, TokenStoreBuilder};
//! use passwordless_tokenstore::mocks::{MockTokenBackend, MockTokenHasher};
//! use chrono::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> passwordless_tokenstore::Result<()> {
//! let store = TokenStoreBuilder::new()
//!     .backend(MockTokenBackend::new())
//!     .hasher(MockTokenHasher::new())
//!     .build()?;
//!
//! // 1. Issue a token and send it to the user
//! let token = store.issue("user-42", Duration::minutes(10), Some("/billing")).await?;
//!
//! // 2. User comes back with the token
//! let outcome = store.authenticate(&token, "user-42").await?;
//! assert_eq!(outcome, AuthOutcome::Valid { origin: "/billing".to_string() });
//!
//! // 3. A wrong token is rejected, not an error
//! assert!(!store.authenticate("guess", "user-42").await?.is_valid());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod error;
pub mod providers;
pub mod store;
pub mod stores;
pub mod utils;

// Mock providers for testing
#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use config::TokenStoreConfig;
pub use error::{Result, TokenStoreError};
pub use providers::TokenRecord;
pub use store::{AuthOutcome, TokenStore, TokenStoreBuilder};
