//! Token store providers.
//!
//! This module defines traits for the external collaborators of the token
//! store. These traits enable dependency injection and make the token
//! lifecycle logic testable.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   store_or_update / authenticate
//! │ Auth controller  │──────────────────────────┐
//! └──────────────────┘                          ▼
//!                                      ┌──────────────────┐
//!                                      │ TokenStore       │
//!                                      │ - validates      │
//!                                      │ - computes TTL   │
//!                                      └──┬─────┬─────┬───┘
//!                                         │     │     │
//!                          ┌──────────────┘     │     └─────────────┐
//!                          ▼                    ▼                   ▼
//!                 ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!                 │ TokenBackend │    │ TokenHasher  │    │ Clock        │
//!                 │ Redis / PG   │    │ bcrypt       │    │ system       │
//!                 └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! This enables:
//! - **Testing**: Use mocks (in-memory, deterministic, failure injection)
//! - **Production**: Use real services (`Redis`, `PostgreSQL`, `bcrypt`)

pub mod backend;
pub mod bcrypt_hasher;
pub mod clock;
pub mod hasher;

// Re-export provider traits
pub use backend::{TokenBackend, TokenRecord};
pub use bcrypt_hasher::BcryptHasher;
pub use clock::{Clock, SystemClock};
pub use hasher::TokenHasher;
