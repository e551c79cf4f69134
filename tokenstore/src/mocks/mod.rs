//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of all provider traits
//! for use in unit and integration tests. Each mock is `Clone` and clones share
//! state, so a test can keep a handle after moving a copy into the store.

pub mod backend;
pub mod clock;
pub mod hasher;

pub use backend::MockTokenBackend;
pub use clock::MockClock;
pub use hasher::MockTokenHasher;
