//! Storage implementations for the token store.
//!
//! - **Redis** - All records in one hash, upsert via `HSET`
//! - **PostgreSQL** - `passwordless_tokens` table, upsert via `ON CONFLICT` (feature `postgres`)

#[cfg(feature = "postgres")]
pub mod postgres;
pub mod token_redis;

// Re-exports
#[cfg(feature = "postgres")]
pub use postgres::PostgresTokenBackend;
pub use token_redis::RedisTokenBackend;
