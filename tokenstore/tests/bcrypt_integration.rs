//! End-to-end test with the real `bcrypt` hasher.

use chrono::Duration;
use passwordless_tokenstore::mocks::MockTokenBackend;
use passwordless_tokenstore::providers::bcrypt_hasher::MIN_BCRYPT_COST;
use passwordless_tokenstore::{AuthOutcome, TokenStore, TokenStoreConfig, TokenStoreError};

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_bcrypt_store_full_flow() {
    let backend = MockTokenBackend::new();
    let store = TokenStore::new(
        backend.clone(),
        TokenStoreConfig::new().with_hash_cost(MIN_BCRYPT_COST),
    )
    .unwrap();

    let token = store
        .issue("alice@example.com", Duration::minutes(10), Some("/welcome"))
        .await
        .unwrap();

    let digest = backend.get("alice@example.com").unwrap().token_digest;
    assert!(digest.starts_with("$2b$04$"));

    assert_eq!(
        store.authenticate(&token, "alice@example.com").await.unwrap(),
        AuthOutcome::Valid { origin: "/welcome".to_string() }
    );
    assert_eq!(
        store.authenticate("not-the-token", "alice@example.com").await.unwrap(),
        AuthOutcome::Invalid
    );
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_bcrypt_rejects_unsupported_cost_without_writing() {
    let backend = MockTokenBackend::new();
    let store = TokenStore::new(backend.clone(), TokenStoreConfig::new().with_hash_cost(2)).unwrap();

    let err = store
        .store_or_update("token", "alice", Duration::minutes(1), None)
        .await
        .unwrap_err();

    assert!(matches!(err, TokenStoreError::Hashing(_)));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_bcrypt_tokens_sharing_72_byte_prefix_are_distinct() {
    let backend = MockTokenBackend::new();
    let store = TokenStore::new(
        backend.clone(),
        TokenStoreConfig::new().with_hash_cost(MIN_BCRYPT_COST),
    )
    .unwrap();
    let prefix = "A".repeat(72);

    let err = store
        .store_or_update(&format!("{prefix}X"), "u", Duration::minutes(1), None)
        .await
        .unwrap_err();
    assert!(matches!(err, TokenStoreError::Hashing(_)));
    assert_eq!(backend.call_count(), 0);

    store
        .store_or_update(&prefix, "u", Duration::minutes(1), None)
        .await
        .unwrap();

    assert_eq!(
        store.authenticate(&format!("{prefix}Y"), "u").await.unwrap(),
        AuthOutcome::Invalid
    );
    assert!(store.authenticate(&prefix, "u").await.unwrap().is_valid());
}
