//! Utility functions for the token store.

use crate::error::{Result, TokenStoreError};
use chrono::Duration;

/// Generate a cryptographically secure random token.
///
/// Returns a 256-bit random token encoded as base64url (43 characters),
/// suitable as the plaintext passed to
/// [`TokenStore::store_or_update`](crate::TokenStore::store_or_update).
///
/// # Examples
///
/// ```
/// use passwordless_tokenstore::utils::generate_token;
///
/// let token = generate_token();
/// assert_eq!(token.len(), 43);
/// assert_ne!(token, generate_token());
/// ```
#[must_use]
pub fn generate_token() -> String {
    use base64::Engine;
    use rand::RngCore;

    let mut rng = rand::thread_rng();
    let mut random_bytes = [0u8; 32];
    rng.fill_bytes(&mut random_bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Reject an empty argument.
///
/// # Errors
///
/// Returns [`TokenStoreError::InvalidArgument`] naming `field` if `value` is empty.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TokenStoreError::InvalidArgument(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

/// Reject a time-to-live shorter than one millisecond.
///
/// # Errors
///
/// Returns [`TokenStoreError::InvalidArgument`] if `ttl` is under 1ms,
/// including zero and negative values.
pub fn require_positive_ttl(ttl: Duration) -> Result<()> {
    if ttl < Duration::milliseconds(1) {
        return Err(TokenStoreError::InvalidArgument(format!(
            "ttl must be at least 1ms, got {}us",
            ttl.num_microseconds().unwrap_or(i64::MIN)
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generated_token_is_url_safe() {
        let token = generate_token();

        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_empty_argument_names_field() {
        let err = require_non_empty("subject_id", "").unwrap_err();
        assert_eq!(
            err,
            TokenStoreError::InvalidArgument("subject_id must not be empty".to_string())
        );
    }

    #[test]
    fn test_ttl_boundaries() {
        assert!(require_positive_ttl(Duration::milliseconds(1)).is_ok());
        assert!(require_positive_ttl(Duration::zero()).is_err());
        assert!(require_positive_ttl(Duration::microseconds(999)).is_err());
        assert!(require_positive_ttl(Duration::milliseconds(-1)).is_err());
    }

    proptest! {
        #[test]
        fn prop_non_empty_strings_accepted(value in ".+") {
            prop_assert!(require_non_empty("token", &value).is_ok());
        }

        #[test]
        fn prop_ttl_sign_decides(ms in any::<i32>()) {
            let result = require_positive_ttl(Duration::milliseconds(i64::from(ms)));
            prop_assert_eq!(result.is_ok(), ms > 0);
        }
    }
}
