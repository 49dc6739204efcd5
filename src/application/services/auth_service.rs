//! Authentication service for the admin API token.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Length of the per-process MAC key.
const KEY_LENGTH_BYTES: usize = 32;

/// Checks Bearer tokens against the configured admin token.
///
/// Only an HMAC-SHA256 tag of the configured token is kept, keyed with
/// random bytes drawn at startup. Candidates are tagged with the same key and
/// compared with [`Mac::verify_slice`], which runs in constant time.
pub struct AuthService {
    key: [u8; KEY_LENGTH_BYTES],
    expected_tag: Vec<u8>,
}

impl AuthService {
    /// Creates the service for `admin_token`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the system random number generator fails.
    pub fn new(admin_token: &str) -> Result<Self, AppError> {
        let mut key = [0u8; KEY_LENGTH_BYTES];
        getrandom::fill(&mut key).map_err(|e| {
            AppError::internal(
                "Failed to generate authentication key",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let expected_tag = tag(&key, admin_token)?.finalize().into_bytes().to_vec();

        Ok(Self { key, expected_tag })
    }

    /// Authenticates a raw Bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        tag(&self.key, token)?
            .verify_slice(&self.expected_tag)
            .map_err(|_| {
                AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid token" }))
            })
    }
}

fn tag(key: &[u8], token: &str) -> Result<HmacSha256, AppError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| {
        AppError::internal("Invalid HMAC key", json!({ "reason": e.to_string() }))
    })?;
    mac.update(token.as_bytes());
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "a-sufficiently-long-admin-token";

    #[test]
    fn test_authenticate_success() {
        let service = AuthService::new(TOKEN).unwrap();
        assert!(service.authenticate(TOKEN).is_ok());
    }

    #[test]
    fn test_authenticate_wrong_token() {
        let service = AuthService::new(TOKEN).unwrap();

        let result = service.authenticate("a-sufficiently-long-admin-tokeN");

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_authenticate_prefix_and_empty_rejected() {
        let service = AuthService::new(TOKEN).unwrap();
        assert!(service.authenticate(&TOKEN[..10]).is_err());
        assert!(service.authenticate("").is_err());
    }

    #[test]
    fn test_keys_differ_between_instances() {
        let a = AuthService::new(TOKEN).unwrap();
        let b = AuthService::new(TOKEN).unwrap();
        assert_ne!(a.expected_tag, b.expected_tag);
    }
}
