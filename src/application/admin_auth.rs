//! Admin credential check.
//!
//! Only the SHA-256 digest of the configured key is kept in memory; presented
//! keys are hashed and compared in constant time.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminAuthError {
    #[error("missing admin api key")]
    Missing,
    #[error("invalid admin api key")]
    Invalid,
    #[error("admin api key is not configured")]
    NotConfigured,
}

#[derive(Clone)]
pub struct AdminAuthenticator {
    hashed_key: Option<Vec<u8>>,
}

impl AdminAuthenticator {
    /// `None` (or a blank key) refuses every request.
    pub fn new(api_key: Option<&str>) -> Self {
        let hashed_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(Self::hash_secret);
        Self { hashed_key }
    }

    pub fn is_configured(&self) -> bool {
        self.hashed_key.is_some()
    }

    pub fn authenticate(&self, presented: Option<&str>) -> Result<(), AdminAuthError> {
        let expected = self
            .hashed_key
            .as_ref()
            .ok_or(AdminAuthError::NotConfigured)?;
        let presented = presented
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AdminAuthError::Missing)?;

        let hashed_input = Self::hash_secret(presented);
        if expected.ct_eq(&hashed_input).unwrap_u8() == 0 {
            return Err(AdminAuthError::Invalid);
        }
        Ok(())
    }

    fn hash_secret(secret: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.finalize().to_vec()
    }
}

impl std::fmt::Debug for AdminAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuthenticator")
            .field("configured", &self.is_configured())
            .finish()
    }
}
