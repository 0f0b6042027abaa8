//! API key guard
//!
//! Auth is off when no key is configured. Otherwise the caller's `X-API-Key`
//! must equal the configured key after trimming.

use crate::error::AnalysisError;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Name of the credential header
pub const API_KEY_HEADER: &str = "x-api-key";

/// Compare a supplied credential against the configured secret
///
/// An empty secret disables the check.
#[must_use]
pub fn check(configured_secret: &str, supplied: Option<&str>) -> bool {
    if configured_secret.is_empty() {
        return true;
    }
    supplied.is_some_and(|key| key.trim().as_bytes().ct_eq(configured_secret.as_bytes()).into())
}

/// Process-wide credential check
#[derive(Debug, Clone, Default)]
pub struct AuthGuard {
    secret: Option<Arc<SecretString>>,
}

impl AuthGuard {
    /// Build from the configured key; blank means auth is disabled
    #[must_use]
    pub fn new(configured: &str) -> Self {
        let trimmed = configured.trim();
        if trimmed.is_empty() {
            Self::disabled()
        } else {
            Self {
                secret: Some(Arc::new(SecretString::from(trimmed.to_string()))),
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self { secret: None }
    }

    /// Whether callers must present a key
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.secret.is_some()
    }

    #[must_use]
    pub fn check(&self, supplied: Option<&str>) -> bool {
        match &self.secret {
            None => true,
            Some(secret) => check(secret.expose_secret(), supplied),
        }
    }

    /// [`AuthGuard::check`] as a `Result`
    ///
    /// # Errors
    /// `AnalysisError::Unauthorized` when the check fails.
    pub fn authorize(&self, supplied: Option<&str>) -> Result<(), AnalysisError> {
        if self.check(supplied) {
            Ok(())
        } else {
            Err(AnalysisError::Unauthorized)
        }
    }
}
