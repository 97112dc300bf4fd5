//! Configuration for session token verification and issuance.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::SessionConfigError;

/// Session token configuration.
///
/// The secret has no default and is expected to come from the process
/// environment. `SecretString` keeps it out of `Debug` output.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionTokenConfig {
    /// HMAC-SHA256 signing secret shared with the token issuer.
    pub secret: SecretString,

    /// Clock skew tolerated when checking `exp` and `nbf`, in seconds.
    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,

    /// Lifetime of tokens minted by [`TokenIssuer`](crate::TokenIssuer), in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_leeway_secs() -> u64 {
    0
}

fn default_token_ttl_secs() -> u64 {
    60 * 60
}

impl SessionTokenConfig {
    /// Configuration with the given secret and default timings.
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            leeway_secs: default_leeway_secs(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }

    /// Check the configuration before any key material is derived from it.
    ///
    /// # Errors
    /// Returns `EmptySecret` if the secret is empty or whitespace only.
    pub fn validate(&self) -> Result<(), SessionConfigError> {
        if self.secret.expose_secret().trim().is_empty() {
            return Err(SessionConfigError::EmptySecret);
        }
        Ok(())
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}
