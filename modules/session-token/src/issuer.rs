//! Token issuance for developer tooling and tests.
//!
//! Production tokens come from the login endpoint; this mirrors its format so
//! the gate can be exercised end to end.

use std::time::Duration;

use jsonwebtoken::{EncodingKey, Header};
use storefront_security::{Identity, Role};

use crate::claims::SessionClaims;
use crate::config::SessionTokenConfig;
use crate::error::{IssueError, SessionConfigError};

/// Mints HS256 session tokens with the configured secret.
pub struct TokenIssuer {
    key: EncodingKey,
    default_ttl: Duration,
}

impl TokenIssuer {
    /// Build an issuer from configuration.
    ///
    /// # Errors
    /// Returns `EmptySecret` if the configured secret is empty.
    pub fn from_config(cfg: &SessionTokenConfig) -> Result<Self, SessionConfigError> {
        cfg.validate()?;
        Ok(Self {
            key: EncodingKey::from_secret(cfg.secret_bytes()),
            default_ttl: Duration::from_secs(cfg.token_ttl_secs),
        })
    }

    /// Issue a token for `identity` with the configured lifetime.
    ///
    /// # Errors
    /// See [`TokenIssuer::issue_with_ttl`].
    pub fn issue(&self, identity: &Identity) -> Result<String, IssueError> {
        self.issue_with_ttl(identity, self.default_ttl)
    }

    /// Issue a token for `identity` valid for `ttl` from now.
    ///
    /// # Errors
    /// - `EmptySubject` if the identity has no subject id
    /// - `UnrecognizedRole` if the identity's role is not a known tag
    /// - `Signing` if encoding fails
    pub fn issue_with_ttl(&self, identity: &Identity, ttl: Duration) -> Result<String, IssueError> {
        if identity.subject_id().trim().is_empty() {
            return Err(IssueError::EmptySubject);
        }
        if identity.role() == Role::Unrecognized {
            return Err(IssueError::UnrecognizedRole);
        }

        let claims =
            SessionClaims::for_identity(identity, jsonwebtoken::get_current_timestamp(), ttl);
        self.issue_claims(&claims)
    }

    /// Sign arbitrary claims without validating them.
    ///
    /// # Errors
    /// Returns `Signing` if encoding fails.
    pub fn issue_claims(&self, claims: &SessionClaims) -> Result<String, IssueError> {
        Ok(jsonwebtoken::encode(&Header::default(), claims, &self.key)?)
    }
}
