//! HMAC-SHA256 verification of session tokens.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use storefront_security::Identity;

use crate::api::TokenVerifier;
use crate::claims::SessionClaims;
use crate::config::SessionTokenConfig;
use crate::error::{SessionConfigError, VerificationFailure};

/// Secrets shorter than this are accepted but reported at startup.
const RECOMMENDED_SECRET_LEN: usize = 32;

/// Verifies HS256 session tokens against the process-wide secret.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct HmacTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl HmacTokenVerifier {
    /// Build a verifier from configuration.
    ///
    /// # Errors
    /// Returns `EmptySecret` if the configured secret is empty.
    pub fn from_config(cfg: &SessionTokenConfig) -> Result<Self, SessionConfigError> {
        cfg.validate()?;

        if cfg.secret_bytes().len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                min_len = RECOMMENDED_SECRET_LEN,
                "Session signing secret is shorter than recommended"
            );
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = cfg.leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            key: DecodingKey::from_secret(cfg.secret_bytes()),
            validation,
        })
    }
}

impl TokenVerifier for HmacTokenVerifier {
    fn verify(&self, raw_token: &str) -> Result<Identity, VerificationFailure> {
        let raw_token = raw_token.trim();
        if raw_token.is_empty() {
            return Err(VerificationFailure::Malformed("empty token".to_owned()));
        }

        let data = jsonwebtoken::decode::<SessionClaims>(raw_token, &self.key, &self.validation)
            .map_err(|e| map_jwt_error(&e))?;

        let claims = data.claims;
        if claims.id.trim().is_empty() {
            return Err(VerificationFailure::MissingClaim("id".to_owned()));
        }

        Ok(claims.into_identity())
    }
}

fn map_jwt_error(err: &jsonwebtoken::errors::Error) -> VerificationFailure {
    match err.kind() {
        ErrorKind::InvalidSignature => VerificationFailure::InvalidSignature,
        ErrorKind::ExpiredSignature => VerificationFailure::Expired,
        ErrorKind::ImmatureSignature => VerificationFailure::NotYetValid,
        ErrorKind::MissingRequiredClaim(claim) => VerificationFailure::MissingClaim(claim.clone()),
        ErrorKind::InvalidAlgorithm => VerificationFailure::UnexpectedAlgorithm,
        _ => VerificationFailure::Malformed(err.to_string()),
    }
}
