//! Verification seam consumed by the authorization gate.

use storefront_security::Identity;

use crate::error::VerificationFailure;

/// Verifies a raw session token and returns the identity it asserts.
///
/// Verification is a single synchronous cryptographic check. Implementations
/// are shared across concurrently handled requests.
///
/// ```ignore
/// let verifier: Arc<dyn TokenVerifier> = Arc::new(HmacTokenVerifier::from_config(&cfg)?);
/// match verifier.verify(raw) {
///     Ok(identity) => { /* authenticated */ }
///     Err(failure) => { /* treat as anonymous */ }
/// }
/// ```
pub trait TokenVerifier: Send + Sync {
    /// Verify `raw_token` and decode the identity it carries.
    ///
    /// # Errors
    ///
    /// - `Malformed` if the token is not a well-formed JWS or its claims do not decode
    /// - `InvalidSignature` if the signature does not match the configured secret
    /// - `Expired` / `NotYetValid` if the token is outside its validity window
    /// - `MissingClaim` if a required claim is absent or empty
    /// - `UnexpectedAlgorithm` if the header names a different algorithm
    fn verify(&self, raw_token: &str) -> Result<Identity, VerificationFailure>;
}
