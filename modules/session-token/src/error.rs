//! Error types for session tokens.

use thiserror::Error;

/// Why a presented token was not accepted.
///
/// None of these are surfaced to end users: the gate downgrades every failure
/// to an anonymous request and only logs the reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    /// The token is not a well-formed JWS or its claims do not decode.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The signature does not match the configured secret.
    #[error("invalid signature")]
    InvalidSignature,

    /// The `exp` claim is in the past.
    #[error("token expired")]
    Expired,

    /// The `nbf` claim is in the future.
    #[error("token not yet valid")]
    NotYetValid,

    /// A required claim is absent or empty.
    #[error("missing required claim: {0}")]
    MissingClaim(String),

    /// The header names an algorithm other than the one the verifier accepts.
    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,
}

/// Invalid session token configuration, detected at startup.
#[derive(Debug, Error)]
pub enum SessionConfigError {
    #[error("session signing secret is empty")]
    EmptySecret,
}

/// Errors raised while issuing a token.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("subject id must not be empty")]
    EmptySubject,

    #[error("cannot issue a token for an unrecognized role")]
    UnrecognizedRole,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}
