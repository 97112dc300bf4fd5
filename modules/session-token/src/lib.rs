//! Session tokens for the storefront.
//!
//! A session token is a compact JWS signed with HMAC-SHA256 whose claims carry
//! the account `id`, its `role` and an `exp` expiry. This crate verifies such
//! tokens into an [`Identity`](storefront_security::Identity) and, for
//! tooling and tests, issues them.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod claims;
pub mod config;
pub mod error;
pub mod issuer;
pub mod verifier;

pub use api::TokenVerifier;
pub use claims::SessionClaims;
pub use config::SessionTokenConfig;
pub use error::{IssueError, SessionConfigError, VerificationFailure};
pub use issuer::TokenIssuer;
pub use verifier::HmacTokenVerifier;
