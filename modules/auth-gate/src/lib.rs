//! Request authorization gate for the storefront.
//!
//! The gate verifies the session token carried by a request, classifies the
//! requested path against a static rule table and decides between letting the
//! request through and redirecting it to the login, unauthorized or home page.
//!
//! Decision table, in priority order:
//!
//! | path                  | identity            | outcome                 |
//! |-----------------------|---------------------|-------------------------|
//! | outside matcher scope | any                 | pass-through            |
//! | login                 | admin               | redirect to home        |
//! | login or public       | anything else       | pass-through            |
//! | gated                 | none                | redirect to login       |
//! | gated                 | lacks required role | redirect to unauthorized|
//! | gated                 | satisfies rule      | pass-through            |
//!
//! Tampered, malformed and expired tokens are logged and treated exactly like
//! a missing token.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod route_policy;

pub use config::{AuthGateConfig, RouteAccess, RouteRule};
pub use error::GateConfigError;
pub use gate::{AuthGate, GateDecision, Outcome, decide};
pub use middleware::{Authenticated, MissingIdentity, auth_gate_middleware};
pub use route_policy::{RouteClass, RoutePolicy};
