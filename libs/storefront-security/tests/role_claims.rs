#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde::Deserialize;
use storefront_security::{Identity, Role};

/// Shape of the claims a storefront token carries, minus the registered ones.
#[derive(Deserialize)]
struct Claims {
    id: String,
    role: Role,
}

fn identity_from(json: &str) -> Identity {
    let claims: Claims = serde_json::from_str(json).unwrap();
    Identity::new(claims.id, claims.role)
}

#[test]
fn admin_claims_produce_admin_identity() {
    let identity = identity_from(r#"{"id":"u1","role":"ADMIN"}"#);

    assert_eq!(identity.subject_id(), "u1");
    assert!(identity.is_admin());
}

#[test]
fn customer_claims_produce_customer_identity() {
    let identity = identity_from(r#"{"id":"u2","role":"CUSTOMER"}"#);

    assert_eq!(identity.role(), Role::Customer);
    assert!(!identity.has_role(Role::Admin));
}

#[test]
fn unexpected_role_tag_is_kept_as_unrecognized() {
    let identity = identity_from(r#"{"id":"u3","role":"VENDOR"}"#);

    assert_eq!(identity.role(), Role::Unrecognized);
    assert!(!identity.has_role(Role::Customer));
}

#[test]
fn missing_role_claim_is_rejected() {
    let result: Result<Claims, _> = serde_json::from_str(r#"{"id":"u4"}"#);
    assert!(result.is_err());
}
