use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_security::{Identity, Role};

/// Claims carried by a storefront session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account identifier.
    pub id: String,
    /// Role tag; unknown tags decode to [`Role::Unrecognized`].
    pub role: Role,
    /// Expiry, seconds since the Unix epoch.
    pub exp: u64,
    /// Issue time, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

impl SessionClaims {
    /// Claims for `identity`, valid for `ttl` from `issued_at`.
    #[must_use]
    pub fn for_identity(identity: &Identity, issued_at: u64, ttl: Duration) -> Self {
        Self {
            id: identity.subject_id().to_owned(),
            role: identity.role(),
            exp: issued_at.saturating_add(ttl.as_secs()),
            iat: Some(issued_at),
        }
    }

    #[must_use]
    pub fn into_identity(self) -> Identity {
        Identity::new(self.id, self.role)
    }
}
