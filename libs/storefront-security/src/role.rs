use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role tag carried by a session token.
///
/// The set is closed. Tags the storefront does not know decode to
/// [`Role::Unrecognized`], which never satisfies a role requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Back-office staff with access to the admin dashboard.
    Admin,
    /// Shopper account.
    Customer,
    /// Any tag outside the known set.
    #[serde(other)]
    Unrecognized,
}

impl Role {
    /// Wire representation used in token claims.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Customer => "CUSTOMER",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Whether a holder of `self` may access a route that requires `required`.
    ///
    /// Admins satisfy customer requirements as well; an unrecognized role
    /// satisfies nothing, including an `Unrecognized` requirement.
    #[must_use]
    pub fn grants(self, required: Role) -> bool {
        match self {
            Self::Admin => matches!(required, Self::Admin | Self::Customer),
            Self::Customer => matches!(required, Self::Customer),
            Self::Unrecognized => false,
        }
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a role tag outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}', expected ADMIN or CUSTOMER")]
pub struct UnknownRoleError(pub String);

impl FromStr for Role {
    type Err = UnknownRoleError;

    /// Parses a known role tag, ignoring ASCII case.
    ///
    /// Unlike deserialization from token claims, parsing never yields
    /// [`Role::Unrecognized`]: configuration and CLI input must name a real role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag.eq_ignore_ascii_case("ADMIN") {
            Ok(Self::Admin)
        } else if tag.eq_ignore_ascii_case("CUSTOMER") {
            Ok(Self::Customer)
        } else {
            Err(UnknownRoleError(tag.to_owned()))
        }
    }
}
