use serde::{Deserialize, Serialize};

use crate::role::Role;

/// `Identity` is the verified caller behind a single request.
///
/// Built from the claims of a verified session token and attached to the
/// request by the authorization gate. It lives only for the duration of the
/// request and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque account identifier, unique per account.
    subject_id: String,
    /// Role tag read from the token.
    role: Role,
}

impl Identity {
    #[must_use]
    pub fn new(subject_id: impl Into<String>, role: Role) -> Self {
        Self {
            subject_id: subject_id.into(),
            role,
        }
    }

    /// Get the account identifier of the caller
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether this identity satisfies a route's role requirement.
    #[must_use]
    pub fn has_role(&self, required: Role) -> bool {
        self.role.grants(required)
    }
}
