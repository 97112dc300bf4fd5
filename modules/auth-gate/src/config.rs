use serde::{Deserialize, Serialize};
use storefront_security::Role;

fn default_cookie_name() -> String {
    "accessToken".to_owned()
}

fn default_accept_bearer_header() -> bool {
    true
}

fn default_login_path() -> String {
    "/login".to_owned()
}

fn default_home_path() -> String {
    "/".to_owned()
}

fn default_unauthorized_path() -> String {
    "/unauthorized".to_owned()
}

fn default_matcher() -> Vec<String> {
    vec!["/".to_owned(), "/{*path}".to_owned()]
}

fn default_rules() -> Vec<RouteRule> {
    vec![RouteRule {
        path: default_unauthorized_path(),
        access: RouteAccess::Public,
    }]
}

/// Authorization gate configuration.
///
/// Paths use matchit syntax (`/users/{id}`, `/{*rest}`); Axum-style `:param`
/// segments are accepted and converted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthGateConfig {
    /// Cookie holding the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Fall back to `Authorization: Bearer` when the cookie is absent.
    #[serde(default = "default_accept_bearer_header")]
    pub accept_bearer_header: bool,

    /// Always public; admins hitting it are sent home.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_home_path")]
    pub home_path: String,

    /// Destination for authenticated callers lacking the required role.
    /// Must not itself be gated, otherwise callers would loop.
    #[serde(default = "default_unauthorized_path")]
    pub unauthorized_path: String,

    /// Paths the gate applies to. Requests outside these patterns pass through untouched.
    #[serde(default = "default_matcher")]
    pub matcher: Vec<String>,

    /// Explicit per-path access rules. The most specific matching pattern wins.
    #[serde(default = "default_rules")]
    pub rules: Vec<RouteRule>,

    /// Access required by in-scope paths no rule matches.
    #[serde(default)]
    pub default_access: RouteAccess,
}

impl Default for AuthGateConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            accept_bearer_header: default_accept_bearer_header(),
            login_path: default_login_path(),
            home_path: default_home_path(),
            unauthorized_path: default_unauthorized_path(),
            matcher: default_matcher(),
            rules: default_rules(),
            default_access: RouteAccess::default(),
        }
    }
}

/// One entry of the static route rule table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRule {
    pub path: String,
    pub access: RouteAccess,
}

impl RouteRule {
    #[must_use]
    pub fn new(path: impl Into<String>, access: RouteAccess) -> Self {
        Self {
            path: path.into(),
            access,
        }
    }
}

/// Access level a route demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAccess {
    /// No identity needed.
    Public,
    /// Any verified identity.
    Authenticated,
    /// Customer role (admins qualify too).
    Customer,
    /// Admin role.
    #[default]
    Admin,
}

impl RouteAccess {
    /// Role a caller must hold, if any.
    #[must_use]
    pub fn required_role(self) -> Option<Role> {
        match self {
            Self::Public | Self::Authenticated => None,
            Self::Customer => Some(Role::Customer),
            Self::Admin => Some(Role::Admin),
        }
    }
}
