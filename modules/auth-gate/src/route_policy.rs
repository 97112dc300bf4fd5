use storefront_security::Role;

use crate::config::{AuthGateConfig, RouteAccess};
use crate::error::GateConfigError;

/// Path matcher backed by a matchit router.
#[derive(Clone)]
struct PathMatcher<T> {
    matcher: matchit::Router<T>,
}

impl<T> PathMatcher<T> {
    fn new() -> Self {
        Self {
            matcher: matchit::Router::new(),
        }
    }

    fn insert(&mut self, pattern: &str, value: T) -> Result<(), GateConfigError> {
        let matchit_path = convert_axum_path_to_matchit(pattern);
        self.matcher
            .insert(matchit_path, value)
            .map_err(|source| GateConfigError::InvalidPattern {
                pattern: pattern.to_owned(),
                source,
            })
    }

    fn find(&self, path: &str) -> Option<&T> {
        self.matcher.at(path).ok().map(|m| m.value)
    }
}

/// Rewrite `:name` segments as `{name}` so rule tables written for older
/// axum routers still load.
fn convert_axum_path_to_matchit(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) if !name.is_empty() => format!("{{{name}}}"),
            _ => segment.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip a trailing slash so `/dashboard/` and `/dashboard` classify alike.
fn normalize_path(path: &str) -> &str {
    if path.is_empty() {
        return "/";
    }
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}

/// Classification of an in-scope request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// The login page: public, but admins are sent home.
    Login,
    /// No identity needed.
    Public,
    /// Any verified identity.
    Authenticated,
    /// Verified identity holding the given role.
    RequiresRole(Role),
}

impl From<RouteAccess> for RouteClass {
    fn from(access: RouteAccess) -> Self {
        match access.required_role() {
            Some(role) => Self::RequiresRole(role),
            None if access == RouteAccess::Public => Self::Public,
            None => Self::Authenticated,
        }
    }
}

/// Static route rule table, built once at startup.
#[derive(Clone)]
pub struct RoutePolicy {
    scope: PathMatcher<()>,
    rules: PathMatcher<RouteAccess>,
    login_path: String,
    default_access: RouteAccess,
}

impl RoutePolicy {
    /// Build the rule table from configuration.
    ///
    /// # Errors
    /// - `InvalidPattern` if a matcher or rule pattern is rejected by matchit
    ///   (bad syntax or a duplicate)
    /// - `InvalidPath` if the login path is not absolute
    pub fn from_config(cfg: &AuthGateConfig) -> Result<Self, GateConfigError> {
        let login_path = absolute_path("login_path", &cfg.login_path)?;

        let mut scope = PathMatcher::new();
        for pattern in &cfg.matcher {
            scope.insert(pattern, ())?;
        }

        let mut rules = PathMatcher::new();
        for rule in &cfg.rules {
            rules.insert(&rule.path, rule.access)?;
        }

        Ok(Self {
            scope,
            rules,
            login_path: normalize_path(login_path).to_owned(),
            default_access: cfg.default_access,
        })
    }

    /// Classify a request path.
    ///
    /// Returns `None` when the path is outside the gate's scope.
    #[must_use]
    pub fn classify(&self, path: &str) -> Option<RouteClass> {
        let path = normalize_path(path);

        self.scope.find(path)?;

        if path == self.login_path {
            return Some(RouteClass::Login);
        }

        let access = self
            .rules
            .find(path)
            .copied()
            .unwrap_or(self.default_access);

        Some(RouteClass::from(access))
    }
}

pub(crate) fn absolute_path<'a>(
    field: &'static str,
    value: &'a str,
) -> Result<&'a str, GateConfigError> {
    if value.starts_with('/') {
        Ok(value)
    } else {
        Err(GateConfigError::InvalidPath {
            field,
            value: value.to_owned(),
        })
    }
}
