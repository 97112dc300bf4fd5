//! The authorization decision: token verification, route classification and
//! the resulting outcome.

use std::sync::Arc;

use axum::http::HeaderValue;
use session_token::TokenVerifier;
use storefront_security::Identity;

use crate::config::AuthGateConfig;
use crate::error::GateConfigError;
use crate::route_policy::{RouteClass, RoutePolicy, absolute_path};

/// What the gate decided for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Let the request proceed unmodified.
    PassThrough,
    RedirectToLogin,
    RedirectToUnauthorized,
    RedirectToHome,
}

/// Outcome plus the identity verified along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    pub outcome: Outcome,
    pub identity: Option<Identity>,
}

/// Decision table for an in-scope route.
///
/// `class == None` means the path is outside the gate's scope.
#[must_use]
pub fn decide(class: Option<RouteClass>, identity: Option<&Identity>) -> Outcome {
    let Some(class) = class else {
        return Outcome::PassThrough;
    };

    match (class, identity) {
        (RouteClass::Login, Some(id)) if id.is_admin() => Outcome::RedirectToHome,
        (RouteClass::Login | RouteClass::Public, _) => Outcome::PassThrough,
        (RouteClass::Authenticated | RouteClass::RequiresRole(_), None) => {
            Outcome::RedirectToLogin
        }
        (RouteClass::Authenticated, Some(_)) => Outcome::PassThrough,
        (RouteClass::RequiresRole(required), Some(id)) => {
            if id.has_role(required) {
                Outcome::PassThrough
            } else {
                Outcome::RedirectToUnauthorized
            }
        }
    }
}

struct RedirectTarget {
    path: String,
    location: HeaderValue,
}

impl RedirectTarget {
    fn from_config(field: &'static str, value: &str) -> Result<Self, GateConfigError> {
        let path = absolute_path(field, value)?;
        let location =
            HeaderValue::from_str(path).map_err(|_| GateConfigError::InvalidLocation {
                field,
                value: value.to_owned(),
            })?;
        Ok(Self {
            path: path.to_owned(),
            location,
        })
    }
}

struct RedirectTargets {
    login: RedirectTarget,
    home: RedirectTarget,
    unauthorized: RedirectTarget,
}

impl RedirectTargets {
    fn get(&self, outcome: Outcome) -> Option<&RedirectTarget> {
        match outcome {
            Outcome::PassThrough => None,
            Outcome::RedirectToLogin => Some(&self.login),
            Outcome::RedirectToUnauthorized => Some(&self.unauthorized),
            Outcome::RedirectToHome => Some(&self.home),
        }
    }
}

struct GateInner {
    verifier: Arc<dyn TokenVerifier>,
    policy: RoutePolicy,
    redirects: RedirectTargets,
    cookie_name: String,
    accept_bearer_header: bool,
}

/// Request authorization gate.
///
/// Immutable after construction and cheap to clone, so it can serve as axum
/// middleware state.
#[derive(Clone)]
pub struct AuthGate {
    inner: Arc<GateInner>,
}

impl AuthGate {
    /// Build the gate from configuration and an injected verifier.
    ///
    /// # Errors
    /// - `InvalidPath` if the login, home or unauthorized path is not absolute
    /// - `InvalidLocation` if one of those paths cannot be sent as a header
    /// - `InvalidPattern` if a route pattern is rejected
    /// - `RedirectLoop` if the unauthorized page would redirect its visitors
    ///   again, or the home page is the login page
    /// - `EmptyCookieName` if no cookie name is configured
    pub fn new(
        cfg: &AuthGateConfig,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Result<Self, GateConfigError> {
        if cfg.cookie_name.trim().is_empty() {
            return Err(GateConfigError::EmptyCookieName);
        }

        let redirects = RedirectTargets {
            login: RedirectTarget::from_config("login_path", &cfg.login_path)?,
            home: RedirectTarget::from_config("home_path", &cfg.home_path)?,
            unauthorized: RedirectTarget::from_config(
                "unauthorized_path",
                &cfg.unauthorized_path,
            )?,
        };

        let policy = RoutePolicy::from_config(cfg)?;

        // Only authenticated callers are sent there, so `Authenticated` is reachable
        if matches!(
            policy.classify(&redirects.unauthorized.path),
            Some(RouteClass::RequiresRole(_))
        ) {
            return Err(GateConfigError::RedirectLoop {
                field: "unauthorized_path",
                path: redirects.unauthorized.path,
            });
        }

        // Admins are sent home from the login page
        if policy.classify(&redirects.home.path) == Some(RouteClass::Login) {
            return Err(GateConfigError::RedirectLoop {
                field: "home_path",
                path: redirects.home.path,
            });
        }

        tracing::info!(
            cookie = %cfg.cookie_name,
            login = %redirects.login.path,
            default_access = ?cfg.default_access,
            rules = cfg.rules.len(),
            "Authorization gate configured"
        );

        Ok(Self {
            inner: Arc::new(GateInner {
                verifier,
                policy,
                redirects,
                cookie_name: cfg.cookie_name.clone(),
                accept_bearer_header: cfg.accept_bearer_header,
            }),
        })
    }

    /// Evaluate a request: verify the optional token, classify the path and
    /// apply the decision table.
    ///
    /// Never fails. Rejected tokens are logged and treated as absent.
    #[must_use]
    pub fn authorize(&self, raw_token: Option<&str>, path: &str) -> GateDecision {
        let class = self.inner.policy.classify(path);

        // Out-of-scope paths never look at the token
        let identity = match (class, raw_token) {
            (Some(_), Some(raw)) => self.verify(raw, path),
            _ => None,
        };

        let outcome = decide(class, identity.as_ref());
        tracing::debug!(
            path,
            ?class,
            authenticated = identity.is_some(),
            ?outcome,
            "Authorization gate decision"
        );

        GateDecision { outcome, identity }
    }

    /// Outcome only; see [`AuthGate::authorize`].
    #[must_use]
    pub fn evaluate(&self, raw_token: Option<&str>, path: &str) -> Outcome {
        self.authorize(raw_token, path).outcome
    }

    /// Redirect destination for `outcome`, or `None` for pass-through.
    #[must_use]
    pub fn redirect_location(&self, outcome: Outcome) -> Option<&str> {
        self.inner
            .redirects
            .get(outcome)
            .map(|target| target.path.as_str())
    }

    /// `Location` header for `outcome`, validated at construction.
    pub(crate) fn location_header(&self, outcome: Outcome) -> Option<&HeaderValue> {
        self.inner
            .redirects
            .get(outcome)
            .map(|target| &target.location)
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.inner.cookie_name
    }

    #[must_use]
    pub fn accepts_bearer_header(&self) -> bool {
        self.inner.accept_bearer_header
    }

    fn verify(&self, raw: &str, path: &str) -> Option<Identity> {
        match self.inner.verifier.verify(raw) {
            Ok(identity) => Some(identity),
            Err(failure) => {
                tracing::warn!(
                    path,
                    reason = %failure,
                    "Session token rejected, continuing as anonymous"
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use session_token::VerificationFailure;
    use storefront_security::Role;
    use tracing_test::traced_test;

    use super::*;
    use crate::config::{RouteAccess, RouteRule};

    /// Verifier that maps a few fixed strings to identities.
    struct FixedVerifier;

    impl TokenVerifier for FixedVerifier {
        fn verify(&self, raw_token: &str) -> Result<Identity, VerificationFailure> {
            match raw_token {
                "admin" => Ok(Identity::new("u1", Role::Admin)),
                "customer" => Ok(Identity::new("u2", Role::Customer)),
                "vendor" => Ok(Identity::new("u3", Role::Unrecognized)),
                "expired" => Err(VerificationFailure::Expired),
                _ => Err(VerificationFailure::InvalidSignature),
            }
        }
    }

    fn gate_with(cfg: &AuthGateConfig) -> AuthGate {
        AuthGate::new(cfg, Arc::new(FixedVerifier)).unwrap()
    }

    fn gate() -> AuthGate {
        gate_with(&AuthGateConfig::default())
    }

    #[test]
    fn decide_covers_login_rules() {
        let admin = Identity::new("u1", Role::Admin);
        let customer = Identity::new("u2", Role::Customer);

        assert_eq!(
            decide(Some(RouteClass::Login), Some(&admin)),
            Outcome::RedirectToHome
        );
        assert_eq!(
            decide(Some(RouteClass::Login), Some(&customer)),
            Outcome::PassThrough
        );
        assert_eq!(decide(Some(RouteClass::Login), None), Outcome::PassThrough);
    }

    #[test]
    fn decide_covers_gated_rules() {
        let admin = Identity::new("u1", Role::Admin);
        let customer = Identity::new("u2", Role::Customer);
        let admin_only = Some(RouteClass::RequiresRole(Role::Admin));

        assert_eq!(decide(admin_only, None), Outcome::RedirectToLogin);
        assert_eq!(
            decide(admin_only, Some(&customer)),
            Outcome::RedirectToUnauthorized
        );
        assert_eq!(decide(admin_only, Some(&admin)), Outcome::PassThrough);
        assert_eq!(
            decide(Some(RouteClass::Authenticated), Some(&customer)),
            Outcome::PassThrough
        );
        assert_eq!(
            decide(Some(RouteClass::Authenticated), None),
            Outcome::RedirectToLogin
        );
    }

    #[test]
    fn decide_passes_public_and_out_of_scope() {
        assert_eq!(decide(None, None), Outcome::PassThrough);
        assert_eq!(decide(Some(RouteClass::Public), None), Outcome::PassThrough);
    }

    #[test]
    fn admin_on_login_is_sent_home() {
        assert_eq!(
            gate().evaluate(Some("admin"), "/login"),
            Outcome::RedirectToHome
        );
    }

    #[test]
    fn anonymous_on_login_passes() {
        assert_eq!(gate().evaluate(None, "/login"), Outcome::PassThrough);
    }

    #[test]
    fn customer_on_login_passes() {
        assert_eq!(
            gate().evaluate(Some("customer"), "/login"),
            Outcome::PassThrough
        );
    }

    #[test]
    fn anonymous_on_dashboard_goes_to_login() {
        assert_eq!(
            gate().evaluate(None, "/dashboard"),
            Outcome::RedirectToLogin
        );
    }

    #[test]
    fn customer_on_dashboard_is_unauthorized() {
        assert_eq!(
            gate().evaluate(Some("customer"), "/dashboard"),
            Outcome::RedirectToUnauthorized
        );
    }

    #[test]
    fn admin_on_dashboard_passes() {
        let decision = gate().authorize(Some("admin"), "/dashboard");

        assert_eq!(decision.outcome, Outcome::PassThrough);
        assert_eq!(decision.identity, Some(Identity::new("u1", Role::Admin)));
    }

    #[test]
    fn unrecognized_role_fails_closed() {
        assert_eq!(
            gate().evaluate(Some("vendor"), "/dashboard"),
            Outcome::RedirectToUnauthorized
        );

        let cfg = AuthGateConfig {
            rules: vec![
                RouteRule::new("/unauthorized", RouteAccess::Public),
                RouteRule::new("/cart", RouteAccess::Customer),
            ],
            ..AuthGateConfig::default()
        };
        assert_eq!(
            gate_with(&cfg).evaluate(Some("vendor"), "/cart"),
            Outcome::RedirectToUnauthorized
        );
    }

    #[test]
    fn rejected_tokens_behave_like_missing_ones() {
        let gate = gate();

        for path in ["/login", "/dashboard", "/", "/unauthorized"] {
            let missing = gate.evaluate(None, path);
            assert_eq!(gate.evaluate(Some("tampered"), path), missing, "{path}");
            assert_eq!(gate.evaluate(Some("expired"), path), missing, "{path}");
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let gate = gate();

        for token in [None, Some("admin"), Some("customer"), Some("tampered")] {
            for path in ["/login", "/dashboard", "/orders/7"] {
                assert_eq!(
                    gate.authorize(token, path),
                    gate.authorize(token, path),
                    "{token:?} {path}"
                );
            }
        }
    }

    #[test]
    fn out_of_scope_paths_skip_verification() {
        let cfg = AuthGateConfig {
            matcher: vec!["/dashboard/{*rest}".to_owned()],
            ..AuthGateConfig::default()
        };
        let decision = gate_with(&cfg).authorize(Some("admin"), "/assets/app.css");

        assert_eq!(decision.outcome, Outcome::PassThrough);
        assert_eq!(decision.identity, None);
    }

    #[test]
    fn redirect_locations_follow_config() {
        let cfg = AuthGateConfig {
            login_path: "/account/sign-in".to_owned(),
            home_path: "/admin".to_owned(),
            unauthorized_path: "/forbidden".to_owned(),
            rules: vec![RouteRule::new("/forbidden", RouteAccess::Public)],
            ..AuthGateConfig::default()
        };
        let gate = gate_with(&cfg);

        assert_eq!(gate.redirect_location(Outcome::PassThrough), None);
        assert_eq!(
            gate.redirect_location(Outcome::RedirectToLogin),
            Some("/account/sign-in")
        );
        assert_eq!(
            gate.redirect_location(Outcome::RedirectToUnauthorized),
            Some("/forbidden")
        );
        assert_eq!(
            gate.redirect_location(Outcome::RedirectToHome),
            Some("/admin")
        );
    }

    #[test]
    fn gated_unauthorized_page_is_rejected() {
        let cfg = AuthGateConfig {
            rules: Vec::new(),
            ..AuthGateConfig::default()
        };

        let err = AuthGate::new(&cfg, Arc::new(FixedVerifier)).err().unwrap();
        assert!(matches!(
            err,
            GateConfigError::RedirectLoop { field: "unauthorized_path", path } if path == "/unauthorized"
        ));
    }

    #[test]
    fn authenticated_unauthorized_page_is_accepted() {
        let cfg = AuthGateConfig {
            rules: vec![RouteRule::new("/unauthorized", RouteAccess::Authenticated)],
            ..AuthGateConfig::default()
        };
        let gate = gate_with(&cfg);

        assert_eq!(
            gate.evaluate(Some("customer"), "/dashboard"),
            Outcome::RedirectToUnauthorized
        );
        assert_eq!(
            gate.evaluate(Some("customer"), "/unauthorized"),
            Outcome::PassThrough
        );
    }

    #[test]
    fn home_on_login_page_is_rejected() {
        let cfg = AuthGateConfig {
            home_path: "/login/".to_owned(),
            ..AuthGateConfig::default()
        };

        let err = AuthGate::new(&cfg, Arc::new(FixedVerifier)).err().unwrap();
        assert!(matches!(
            err,
            GateConfigError::RedirectLoop { field: "home_path", .. }
        ));
    }

    #[test]
    fn redirect_target_with_control_character_is_rejected() {
        let cfg = AuthGateConfig {
            login_path: "/log\nin".to_owned(),
            ..AuthGateConfig::default()
        };

        let err = AuthGate::new(&cfg, Arc::new(FixedVerifier)).err().unwrap();
        assert!(matches!(
            err,
            GateConfigError::InvalidLocation {
                field: "login_path",
                ..
            }
        ));
    }

    #[test]
    fn empty_cookie_name_is_rejected() {
        let cfg = AuthGateConfig {
            cookie_name: " ".to_owned(),
            ..AuthGateConfig::default()
        };

        let err = AuthGate::new(&cfg, Arc::new(FixedVerifier)).err().unwrap();
        assert!(matches!(err, GateConfigError::EmptyCookieName));
    }

    #[test]
    fn relative_redirect_target_is_rejected() {
        let cfg = AuthGateConfig {
            home_path: "home".to_owned(),
            ..AuthGateConfig::default()
        };

        let err = AuthGate::new(&cfg, Arc::new(FixedVerifier)).err().unwrap();
        assert!(matches!(
            err,
            GateConfigError::InvalidPath {
                field: "home_path",
                ..
            }
        ));
    }

    #[test]
    #[traced_test]
    fn rejected_token_is_logged_with_reason() {
        let outcome = gate().evaluate(Some("expired"), "/dashboard");

        assert_eq!(outcome, Outcome::RedirectToLogin);
        assert!(logs_contain("Session token rejected"));
        assert!(logs_contain("token expired"));
    }

    #[test]
    #[traced_test]
    fn forged_token_log_omits_secret_and_token() {
        use session_token::{HmacTokenVerifier, SessionTokenConfig, TokenIssuer};

        const SECRET: &str = "gate-log-secret-do-not-print-0123456789";
        let verifier =
            HmacTokenVerifier::from_config(&SessionTokenConfig::with_secret(SECRET)).unwrap();
        let gate = AuthGate::new(&AuthGateConfig::default(), Arc::new(verifier)).unwrap();

        let forged = TokenIssuer::from_config(&SessionTokenConfig::with_secret(
            "attacker-chosen-secret-0123456789abcdef",
        ))
        .unwrap()
        .issue(&Identity::new("u1", Role::Admin))
        .unwrap();

        assert_eq!(
            gate.evaluate(Some(&forged), "/dashboard"),
            Outcome::RedirectToLogin
        );
        assert!(logs_contain("Session token rejected"));
        assert!(logs_contain("invalid signature"));
        assert!(!logs_contain(SECRET));
        assert!(!logs_contain(&forged));
    }

    #[test]
    #[traced_test]
    fn missing_token_is_not_logged_as_failure() {
        let outcome = gate().evaluate(None, "/dashboard");

        assert_eq!(outcome, Outcome::RedirectToLogin);
        assert!(!logs_contain("Session token rejected"));
    }
}
