//! Axum integration: the gate middleware and the identity extractor.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use storefront_security::Identity;

use crate::gate::AuthGate;

/// Authorization gate middleware.
///
/// For each request:
/// 1. Skips CORS preflight requests
/// 2. Reads the session token from the configured cookie (or a bearer header)
/// 3. Asks the [`AuthGate`] for a decision
/// 4. On pass-through attaches the verified [`Identity`] (if any) and runs the inner service
/// 5. Otherwise answers with a `307 Temporary Redirect` to the decided location
///
/// ```ignore
/// router = router.layer(axum::middleware::from_fn_with_state(gate, auth_gate_middleware));
/// ```
pub async fn auth_gate_middleware(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    let decision = {
        let token = extract_session_token(
            req.headers(),
            gate.cookie_name(),
            gate.accepts_bearer_header(),
        );
        gate.authorize(token, req.uri().path())
    };

    if let Some(location) = gate.location_header(decision.outcome) {
        return (
            StatusCode::TEMPORARY_REDIRECT,
            [(header::LOCATION, location.clone())],
        )
            .into_response();
    }

    if let Some(identity) = decision.identity {
        req.extensions_mut().insert(identity);
    }
    next.run(req).await
}

/// Extractor for the [`Identity`] attached by [`auth_gate_middleware`].
///
/// Rejects with `401` when the gate let the request through anonymously
/// (public or out-of-scope routes) or is not installed. Use
/// `Option<Authenticated>` on pages that serve both.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

/// Rejection for [`Authenticated`].
#[derive(Debug, Clone, Copy)]
pub struct MissingIdentity;

impl IntoResponse for MissingIdentity {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = MissingIdentity;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Authenticated)
            .ok_or(MissingIdentity)
    }
}

impl<S> OptionalFromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().map(Authenticated))
    }
}

/// Session token from the named cookie, falling back to the bearer header.
fn extract_session_token<'a>(
    headers: &'a HeaderMap,
    cookie_name: &str,
    accept_bearer: bool,
) -> Option<&'a str> {
    extract_cookie(headers, cookie_name).or_else(|| {
        if accept_bearer {
            extract_bearer_token(headers)
        } else {
            None
        }
    })
}

/// Value of the named cookie across all `Cookie` headers
fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .find(|value| !value.is_empty())
}

/// Token from `Authorization: Bearer <token>`, if non-empty.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
        .filter(|token| !token.is_empty())
}

/// `OPTIONS` carrying both `Origin` and `Access-Control-Request-Method`.
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}
