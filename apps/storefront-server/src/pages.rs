//! Placeholder storefront pages mounted behind the gate.
//!
//! Rendering belongs to the UI; these handlers only prove which identity the
//! gate attached to the request.

use auth_gate::Authenticated;
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;

pub async fn home(identity: Option<Authenticated>) -> Html<String> {
    let greeting = match identity {
        Some(Authenticated(id)) => format!("Welcome back, {}", id.subject_id()),
        None => "Welcome to the storefront".to_owned(),
    };
    Html(format!("<h1>{greeting}</h1>"))
}

pub async fn login() -> Html<&'static str> {
    Html("<h1>Sign in</h1>")
}

pub async fn unauthorized() -> (StatusCode, Html<&'static str>) {
    (
        StatusCode::FORBIDDEN,
        Html("<h1>You do not have access to this page</h1>"),
    )
}

pub async fn dashboard(Authenticated(identity): Authenticated) -> Html<String> {
    Html(format!(
        "<h1>Dashboard</h1><p>Signed in as {} ({})</p>",
        identity.subject_id(),
        identity.role()
    ))
}

/// JSON view of the caller's identity.
pub async fn whoami(Authenticated(identity): Authenticated) -> Json<serde_json::Value> {
    Json(json!({
        "id": identity.subject_id(),
        "role": identity.role(),
    }))
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
