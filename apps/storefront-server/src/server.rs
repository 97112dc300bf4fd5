use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use auth_gate::{AuthGate, auth_gate_middleware};
use axum::{
    Router,
    body::Body,
    http::{HeaderName, Request, Response, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
};
use session_token::{HmacTokenVerifier, TokenVerifier};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{field::Empty, info};

use crate::{config::AppConfig, pages};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the storefront router with the authorization gate installed.
///
/// `/healthz` stays outside the gate so probes never need a session.
///
/// # Errors
/// Returns an error if the session secret or the gate configuration is invalid.
pub fn build_router(cfg: &AppConfig) -> Result<Router> {
    let verifier: Arc<dyn TokenVerifier> = Arc::new(
        HmacTokenVerifier::from_config(&cfg.session).context("invalid session configuration")?,
    );
    let gate = AuthGate::new(&cfg.auth_gate, verifier).context("invalid auth gate configuration")?;

    let gated = Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login))
        .route("/unauthorized", get(pages::unauthorized))
        .route("/dashboard", get(pages::dashboard))
        .route("/api/me", get(pages::whoami))
        .fallback(pages::not_found)
        .layer(from_fn_with_state(gate, auth_gate_middleware));

    let mut router = Router::new()
        .route("/healthz", get(pages::healthz))
        .merge(gated);

    // 3) Timeout
    router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(cfg.server.request_timeout_secs),
    ));

    // 2) Trace
    router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<Body>| {
                let rid = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &Response<Body>, latency: Duration, span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                },
            ),
    );

    // 1) Request ID: generate when missing, then echo it on the response
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router = router.layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid));

    Ok(router)
}

fn parse_bind_address(bind_addr: &str) -> Result<SocketAddr> {
    bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind_addr}': {e}"))
}

/// Bind and serve until Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if the router cannot be built, the address is invalid or
/// the listener fails.
pub async fn serve(cfg: &AppConfig) -> Result<()> {
    let addr = parse_bind_address(&cfg.server.bind_addr)?;
    let router = build_router(cfg)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down gracefully");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down gracefully");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
