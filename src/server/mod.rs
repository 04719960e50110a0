//! The inbound HTTP surface.
//!
//! Builds the axum router for the install flow and the store-credit
//! endpoints, and owns the shared per-process state (configuration, the
//! session store, and the outbound HTTP client).

mod error;
mod routes;

pub use error::{ApiError, CREDENTIAL_MISSING_MESSAGE, MISSING_SHOP_MESSAGE};

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;

use crate::auth::{Session, SessionStore};
use crate::clients::AdminClient;
use crate::config::AppConfig;

/// Shared application state accessible from all handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    store: Arc<dyn SessionStore>,
    http: reqwest::Client,
}

impl AppState {
    /// Builds the shared state: wraps the configuration and session store
    /// and constructs the one outbound HTTP client, carrying the
    /// configured timeout, that every handler reuses.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This
    /// should only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: AppConfig, store: Arc<dyn SessionStore>) -> Self {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.upstream_timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config: Arc::new(config),
            store,
            http,
        }
    }

    /// The app configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The per-shop session store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// The shared outbound HTTP client.
    #[must_use]
    pub const fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// An Admin API client bound to the given session's shop.
    #[must_use]
    pub fn admin_client(&self, session: &Session) -> AdminClient {
        AdminClient::for_session(&self.config, self.http.clone(), session)
    }
}

/// Builds the axum router with all routes and shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/shopify", get(routes::install))
        .route("/shopify/callback", get(routes::oauth_callback))
        .route("/store_credit/user/:id/balance", get(routes::credit_balance))
        .route(
            "/store_credit/user/:id/discount_code",
            get(routes::discount_code),
        )
        .with_state(state)
}

/// Binds the configured address and serves until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run(state: AppState) -> std::io::Result<()> {
    let addr = state.config().bind_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Wait for SIGTERM or SIGINT for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

/// Renders a JSON response pretty-printed with 3-space indentation, the
/// wire format the endpoints are documented with.
pub(crate) fn pretty_json(status: StatusCode, value: &serde_json::Value) -> Response {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"   ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    let body = if value.serialize(&mut serializer).is_ok() {
        String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    };

    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
