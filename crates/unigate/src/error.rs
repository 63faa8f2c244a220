//! Error types for the server binary.
//!
//! [`StartupError`] is reported through miette before the server runs.
//! [`ApiError`] is what handlers return; it renders as a JSON
//! `{"error": "..."}` body with a status derived from the core error.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use unigate_config::ConfigError;
use unigate_core::CoreError;

// ── Startup ─────────────────────────────────────────────────────────

#[derive(Debug, Error, Diagnostic)]
pub enum StartupError {
    #[error("invalid configuration")]
    #[diagnostic(
        code(unigate::config),
        help(
            "Set UNIFI_BASE, UNIFI_USER, and UNIFI_PASS, or pass --config \
             with a [controller] section."
        )
    )]
    Config(#[source] ConfigError),

    #[error("could not bind {addr}")]
    #[diagnostic(code(unigate::bind), help("Is another process listening on this address?"))]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server terminated unexpectedly")]
    #[diagnostic(code(unigate::serve))]
    Serve(#[source] std::io::Error),
}

impl From<ConfigError> for StartupError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

// ── Request handling ────────────────────────────────────────────────

const INTERNAL: &str = "Internal Server Error";

#[derive(Debug)]
pub enum ApiError {
    /// Malformed or incomplete request, rejected before reaching the core.
    BadRequest(String),
    Core(CoreError),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Core(err) => match err {
                CoreError::Validation { message } => (StatusCode::BAD_REQUEST, message),
                CoreError::WlanNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
                CoreError::Conflict { message } => (StatusCode::CONFLICT, message),
                CoreError::AuthenticationFailed { .. } | CoreError::Remote { .. } => {
                    error!(error = %err, "controller operation failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_owned())
                }
            },
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
