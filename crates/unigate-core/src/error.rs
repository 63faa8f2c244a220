// ── Core error types ──
//
// Domain errors surfaced to the HTTP layer. Transport-level failures from
// `unigate-api` are folded into `AuthenticationFailed` or `Remote` so callers
// never match on HTTP status codes or JSON parse failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller input violates a contract (password length, missing field).
    #[error("{message}")]
    Validation { message: String },

    #[error("WLAN not found: {wlan_id}")]
    WlanNotFound { wlan_id: String },

    /// The PPSK password is already in use on the WLAN.
    #[error("{message}")]
    Conflict { message: String },

    /// Credentials rejected, session expired, or controller unreachable at login.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Transport failure, malformed payload, or non-success controller response.
    #[error("Controller request failed: {message}")]
    Remote { message: String },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<unigate_api::Error> for CoreError {
    fn from(err: unigate_api::Error) -> Self {
        match err {
            unigate_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            unigate_api::Error::Deserialization { message, body: _ } => CoreError::Remote {
                message: format!("malformed controller response: {message}"),
            },
            other => CoreError::Remote {
                message: other.to_string(),
            },
        }
    }
}
