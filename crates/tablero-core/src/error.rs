// ── Core error types ──
//
// User-facing errors from tablero-core. Consumers never see raw HTTP
// status codes or JSON parse failures directly; the
// `From<tablero_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// 404-shaped failure from the backend.
    #[error("{message}")]
    NotFound { message: String },

    /// Server-reported failure (non-2xx with a message).
    #[error("{message}")]
    Api { message: String, status: Option<u16> },

    /// Transport/network failure (no usable response).
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The human-readable message, as shown in notifications. Prefers
    /// server-supplied text where the API provided it.
    pub fn message(&self) -> String {
        match self {
            Self::AuthenticationFailed { message }
            | Self::NotFound { message }
            | Self::Api { message, .. }
            | Self::ConnectionFailed { message }
            | Self::ValidationFailed { message }
            | Self::Config { message } => message.clone(),
            Self::Internal(message) => message.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tablero_api::Error> for CoreError {
    fn from(err: tablero_api::Error) -> Self {
        // Covers both `Error::NotFound` and 404-carrying transport errors.
        if err.is_not_found() {
            return CoreError::NotFound {
                message: err.message(),
            };
        }
        match err {
            tablero_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            tablero_api::Error::NotFound { message } => CoreError::NotFound { message },
            tablero_api::Error::Api { message, status } => CoreError::Api {
                message,
                status: Some(status),
            },
            tablero_api::Error::Transport(e) => CoreError::ConnectionFailed {
                message: e.to_string(),
            },
            tablero_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            tablero_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
