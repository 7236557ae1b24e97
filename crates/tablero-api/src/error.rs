use thiserror::Error;

/// Top-level error type for the `tablero-api` crate.
///
/// Covers every failure mode of the backend API surface: transport,
/// authentication, server-reported failures, and missing records.
/// `tablero-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the session token was rejected (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Server-reported ─────────────────────────────────────────────
    /// Non-2xx response. `message` is the server's `message` field when
    /// the body carries one, otherwise a generic HTTP description.
    #[error("{message}")]
    Api { message: String, status: u16 },

    /// 404-shaped failure: the requested record or endpoint does not exist.
    #[error("{message}")]
    NotFound { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if re-authentication might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The human-readable message, preferring server-supplied text.
    pub fn message(&self) -> String {
        match self {
            Self::Authentication { message }
            | Self::Api { message, .. }
            | Self::NotFound { message } => message.clone(),
            other => other.to_string(),
        }
    }
}
