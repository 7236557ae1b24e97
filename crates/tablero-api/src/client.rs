// Backend HTTP client
//
// Wraps `reqwest::Client` with backend URL construction, JSON body
// handling, bearer-token injection, and error-message extraction.
// Resource modules (records, auth) are implemented on top of the
// request helpers here to keep this module focused on transport
// mechanics.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

/// Error bodies from the backend carry `{"message": "..."}`.
#[derive(serde::Deserialize)]
struct ServerMessage {
    message: Option<String>,
}

/// Raw HTTP client for the tablero admin backend.
///
/// Builds `{base}/api/{path}` URLs, sends/receives JSON, and attaches
/// the bearer token on every request once one is set. Non-2xx responses
/// are turned into [`Error`] values whose message prefers the server's
/// `message` field over the generic HTTP description.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Bearer token for authenticated requests. Set after login (or
    /// from stored credentials) and rotated on re-login.
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a new client for the backend at `base_url`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:8080`);
    /// the `/api` prefix is appended by the URL builder.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Store a bearer token (from login or stored credentials).
    pub fn set_token(&self, token: SecretString) {
        debug!("storing bearer token");
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Discard the stored bearer token.
    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    /// Whether a bearer token is currently set.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// Apply the stored token to a request builder.
    fn apply_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for a backend API path: `{base}/api/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and deserialize the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let builder = self.apply_token(self.http.get(url));
        let resp = builder.send().await.map_err(Error::Transport)?;

        self.parse_json(resp).await
    }

    /// Send a POST request with JSON body and deserialize the response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let builder = self.apply_token(self.http.post(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;

        self.parse_json(resp).await
    }

    /// Send a PUT request with JSON body and deserialize the response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);

        let builder = self.apply_token(self.http.put(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;

        self.parse_json(resp).await
    }

    /// Send a DELETE request, expecting no response body (204 or empty 200).
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);

        let builder = self.apply_token(self.http.delete(url));
        let resp = builder.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if status.is_success() {
            trace!("DELETE ok ({status})");
            return Ok(());
        }
        Err(Self::error_from_response(resp).await)
    }

    /// Check the status, then deserialize the body as `T`.
    async fn parse_json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::error_from_response(resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = body_preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Map a non-2xx response to an [`Error`], extracting the server's
    /// `message` field when the body carries one.
    async fn error_from_response(resp: reqwest::Response) -> Error {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let server_message = serde_json::from_str::<ServerMessage>(&body)
            .ok()
            .and_then(|m| m.message);

        match status {
            StatusCode::UNAUTHORIZED => Error::Authentication {
                message: server_message
                    .unwrap_or_else(|| "session expired or invalid credentials".into()),
            },
            StatusCode::NOT_FOUND => Error::NotFound {
                message: server_message.unwrap_or_else(|| format!("HTTP {status}")),
            },
            _ => Error::Api {
                message: server_message
                    .unwrap_or_else(|| format!("HTTP {status}: {}", body_preview(&body))),
                status: status.as_u16(),
            },
        }
    }
}

/// Error bodies can be arbitrarily large HTML pages; only the first
/// ~200 bytes are worth carrying. The cut must land on a char boundary
/// or slicing multi-byte text panics.
fn body_preview(body: &str) -> &str {
    const PREVIEW_BYTES: usize = 200;
    if body.len() <= PREVIEW_BYTES {
        return body;
    }
    let mut end = PREVIEW_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
