// Authentication API
//
// Session login against the backend's `/api/auth/*` endpoints. On
// success the bearer token is stored on the shared `ApiClient` so every
// subsequent request carries `Authorization: Bearer <token>`.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// The authenticated user as reported by `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserProfile {
    /// Whether the user carries the named role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Whether the user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.has_role("ADMIN")
    }
}

/// Client for the backend's auth endpoints.
///
/// Shares the [`ApiClient`] with the record services so a successful
/// login authenticates all of them at once.
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Log in with username/password. Stores the returned bearer token
    /// on the shared client and also returns it for persistence.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, Error> {
        let url = self.client.api_url("auth/login");
        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };

        let resp: LoginResponse = self.client.post(url, &body).await.map_err(|e| match e {
            // A 401 at login means bad credentials, not an expired session.
            Error::Authentication { message } | Error::Api { message, status: 403 } => {
                Error::Authentication { message }
            }
            other => other,
        })?;

        debug!(%username, "login successful");
        let token = SecretString::from(resp.token);
        self.client.set_token(token.clone());
        Ok(token)
    }

    /// Fetch the current user. Fails with [`Error::Authentication`] when
    /// the token is missing, expired, or revoked.
    pub async fn me(&self) -> Result<UserProfile, Error> {
        let url = self.client.api_url("auth/me");
        self.client.get(url).await
    }

    /// Log out and discard the stored token. A failed logout call still
    /// clears the local token.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.client.api_url("auth/logout");
        let result: Result<serde_json::Value, Error> =
            self.client.post(url, &serde_json::json!({})).await;
        self.client.clear_token();
        result.map(|_| ())
    }
}
