//! Flag-aware configuration resolution for the CLI.
//!
//! Thin wrappers over `tablero-config` that layer `GlobalOpts` (CLI
//! flags and env vars) on top of the config file.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tablero_api::ApiClient;
use tablero_config::{Config, load_config_or_default, resolve_token};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use tablero_config::config_path;

/// The profile name in effect: `--profile`, else the config default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build an authenticated [`ApiClient`] from flags, env, and config.
///
/// Backend URL: `--backend` flag beats the profile. Token: `--token`
/// flag beats the keyring/env/config chain; commands that hit
/// unauthenticated endpoints work with no token at all.
pub fn build_client(global: &GlobalOpts) -> Result<Arc<ApiClient>, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);

    let backend = global
        .backend
        .clone()
        .or_else(|| profile.map(|p| p.backend.clone()))
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;

    let url: url::Url = backend.parse().map_err(|_| CliError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL: {backend}"),
    })?;

    let timeout = profile
        .and_then(|p| p.timeout)
        .unwrap_or(global.timeout);

    let client = ApiClient::new(url, Duration::from_secs(timeout))?;

    if let Some(ref token) = global.token {
        client.set_token(SecretString::from(token.clone()));
    } else if let Some(profile) = profile {
        if let Ok(token) = resolve_token(profile, &profile_name) {
            client.set_token(token);
        }
    }

    Ok(Arc::new(client))
}
