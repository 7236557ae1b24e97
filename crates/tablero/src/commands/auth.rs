//! Session command handlers: login, whoami, logout.

use std::io::Read;
use std::sync::Arc;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use tablero_api::{ApiClient, AuthApi};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

/// Log in and persist the session token in the system keyring.
pub async fn login(
    client: Arc<ApiClient>,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = match args.username {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?,
    };

    let password = if args.password_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        SecretString::from(buf.trim_end().to_owned())
    } else {
        SecretString::from(rpassword::prompt_password("Password: ").map_err(prompt_err)?)
    };

    let auth = AuthApi::new(client);
    let token = auth.login(&username, &password).await?;

    let cfg = tablero_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    tablero_config::store_token(&profile_name, token.expose_secret())?;

    output::print_status(
        &format!("Sesión iniciada como {username}"),
        &global.color,
        global.quiet,
    );
    Ok(())
}

/// Print the authenticated user's profile.
pub async fn whoami(client: Arc<ApiClient>, global: &GlobalOpts) -> Result<(), CliError> {
    let auth = AuthApi::new(client);
    let profile = auth.me().await?;

    let out = output::render_single(
        &global.output,
        &profile,
        |p| {
            format!(
                "Usuario: {}\nRoles:   {}",
                p.username,
                p.roles.join(", ")
            )
        },
        |p| p.username.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Invalidate the session and discard the stored token.
pub async fn logout(client: Arc<ApiClient>, global: &GlobalOpts) -> Result<(), CliError> {
    let auth = AuthApi::new(client);
    // Server-side logout is best-effort; the local token goes either way.
    let result = auth.logout().await;

    let cfg = tablero_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    tablero_config::forget_token(&profile_name)?;

    result?;
    output::print_status("Sesión cerrada", &global.color, global.quiet);
    Ok(())
}
