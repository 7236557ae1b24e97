//! Command handler modules and dispatch.

pub mod activities;
pub mod auth;
pub mod config_cmd;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler. Config and completions are
/// handled earlier in `main`; everything here talks to the backend.
pub async fn dispatch(command: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let client = crate::config::build_client(global)?;

    match command {
        Command::Activities(args) => activities::handle(client, args, global).await,
        Command::Login(args) => auth::login(client, args, global).await,
        Command::Whoami => auth::whoami(client, global).await,
        Command::Logout => auth::logout(client, global).await,
        Command::Config(_) | Command::Completions(_) => unreachable!("handled in main"),
    }
}
