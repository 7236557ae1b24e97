//! `tablero-tui` — terminal UI for the tablero backend.
//!
//! A full-screen table over the activities resource with create/edit
//! overlays, delete confirmation, text search, column visibility, and
//! pagination. The CRUD state machine from `tablero-core` runs in a
//! background task; the UI only renders what it publishes.
//!
//! Logs go to a file (default `/tmp/tablero-tui.log`) so they never
//! corrupt the terminal output.

mod action;
mod app;
mod bridge;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tablero_api::ApiClient;

use crate::app::App;

/// Terminal UI for browsing and managing tablero records.
#[derive(Parser, Debug)]
#[command(name = "tablero-tui", version, about)]
struct Cli {
    /// Backend base URL (e.g., http://localhost:3000)
    #[arg(short = 'b', long, env = "TABLERO_BACKEND")]
    backend: Option<String>,

    /// Configuration profile to use
    #[arg(short = 'p', long, env = "TABLERO_PROFILE")]
    profile: Option<String>,

    /// Bearer token (overrides the stored one)
    #[arg(long, env = "TABLERO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/tablero-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing; stdout/stderr would corrupt the TUI. The guard
/// must live until exit so buffered logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tablero_tui={log_level}")));

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("tablero-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the backend connection from flags and the shared config
/// file: the `--backend` flag beats the profile, the `--token` flag
/// beats the stored token. Returns the client plus a label for the
/// header bar and the configured page size.
fn build_client(cli: &Cli) -> Result<(Arc<ApiClient>, String, usize)> {
    let cfg = tablero_config::load_config_or_default();
    let profile = tablero_config::select_profile(&cfg, cli.profile.as_deref()).ok();

    let (url, timeout, backend) = if let Some(ref backend) = cli.backend {
        let url: url::Url = backend
            .parse()
            .map_err(|_| eyre!("invalid backend URL: {backend}"))?;
        let timeout = profile
            .as_ref()
            .and_then(|(_, p)| p.timeout)
            .unwrap_or(cfg.defaults.timeout);
        (url, Duration::from_secs(timeout), backend.clone())
    } else {
        let (_, p) = profile.as_ref().ok_or_else(|| {
            eyre!("no backend configured; pass --backend or run `tablero config init`")
        })?;
        let backend = tablero_config::profile_to_backend_config(p, &cfg)?;
        let label = backend.url.to_string();
        (backend.url, backend.timeout, label)
    };

    let client = ApiClient::new(url, timeout)?;

    let token = match &cli.token {
        Some(token) => Some(SecretString::from(token.clone())),
        None => profile
            .as_ref()
            .and_then(|(name, p)| tablero_config::resolve_token(p, name).ok()),
    };
    if let Some(token) = token {
        client.set_token(token);
    }

    Ok((Arc::new(client), backend, cfg.defaults.page_size))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Panic/error hooks must be in place before entering the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let (client, backend_label, page_size) = build_client(&cli)?;
    info!(backend = %backend_label, "starting tablero-tui");

    let mut app = App::new(client, backend_label, page_size);
    app.run().await?;

    Ok(())
}
