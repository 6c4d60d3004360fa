//! mirror-server binary entry point.
//!
//! # Usage
//!
//! ```text
//! mirror-server [--settings <FILE>] <client-version>
//!               [web [<log-level> [<port> [<listen-all>]]]]
//! ```
//!
//! The positional tokens are exactly what the launcher passes.  Anything
//! other than `web` in the second position selects the legacy direct socket,
//! which ignores any further tokens.  Tokens past the fifth are ignored.
//!
//! Setting `RUST_LOG` overrides the log level token, e.g.
//! `RUST_LOG=mirror_server=trace`.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mirror_server::application::{parse_handshake, supervise, EventHub, SERVER_VERSION};
use mirror_server::infrastructure::{load_settings, run_transport};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Device-side screen-mirroring endpoint.
#[derive(Debug, Parser)]
#[command(name = "mirror-server", disable_version_flag = true)]
struct Cli {
    /// Optional TOML settings file.
    #[arg(long, env = "MIRROR_SETTINGS")]
    settings: Option<PathBuf>,

    /// Launcher tokens: client version, transport (`web` or anything else),
    /// then, for `web`, log level, port and listen-on-all-interfaces.
    /// Extra tokens are accepted and ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}

/// Validates the launch, then runs the selected transport to completion.
///
/// # Errors
///
/// Settings and handshake errors are returned before logging is set up and
/// before any socket is bound.  Transport errors are returned after the
/// supervisor has logged them.
async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.settings.as_deref()).context("failed to load settings")?;

    let config = parse_handshake(cli.tokens.as_slice(), SERVER_VERSION, settings.default_port)?;

    // A second init (only possible in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(config.log_level.as_level_filter().into())
                .from_env_lossy(),
        )
        .try_init();

    info!(
        "mirror-server {SERVER_VERSION} starting ({:?}, port {})",
        config.transport, config.port
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => tracing::error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    let hub = Arc::new(EventHub::new(settings.outbound_queue_capacity));
    supervise(
        "transport",
        run_transport(Arc::new(config), Arc::new(settings), hub, running),
    )
    .await?;

    info!("mirror-server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
