//! openemote-mock entry point.
//!
//! Loads configuration (defaults, optional TOML file, environment
//! overrides), initializes tracing, and serves the fixture API forever.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use emotekit_core::config::MockConfig;
use emotekit_mock::MockServer;

/// Mock OpenEmote API server.
#[derive(Parser, Debug)]
#[command(
    name = "openemote-mock",
    version,
    about = "Serve static OpenEmote emote fixtures for local client testing"
)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address as host:port, overriding config file and environment.
    #[arg(long)]
    listen: Option<String>,
}

// The fixture server handles one request at a time; a current-thread
// runtime keeps that explicit.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = match &args.config {
        Some(path) => MockConfig::load_from_file(path).context("failed to load configuration file")?,
        None => MockConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("failed to apply environment overrides")?;
    if let Some(listen) = &args.listen {
        config.set_listen(listen).context("invalid --listen value")?;
    }

    info!("openemote-mock v{}", env!("CARGO_PKG_VERSION"));

    MockServer::new(config).start().await
}
