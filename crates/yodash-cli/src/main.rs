use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tokio::sync::mpsc;

use yodash_application::{DashboardDeps, DashboardOptions, PreviewRegistry, RootShell};
use yodash_core::config::{self, DashConfig, IdentitySettings};
use yodash_core::filter::ResultFilter;
use yodash_core::session::SessionGate;
use yodash_interaction::{HistoryClient, InferenceClient, OidcIdentityProvider, TokenStore};

mod commands;
mod export;
mod helper;
mod logging;
mod notifier;
mod render;
mod repl;

use notifier::ChannelNotifier;
use repl::Repl;

#[derive(Parser)]
#[command(name = "yodash")]
#[command(about = "YODASH - run YOLOv12 detection on images and browse recent runs", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/yodash/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level for the yodash crates; RUST_LOG overrides it
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Image to select on startup
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best effort; the dashboard works without it.
    let log_guard = config::log_dir()
        .map_err(anyhow::Error::from)
        .and_then(|dir| logging::init(&dir, &cli.log_level));
    let _log_guard = match log_guard {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("{}", format!("Logging disabled: {err:#}").bright_black());
            None
        }
    };

    let config = DashConfig::load(cli.config.as_deref())?;
    tracing::info!(
        "[Startup] inference={} history={} timeout={:?}",
        config.inference_url,
        config.history_url,
        config.request_timeout()
    );

    // ===== Identity =====
    let provider = Arc::new(OidcIdentityProvider::new(
        IdentitySettings::default(),
        TokenStore::from_env(),
    ));
    provider.initialize().await;
    let gate = SessionGate::new(provider);

    // ===== Dashboard wiring =====
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();
    let printer = notifier::spawn_printer(notice_rx);

    let deps = DashboardDeps {
        inference: Arc::new(InferenceClient::from_config(&config)?),
        history: Arc::new(HistoryClient::from_config(&config)?),
        notifier: Arc::new(ChannelNotifier::new(notice_tx)),
        previews: PreviewRegistry::new(),
    };
    let options = DashboardOptions {
        user: None,
        viewport: config.viewport.size(),
        filter: ResultFilter::new(config.default_min_confidence, "")?,
        model_version: config.default_model,
    };

    let mut repl = Repl::new(RootShell::new(gate, deps, options));
    repl.run(cli.image).await?;

    drop(repl);
    // Detections still in flight are abandoned on exit.
    printer.abort();
    Ok(())
}
