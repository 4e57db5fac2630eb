use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: &[&str] = &[
    "yodash",
    "yodash_core",
    "yodash_interaction",
    "yodash_application",
];

/// Routes tracing output to a daily log file so it does not interleave with the REPL.
///
/// `RUST_LOG` takes precedence over `default_level`. Keep the guard alive
/// until exit to flush buffered lines.
pub fn init(log_dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::daily(log_dir, "yodash.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let crate_levels = CRATES
        .iter()
        .map(|name| format!("{name}={default_level}"))
        .collect::<Vec<_>>()
        .join(",");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(crate_levels)))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;

    Ok(guard)
}
