//! Logging to stderr and a per-session file.
use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "bot.log";

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process or buffered file output is lost.
pub fn setup_logging(bot: &str) -> Result<WorkerGuard> {
    let session = format!(
        "session_{}",
        SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs()
    );
    let session_dir = log_directory().join(&session);
    std::fs::create_dir_all(&session_dir)?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&session_dir, LOG_FILE));

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()?;

    tracing::info!(bot, session, "logging initialized");
    tracing::info!("log file: {}", session_dir.join(LOG_FILE).display());

    Ok(guard)
}

/// Platform cache directory for logs, falling back to the temp directory.
fn log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "bot")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("bot").join("logs"))
}
