//! Logging setup: stderr always, plus an optional per-session log file.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::ClientConfig;

/// Installs the global subscriber.
///
/// Returns the file writer guard when file logging is enabled; keep it alive
/// until the process exits or buffered lines are lost.
pub fn setup_logging(config: &ClientConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard, session_log_dir) = if config.log_to_file {
        let session_id = config.session_id.clone().unwrap_or_else(default_session_id);
        let session_log_dir = log_dir().join(&session_id);
        std::fs::create_dir_all(&session_log_dir).with_context(|| {
            format!("failed to create log directory {}", session_log_dir.display())
        })?;

        let file_appender = tracing_appender::rolling::never(&session_log_dir, "multigate.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_file)
            .with_ansi(false);

        (Some(layer), Some(guard), Some(session_log_dir))
    } else {
        (None, None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    if let Some(dir) = session_log_dir {
        tracing::info!("Log file: {}/multigate.log", dir.display());
    }

    Ok(guard)
}

/// Platform cache directory for logs, e.g. `~/.cache/multigate/logs` on Linux.
fn log_dir() -> PathBuf {
    let base_dir = directories::ProjectDirs::from("", "", "multigate")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("multigate"));

    base_dir.join("logs")
}

fn default_session_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{timestamp}")
}
