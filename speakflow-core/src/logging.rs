//! Logging for speakflow
//!
//! Two sinks:
//! - a daily-rotated file in `$XDG_STATE_HOME/speakflow/`, filtered by
//!   `logging.level` or `RUST_LOG`
//! - stderr, for warnings such as skipped store documents, so they reach the
//!   user without mixing into results on stdout

use std::str::FromStr;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};

/// File name prefix of the rotated log files.
pub const LOG_FILE_NAME: &str = "speakflow.log";

/// Initialize logging.
///
/// `verbose` lowers the stderr threshold to debug regardless of
/// `logging.stderr_level`.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<LoggingGuard> {
    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        stderr_filter(&config.stderr_level)?
    };

    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_NAME)
        .max_log_files(config.max_files.max(1))
        .build(&log_dir)
        .map_err(|e| Error::Config(format!("failed to create log file: {}", e)))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(file_filter);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .with_filter(stderr_level);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        stderr_level = %stderr_level,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Parse `logging.stderr_level`; "off" disables the stderr sink.
fn stderr_filter(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level.trim())
        .map_err(|_| Error::Config(format!("invalid logging.stderr_level: {:?}", level)))
}

/// Initialize logging for tests (captured by the test harness)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Keeps the file writer alive; pending writes are flushed on drop.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}
