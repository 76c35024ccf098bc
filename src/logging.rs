//! Tracing setup.
//!
//! The terminal belongs to the TUI, so events go to a log file through a non-blocking appender.
//! `RUST_LOG` overrides the default filter.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the configured log directory.
pub const LOG_FILE: &str = "doctree.log";

const DEFAULT_FILTER: &str = "doctree=info";

/// Installs the global subscriber writing to `log_dir`.
///
/// The returned guard flushes buffered events when dropped, so keep it alive until exit.
/// Returns `None` if the log file cannot be opened or a global subscriber was already installed.
pub fn init(log_dir: &Path) -> Option<WorkerGuard> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(log_dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .ok()
        .map(|()| guard)
}
