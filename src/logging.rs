//! File-backed tracing setup.
//!
//! The controller owns stdout, so log output goes to `MULTIWINDOW_LOG` or nowhere.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

/// Keeps the background log writer alive; dropping it flushes pending lines.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_file: PathBuf,
}

impl LoggingGuard {
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

fn default_directive(config: &EnvConfig) -> &'static str {
    if config.debug {
        "multiwindow=debug"
    } else {
        "multiwindow=info"
    }
}

/// Install the global subscriber. Returns `None` when no log file is configured,
/// the file's directory cannot be created, or a subscriber is already set.
pub fn init(config: &EnvConfig) -> Option<LoggingGuard> {
    let log_file = config.log_file.clone()?;
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = log_file.file_name()?.to_owned();
    std::fs::create_dir_all(&dir).ok()?;

    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_thread_names(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_file = %log_file.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_file,
    })
}
