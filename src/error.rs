use std::path::PathBuf;

use thiserror::Error;

/// Initialization failures. Once windows exist, their operations do not fail
/// while the controller is running.
#[derive(Debug, Error)]
pub enum MultiwindowError {
    #[error("at least one window is required")]
    NoWindows,

    #[error("output is not a usable terminal: {0}")]
    NotATerminal(#[source] std::io::Error),

    #[error("failed to read terminal geometry: {0}")]
    Geometry(#[source] std::io::Error),

    #[error("terminal has {rows} rows; too few for {windows} windows with 3-row title bars")]
    TerminalTooSmall { rows: u16, windows: usize },

    #[error("failed to register shutdown signal handlers: {0}")]
    Signals(#[source] std::io::Error),

    #[error("failed to spawn the controller thread: {0}")]
    Spawn(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("failed to read modification time of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum BuildScriptError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{path} starts with {found:?}, expected {expected:?}; is the script run from its own directory?"
    )]
    HeaderMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
}

impl BuildScriptError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
