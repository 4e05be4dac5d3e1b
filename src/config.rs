//! Environment configuration and runtime options.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_QUEUE_CAPACITY: usize = 10;
pub const DEFAULT_FRAMES_PER_SECOND: u32 = 30;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub log_file: Option<PathBuf>,
    pub write_log: Option<PathBuf>,
    pub frames_per_second: Option<u32>,
    pub debug: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            log_file: env_string_opt("MULTIWINDOW_LOG").map(PathBuf::from),
            write_log: env_string_opt("MULTIWINDOW_WRITE_LOG").map(PathBuf::from),
            frames_per_second: env_string_opt("MULTIWINDOW_FPS")
                .and_then(|value| value.trim().parse::<u32>().ok())
                .filter(|fps| *fps > 0),
            debug: env_flag("MULTIWINDOW_DEBUG"),
        }
    }
}

/// Controller tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Capacity of the shared message queue; a full queue blocks producers.
    pub queue_capacity: usize,
    /// Redraw tick period.
    pub frame_interval: Duration,
    /// Exit the process with status 0 after restoring the terminal on shutdown.
    pub exit_on_shutdown: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            frame_interval: frame_interval(DEFAULT_FRAMES_PER_SECOND),
            exit_on_shutdown: false,
        }
    }
}

impl Options {
    pub fn from_env(config: &EnvConfig) -> Self {
        let mut options = Self::default();
        if let Some(fps) = config.frames_per_second {
            options.frame_interval = frame_interval(fps);
        }
        options
    }
}

fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
