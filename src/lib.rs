//! Split one terminal into fixed windows shared by concurrent producers.
//!
//! Invariant: single terminal owner: only the controller thread writes to the
//! terminal or mutates a window buffer, and it does so through
//! `core::output::OutputGate::flush(..)`. Producers talk to it by message.
//!
//! # Public API Overview
//! - [`new`] takes over the process terminal and returns one [`Window`] per section.
//! - [`spawn`] embeds the controller on any [`Terminal`] with an explicit
//!   [`ShutdownToken`] instead of process signal handling.
//! - [`Window`] implements [`std::io::Write`]; each write returns only after the
//!   controller has applied it.
//! - [`watch`] and [`buildscript`] hold the build-loop helpers that usually feed
//!   the windows.

pub mod buildscript;
pub mod config;
pub mod error;
pub mod logging;
pub mod watch;

pub mod core;
pub mod platform;
pub mod render;
pub mod runtime;

/// Window buffer and message types.
pub use crate::core::line_buffer::{LineBuffer, RenderLines, REPLACEMENT_MARKER};
pub use crate::core::message::{ControllerEvent, MessageKind, WindowId, WindowMessage};
pub use crate::core::pane::Pane;

/// Shutdown coordination.
pub use crate::core::shutdown::ShutdownToken;

/// Terminal interfaces and process-backed implementation.
pub use crate::core::terminal::{Terminal, TerminalSize};
pub use crate::platform::ProcessTerminal;

/// Configuration and errors.
pub use crate::config::{EnvConfig, Options};
pub use crate::error::{BuildScriptError, MultiwindowError, WatchError};

/// Runtime entry points.
pub use crate::runtime::{new, spawn, ControllerHandle, Window};
