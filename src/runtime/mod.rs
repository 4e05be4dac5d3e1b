//! Window handles, the controller loop, and the entry points that wire them.

pub mod controller;
pub mod window;

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::config::{EnvConfig, Options};
use crate::core::message::ControllerEvent;
use crate::core::shutdown::ShutdownToken;
use crate::core::terminal::Terminal;
use crate::error::MultiwindowError;
use crate::platform::{install_signal_handlers, ProcessTerminal};

pub use controller::{section_geometry, Controller};
pub use window::Window;

/// Owner-side handle to a running controller thread.
pub struct ControllerHandle {
    thread: JoinHandle<()>,
    shutdown: ShutdownToken,
}

impl std::fmt::Debug for ControllerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerHandle")
            .field("finished", &self.thread.is_finished())
            .finish()
    }
}

impl ControllerHandle {
    /// Ask the controller to restore the terminal and stop.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    pub fn join(self) -> thread::Result<()> {
        self.thread.join()
    }
}

/// Take over the process terminal with `count` windows.
///
/// SIGINT and SIGTERM restore the terminal and exit the process with status 0.
/// The handlers are only installed once the terminal has been taken over, so a
/// failed call leaves the process's signal handling untouched.
pub fn new(count: usize) -> Result<Vec<Window>, MultiwindowError> {
    let config = EnvConfig::from_env();
    let terminal = ProcessTerminal::new().with_write_log(config.write_log.clone());
    let options = Options {
        exit_on_shutdown: true,
        ..Options::from_env(&config)
    };

    let (windows, _handle) = spawn_with(count, terminal, ShutdownToken::new(), options, |token| {
        install_signal_handlers(token.clone()).map_err(MultiwindowError::Signals)
    })?;
    Ok(windows)
}

/// Start a controller on `terminal` without touching process signal handling.
///
/// Cancelling `shutdown` restores the terminal; the process only exits if
/// `options.exit_on_shutdown` is set.
pub fn spawn<T>(
    count: usize,
    terminal: T,
    shutdown: ShutdownToken,
    options: Options,
) -> Result<(Vec<Window>, ControllerHandle), MultiwindowError>
where
    T: Terminal + Send + 'static,
{
    spawn_with(count, terminal, shutdown, options, |_| Ok(()))
}

/// `after_start` runs once the terminal is taken over; its result lives as long
/// as the controller thread. If it fails, the terminal is restored.
fn spawn_with<T, K, F>(
    count: usize,
    terminal: T,
    shutdown: ShutdownToken,
    options: Options,
    after_start: F,
) -> Result<(Vec<Window>, ControllerHandle), MultiwindowError>
where
    T: Terminal + Send + 'static,
    K: Send + 'static,
    F: FnOnce(&ShutdownToken) -> Result<K, MultiwindowError>,
{
    if count == 0 {
        return Err(MultiwindowError::NoWindows);
    }

    let (messages_tx, messages_rx) = mpsc::sync_channel(options.queue_capacity);
    let mut acks = Vec::with_capacity(count);
    let mut windows = Vec::with_capacity(count);
    for id in 0..count {
        let (ack_tx, ack_rx) = mpsc::sync_channel(1);
        acks.push(ack_tx);
        windows.push(Window::new(id, messages_tx.clone(), ack_rx));
    }

    let mut controller = Controller::start(
        terminal,
        messages_rx,
        acks,
        shutdown.clone(),
        options.frame_interval,
    )?;
    let keep_alive = after_start(&shutdown)?;

    shutdown.on_cancel(move || {
        // A full queue wakes the loop anyway.
        let _ = messages_tx.try_send(ControllerEvent::Wake);
    });

    let exit_on_shutdown = options.exit_on_shutdown;
    let thread = thread::Builder::new()
        .name("multiwindow-controller".into())
        .spawn(move || {
            let _keep_alive = keep_alive;
            controller.run();
            drop(controller);
            if exit_on_shutdown {
                std::process::exit(0);
            }
        })
        .map_err(MultiwindowError::Spawn)?;

    Ok((windows, ControllerHandle { thread, shutdown }))
}
