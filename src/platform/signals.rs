//! Interrupt/termination handling that cancels a [`ShutdownToken`].

use std::io;
use std::thread::JoinHandle;

use crate::core::shutdown::ShutdownToken;

/// Signal forwarding guard. Dropping it stops the forwarding thread, but the
/// process-level handlers stay registered: SIGINT and SIGTERM no longer take
/// their default action afterwards. Install only once nothing can fail.
#[cfg(unix)]
pub struct SignalHookGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

#[cfg(unix)]
impl Drop for SignalHookGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Cancel `token` on SIGINT or SIGTERM.
#[cfg(unix)]
pub fn install_signal_handlers(token: ShutdownToken) -> io::Result<SignalHookGuard> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let handle = signals.handle();

    let thread = std::thread::Builder::new()
        .name("multiwindow-signals".into())
        .spawn(move || {
            for signal in signals.forever() {
                tracing::info!(signal, "shutdown signal received");
                token.cancel();
            }
        })?;

    Ok(SignalHookGuard {
        handle,
        thread: Some(thread),
    })
}

#[cfg(not(unix))]
pub struct SignalHookGuard {
    _thread: Option<JoinHandle<()>>,
}

#[cfg(not(unix))]
pub fn install_signal_handlers(_token: ShutdownToken) -> io::Result<SignalHookGuard> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "signal handlers are only supported on Unix platforms",
    ))
}
