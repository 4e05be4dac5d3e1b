//! Terminal trait and lifecycle helpers.

use std::io;

/// Terminal geometry in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalSize {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }
}

/// Minimal terminal interface owned by the controller.
pub trait Terminal {
    /// Validate the device and enter session mode.
    fn start(&mut self) -> io::Result<()>;

    /// Restore the mode captured by `start`.
    fn stop(&mut self) -> io::Result<()>;

    /// Write raw bytes/control sequences.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Current geometry; an error when it cannot be read.
    fn size(&self) -> io::Result<TerminalSize>;
}

/// RAII guard that stops the terminal on drop.
pub struct TerminalGuard<T: Terminal> {
    terminal: Option<T>,
}

impl<T: Terminal> TerminalGuard<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            terminal: Some(terminal),
        }
    }

    /// Access the wrapped terminal.
    pub fn terminal_mut(&mut self) -> &mut T {
        self.terminal
            .as_mut()
            .expect("terminal already taken from guard")
    }

    /// Consume the guard without running cleanup.
    pub fn into_inner(mut self) -> T {
        self.terminal
            .take()
            .expect("terminal already taken from guard")
    }
}

impl<T: Terminal> Drop for TerminalGuard<T> {
    fn drop(&mut self) {
        if let Some(terminal) = self.terminal.as_mut() {
            let _ = terminal.stop();
        }
    }
}
