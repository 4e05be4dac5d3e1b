//! Single owner of the terminal and every window buffer.
//!
//! Invariant: only the controller mutates panes or writes to the terminal, and
//! every terminal write goes through its `OutputGate`.

use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::time::{Duration, Instant};

use crate::core::message::{ControllerEvent, WindowMessage};
use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::pane::Pane;
use crate::core::shutdown::ShutdownToken;
use crate::core::terminal::{Terminal, TerminalGuard, TerminalSize};
use crate::error::MultiwindowError;
use crate::render::{Renderer, TITLE_BAR_ROWS};

/// Per-window section size for `windows` windows on a `size` terminal.
pub fn section_geometry(
    size: TerminalSize,
    windows: usize,
) -> Result<(usize, usize), MultiwindowError> {
    if windows == 0 {
        return Err(MultiwindowError::NoWindows);
    }
    let height = (usize::from(size.rows) / windows).saturating_sub(TITLE_BAR_ROWS);
    if height == 0 {
        return Err(MultiwindowError::TerminalTooSmall {
            rows: size.rows,
            windows,
        });
    }
    Ok((usize::from(size.columns), height))
}

pub struct Controller<T: Terminal> {
    terminal: T,
    output: OutputGate,
    renderer: Renderer,
    panes: Vec<Pane>,
    acks: Vec<SyncSender<()>>,
    messages: Receiver<ControllerEvent>,
    shutdown: ShutdownToken,
    frame_interval: Duration,
    dirty: bool,
    restored: bool,
}

impl<T: Terminal> Controller<T> {
    /// Start `terminal`, size one pane per ack channel, and enter the alternate screen.
    ///
    /// On error the terminal is stopped again and nothing has been drawn.
    pub fn start(
        terminal: T,
        messages: Receiver<ControllerEvent>,
        acks: Vec<SyncSender<()>>,
        shutdown: ShutdownToken,
        frame_interval: Duration,
    ) -> Result<Self, MultiwindowError> {
        let mut guard = TerminalGuard::new(terminal);
        guard
            .terminal_mut()
            .start()
            .map_err(MultiwindowError::NotATerminal)?;
        let size = guard
            .terminal_mut()
            .size()
            .map_err(MultiwindowError::Geometry)?;
        let (width, height) = section_geometry(size, acks.len())?;
        let terminal = guard.into_inner();

        tracing::info!(
            columns = size.columns,
            rows = size.rows,
            windows = acks.len(),
            section_width = width,
            section_height = height,
            "controller started"
        );

        let mut controller = Self {
            terminal,
            output: OutputGate::new(),
            renderer: Renderer::new(),
            panes: (0..acks.len()).map(|_| Pane::new(width, height)).collect(),
            acks,
            messages,
            shutdown,
            frame_interval,
            dirty: false,
            restored: false,
        };
        controller.output.push(TerminalCmd::EnterAltScreen);
        controller.flush_output();
        Ok(controller)
    }

    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn frames_rendered(&self) -> u64 {
        self.renderer.frames_rendered()
    }

    /// Apply one message, then acknowledge it if it was a write.
    pub fn apply(&mut self, msg: WindowMessage) {
        let id = msg.id;
        let is_write = msg.is_write();
        let Some(pane) = self.panes.get_mut(id) else {
            tracing::warn!(window = id, "message for unknown window");
            return;
        };
        pane.apply(msg.kind);
        self.dirty = true;

        if is_write {
            match self.acks[id].try_send(()) {
                Ok(()) => {}
                Err(TrySendError::Disconnected(())) => {
                    tracing::debug!(window = id, "window dropped before acknowledgment");
                }
                Err(TrySendError::Full(())) => {
                    tracing::warn!(window = id, "acknowledgment already pending");
                }
            }
        }
    }

    /// Redraw every pane if anything changed since the last tick.
    ///
    /// Returns whether a frame was drawn.
    pub fn tick(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        let cmds = self.renderer.render(&self.panes);
        self.output.extend(cmds);
        self.flush_output();
        tracing::trace!(frame = self.renderer.frames_rendered(), "frame drawn");
        true
    }

    /// Serve messages and ticks until the shutdown token is cancelled, then
    /// restore the terminal.
    pub fn run(&mut self) {
        let mut next_tick = Instant::now() + self.frame_interval;
        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            let now = Instant::now();
            if now >= next_tick {
                self.tick();
                next_tick += self.frame_interval;
                if next_tick <= now {
                    next_tick = now + self.frame_interval;
                }
                continue;
            }

            match self.messages.recv_timeout(next_tick - now) {
                Ok(ControllerEvent::Window(msg)) => {
                    if self.shutdown.is_cancelled() {
                        break;
                    }
                    self.apply(msg);
                }
                Ok(ControllerEvent::Wake) => {}
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("all windows dropped; waiting for shutdown");
                    self.tick();
                    self.shutdown.wait();
                    break;
                }
            }
        }
        self.restore();
    }

    /// Leave the alternate screen and reset formatting. Runs at most once.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        self.output.push(TerminalCmd::ExitAltScreen);
        self.output.push(TerminalCmd::ResetFormat);
        self.output.push(TerminalCmd::Newline);
        self.flush_output();
        if let Err(err) = self.terminal.stop() {
            tracing::warn!(error = %err, "failed to restore terminal mode");
        }
        tracing::info!(frames = self.renderer.frames_rendered(), "controller stopped");
    }

    fn flush_output(&mut self) {
        if let Err(err) = self.output.flush(&mut self.terminal) {
            tracing::warn!(error = %err, "terminal write failed");
        }
    }
}

impl<T: Terminal> Drop for Controller<T> {
    fn drop(&mut self) {
        self.restore();
    }
}
