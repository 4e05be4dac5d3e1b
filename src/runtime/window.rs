//! Producer-side window handle.

use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{Receiver, SyncSender};
use std::sync::{Mutex, MutexGuard};
use std::thread;

use crate::core::message::{ControllerEvent, MessageKind, WindowId, WindowMessage};

/// Write sink for one window.
///
/// `write` blocks until the controller has applied the bytes; the other
/// operations only enqueue. Concurrent writes through the same handle are
/// serialized, so at most one write per window is ever in flight.
pub struct Window {
    id: WindowId,
    messages: SyncSender<ControllerEvent>,
    ack: Mutex<Receiver<()>>,
}

fn controller_gone() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "window controller has shut down")
}

impl Window {
    pub(crate) fn new(id: WindowId, messages: SyncSender<ControllerEvent>, ack: Receiver<()>) -> Self {
        Self {
            id,
            messages,
            ack: Mutex::new(ack),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Send `data` and wait for the controller to apply it.
    pub fn write_bytes(&self, data: &[u8]) -> io::Result<usize> {
        if data.is_empty() {
            return Ok(0);
        }

        let ack = self.lock_ack();
        self.messages
            .send(
                WindowMessage::new(self.id, MessageKind::WriteBytes(data.to_vec())).into(),
            )
            .map_err(|_| controller_gone())?;
        ack.recv().map_err(|_| controller_gone())?;
        Ok(data.len())
    }

    /// Blank the window and drop its error state.
    pub fn clear(&self) {
        self.post(MessageKind::Clear);
    }

    /// Replace the title. An empty string clears the title bar rather than
    /// being ignored.
    pub fn title(&self, title: impl Into<String>) {
        self.post(MessageKind::SetTitle(title.into()));
    }

    /// Show the error title colors until the next [`Window::clear`].
    pub fn error_state(&self) {
        self.post(MessageKind::SetErrorState);
    }

    /// Write a `=== <label>` delimiter line.
    pub fn section(&self, label: &str) -> io::Result<()> {
        let line = format!("=== {label}\n");
        let mut sink = self;
        sink.write_all(line.as_bytes())
    }

    /// Run `command` with stdout and stderr both copied into this window.
    pub fn run_with_output(&self, command: &mut Command) -> io::Result<ExitStatus> {
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        thread::scope(|scope| {
            let out = stdout.map(|stream| scope.spawn(move || self.copy_from(stream)));
            let err = stderr.map(|stream| scope.spawn(move || self.copy_from(stream)));

            let status = child.wait();
            for copier in [out, err].into_iter().flatten() {
                copier
                    .join()
                    .map_err(|_| io::Error::other("output copy thread panicked"))??;
            }
            status
        })
    }

    fn copy_from<R: Read>(&self, mut stream: R) -> io::Result<u64> {
        let mut sink = self;
        io::copy(&mut stream, &mut sink)
    }

    fn post(&self, kind: MessageKind) {
        if self.messages.send(WindowMessage::new(self.id, kind).into()).is_err() {
            tracing::debug!(window = self.id, "dropping message; controller has shut down");
        }
    }

    fn lock_ack(&self) -> MutexGuard<'_, Receiver<()>> {
        match self.ack.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window").field("id", &self.id).finish()
    }
}

impl Write for &Window {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Write for Window {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::mpsc;
    use std::thread;

    use super::Window;
    use crate::core::message::{ControllerEvent, MessageKind, WindowMessage};

    fn kind(event: ControllerEvent) -> MessageKind {
        match event {
            ControllerEvent::Window(msg) => msg.kind,
            ControllerEvent::Wake => panic!("unexpected wake event"),
        }
    }

    fn window() -> (Window, mpsc::Receiver<ControllerEvent>, mpsc::SyncSender<()>) {
        let (tx, rx) = mpsc::sync_channel(10);
        let (ack_tx, ack_rx) = mpsc::sync_channel(1);
        (Window::new(3, tx, ack_rx), rx, ack_tx)
    }

    #[test]
    fn write_blocks_until_acknowledged() {
        let (mut window, rx, ack) = window();
        let controller = thread::spawn(move || {
            let msg = rx.recv().expect("write message");
            ack.send(()).expect("ack");
            msg
        });

        assert_eq!(window.write(b"abc").expect("write"), 3);
        let msg = controller.join().expect("controller thread");
        assert_eq!(
            msg,
            ControllerEvent::Window(WindowMessage::new(3, MessageKind::WriteBytes(b"abc".to_vec())))
        );
    }

    #[test]
    fn fire_and_forget_operations_enqueue_without_ack() {
        let (window, rx, _ack) = window();
        window.title("build");
        window.error_state();
        window.clear();
        let kinds: Vec<_> = rx.try_iter().map(kind).collect();
        assert_eq!(
            kinds,
            vec![
                MessageKind::SetTitle("build".into()),
                MessageKind::SetErrorState,
                MessageKind::Clear
            ]
        );
    }

    #[test]
    fn empty_write_sends_nothing() {
        let (window, rx, _ack) = window();
        assert_eq!(window.write_bytes(b"").expect("write"), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn write_after_shutdown_is_broken_pipe() {
        let (window, rx, ack) = window();
        drop(rx);
        drop(ack);
        let err = window.write_bytes(b"late").expect_err("controller gone");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        // Fire-and-forget operations must not panic either.
        window.clear();
    }

    #[test]
    fn section_writes_delimiter_line() {
        let (window, rx, ack) = window();
        let controller = thread::spawn(move || {
            let msg = rx.recv().expect("section message");
            ack.send(()).expect("ack");
            kind(msg)
        });
        window.section("compile").expect("section");
        assert_eq!(
            controller.join().expect("controller thread"),
            MessageKind::WriteBytes(b"=== compile\n".to_vec())
        );
    }
}
