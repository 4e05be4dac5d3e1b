//! Typed terminal output commands and a single output gate.
//!
//! Invariant: all terminal writes must flow through `OutputGate::flush(..)`.

use std::io;

use crate::core::terminal::Terminal;

pub const ALT_SCREEN_ENTER: &str = "\x1b[?1049h";
pub const ALT_SCREEN_EXIT: &str = "\x1b[?1049l";
pub const CURSOR_HOME: &str = "\x1b[0;0H";
pub const SGR_RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Raw bytes/control sequences to be written to the terminal.
    Bytes(Vec<u8>),

    /// Alternate screen buffer.
    EnterAltScreen,
    ExitAltScreen,

    CursorHome,
    ResetFormat,
    Newline,
}

impl TerminalCmd {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            TerminalCmd::Bytes(data) => data,
            TerminalCmd::EnterAltScreen => ALT_SCREEN_ENTER.as_bytes(),
            TerminalCmd::ExitAltScreen => ALT_SCREEN_EXIT.as_bytes(),
            TerminalCmd::CursorHome => CURSOR_HOME.as_bytes(),
            TerminalCmd::ResetFormat => SGR_RESET.as_bytes(),
            TerminalCmd::Newline => b"\n",
        }
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Flush buffered commands to the terminal.
    ///
    /// This is the single write gate: `Terminal::write(..)` must not be called
    /// from anywhere else. Every command is attempted; the first error wins.
    pub fn flush<T: Terminal + ?Sized>(&mut self, term: &mut T) -> io::Result<()> {
        let mut first_err = None;
        for cmd in self.cmds.drain(..) {
            if let Err(err) = term.write(cmd.as_bytes()) {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{OutputGate, TerminalCmd};
    use crate::core::terminal::{Terminal, TerminalSize};

    #[derive(Default)]
    struct Recorder {
        writes: Vec<u8>,
        fail_first: bool,
    }

    impl Terminal for Recorder {
        fn start(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn stop(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn write(&mut self, data: &[u8]) -> io::Result<()> {
            if std::mem::take(&mut self.fail_first) {
                return Err(io::Error::from(io::ErrorKind::WriteZero));
            }
            self.writes.extend_from_slice(data);
            Ok(())
        }

        fn size(&self) -> io::Result<TerminalSize> {
            Ok(TerminalSize::new(80, 24))
        }
    }

    #[test]
    fn flush_emits_exact_sequences_in_order() {
        let mut gate = OutputGate::new();
        gate.extend([
            TerminalCmd::EnterAltScreen,
            TerminalCmd::CursorHome,
            TerminalCmd::bytes("hi"),
            TerminalCmd::ResetFormat,
            TerminalCmd::ExitAltScreen,
            TerminalCmd::Newline,
        ]);
        let mut term = Recorder::default();
        gate.flush(&mut term).expect("flush");
        assert_eq!(
            String::from_utf8_lossy(&term.writes),
            "\x1b[?1049h\x1b[0;0Hhi\x1b[0m\x1b[?1049l\n"
        );
        assert!(gate.is_empty());
    }

    #[test]
    fn flush_keeps_writing_after_a_failure() {
        let mut gate = OutputGate::new();
        gate.push(TerminalCmd::bytes("lost"));
        gate.push(TerminalCmd::ExitAltScreen);
        let mut term = Recorder {
            fail_first: true,
            ..Recorder::default()
        };
        let err = gate.flush(&mut term).expect_err("first write fails");
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        assert_eq!(term.writes, b"\x1b[?1049l");
    }
}
