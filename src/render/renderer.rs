//! Full-frame renderer: title bars plus buffer rows for every pane.
//!
//! Every frame starts at the top-left and overwrites the whole screen, so no
//! state about the previous frame is kept.

use crate::core::output::TerminalCmd;
use crate::core::pane::Pane;
use crate::core::text::fit_to_width;

/// White background, black text.
pub const NORMAL_TITLE_COLORS: &str = "\x1b[107m\x1b[30m";
/// Red background, black text.
pub const ERROR_TITLE_COLORS: &str = "\x1b[41m\x1b[30m";

const TITLE_INDENT: usize = 3;

/// Rows each pane spends on its title bar.
pub const TITLE_BAR_ROWS: usize = 3;

pub fn title_colors(error: bool) -> &'static str {
    if error {
        ERROR_TITLE_COLORS
    } else {
        NORMAL_TITLE_COLORS
    }
}

#[derive(Debug, Default)]
pub struct Renderer {
    frames_rendered: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn render(&mut self, panes: &[Pane]) -> Vec<TerminalCmd> {
        let mut cmds = Vec::with_capacity(1 + panes.len() * 3);
        cmds.push(TerminalCmd::CursorHome);
        for pane in panes {
            cmds.push(TerminalCmd::Bytes(title_bar(pane)));
            cmds.push(TerminalCmd::ResetFormat);
            cmds.push(TerminalCmd::Bytes(pane_body(pane)));
        }
        self.frames_rendered += 1;
        cmds
    }
}

/// Colored blank row, indented title row, colored blank row.
fn title_bar(pane: &Pane) -> Vec<u8> {
    let width = pane.buffer().width();
    let (title, title_width) = fit_to_width(pane.title(), width.saturating_sub(TITLE_INDENT));

    let mut out = Vec::with_capacity(width * TITLE_BAR_ROWS + title.len() + 16);
    out.extend_from_slice(title_colors(pane.is_error()).as_bytes());
    pad(&mut out, width);
    pad(&mut out, TITLE_INDENT.min(width));
    out.extend_from_slice(title.as_bytes());
    pad(&mut out, width.saturating_sub(TITLE_INDENT + title_width));
    pad(&mut out, width);
    out
}

fn pane_body(pane: &Pane) -> Vec<u8> {
    let buffer = pane.buffer();
    let mut out = Vec::with_capacity(buffer.width() * buffer.height());
    for row in buffer.render_lines() {
        out.extend_from_slice(row);
    }
    out
}

fn pad(out: &mut Vec<u8>, count: usize) {
    out.resize(out.len() + count, b' ');
}

#[cfg(test)]
mod tests {
    use super::{Renderer, ERROR_TITLE_COLORS, NORMAL_TITLE_COLORS};
    use crate::core::message::MessageKind;
    use crate::core::output::{OutputGate, TerminalCmd};
    use crate::core::pane::Pane;

    fn flatten(cmds: Vec<TerminalCmd>) -> String {
        let mut gate = OutputGate::new();
        gate.extend(cmds);
        let mut sink = Sink::default();
        gate.flush(&mut sink).expect("flush");
        String::from_utf8(sink.0).expect("frame is utf-8")
    }

    #[derive(Default)]
    struct Sink(Vec<u8>);

    impl crate::core::terminal::Terminal for Sink {
        fn start(&mut self) -> std::io::Result<()> {
            Ok(())
        }
        fn stop(&mut self) -> std::io::Result<()> {
            Ok(())
        }
        fn write(&mut self, data: &[u8]) -> std::io::Result<()> {
            self.0.extend_from_slice(data);
            Ok(())
        }
        fn size(&self) -> std::io::Result<crate::core::terminal::TerminalSize> {
            Ok(crate::core::terminal::TerminalSize::new(80, 24))
        }
    }

    #[test]
    fn renders_exact_title_bar_and_rows() {
        let mut pane = Pane::new(8, 2);
        pane.apply(MessageKind::SetTitle("ok".into()));
        pane.apply(MessageKind::WriteBytes(b"hi\nyo".to_vec()));

        let frame = flatten(Renderer::new().render(&[pane]));
        let expected = format!(
            "\x1b[0;0H{NORMAL_TITLE_COLORS}{}   ok   {}\x1b[0mhi      yo      ",
            " ".repeat(8),
            " ".repeat(8)
        );
        assert_eq!(frame, expected);
    }

    #[test]
    fn error_state_switches_title_colors() {
        let mut pane = Pane::new(6, 1);
        pane.apply(MessageKind::SetErrorState);
        let frame = flatten(Renderer::new().render(&[pane]));
        assert!(frame.contains(ERROR_TITLE_COLORS));
        assert!(!frame.contains(NORMAL_TITLE_COLORS));
    }

    #[test]
    fn long_title_is_truncated_to_section_width() {
        let mut pane = Pane::new(6, 1);
        pane.apply(MessageKind::SetTitle("integration".into()));
        let frame = flatten(Renderer::new().render(&[pane]));
        assert!(frame.contains("   int"));
        assert!(!frame.contains("inte"));
        // Three title rows plus one body row, each exactly six cells.
        let visible: String = frame
            .replace("\x1b[0;0H", "")
            .replace(NORMAL_TITLE_COLORS, "")
            .replace("\x1b[0m", "");
        assert_eq!(visible.len(), 6 * 4);
    }

    #[test]
    fn panes_render_in_index_order() {
        let mut first = Pane::new(10, 1);
        first.apply(MessageKind::SetTitle("build".into()));
        let mut second = Pane::new(10, 1);
        second.apply(MessageKind::SetTitle("test".into()));
        let mut renderer = Renderer::new();
        let frame = flatten(renderer.render(&[first, second]));
        let build = frame.find("build").expect("first title");
        let test = frame.find("test").expect("second title");
        assert!(build < test);
        assert_eq!(renderer.frames_rendered(), 1);
    }
}
