//! Per-window state owned by the controller.

use crate::core::line_buffer::LineBuffer;
use crate::core::message::MessageKind;
use crate::core::text::sanitize_title;

#[derive(Debug, Clone)]
pub struct Pane {
    buffer: LineBuffer,
    title: String,
    error: bool,
}

impl Pane {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: LineBuffer::new(width, height),
            title: String::new(),
            error: false,
        }
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn apply(&mut self, kind: MessageKind) {
        match kind {
            MessageKind::Clear => {
                self.buffer.clear();
                self.error = false;
            }
            MessageKind::SetErrorState => self.error = true,
            MessageKind::SetTitle(title) => self.title = sanitize_title(&title),
            MessageKind::WriteBytes(bytes) => {
                self.buffer.write(&bytes);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Pane;
    use crate::core::message::MessageKind;

    #[test]
    fn error_state_survives_writes_until_clear() {
        let mut pane = Pane::new(4, 2);
        pane.apply(MessageKind::SetErrorState);
        pane.apply(MessageKind::WriteBytes(b"oops\n".to_vec()));
        assert!(pane.is_error());
        pane.apply(MessageKind::Clear);
        assert!(!pane.is_error());
        assert_eq!(pane.buffer().cursor(), (0, 0));
    }

    #[test]
    fn clear_keeps_title() {
        let mut pane = Pane::new(4, 2);
        pane.apply(MessageKind::SetTitle("lint\x07".into()));
        pane.apply(MessageKind::Clear);
        assert_eq!(pane.title(), "lint?");
    }

    #[test]
    fn empty_title_clears_the_bar() {
        let mut pane = Pane::new(4, 2);
        pane.apply(MessageKind::SetTitle("build".into()));
        pane.apply(MessageKind::SetTitle(String::new()));
        assert_eq!(pane.title(), "");
    }
}
