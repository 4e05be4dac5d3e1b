//! Messages sent from window handles to the controller.

/// Stable window identity: a dense index in `[0, count)`.
pub type WindowId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// Blank the buffer, home the cursor, and drop the error state.
    Clear,
    /// Switch the title bar to the error colors until the next `Clear`.
    SetErrorState,
    SetTitle(String),
    /// Acknowledged on the window's private channel once applied.
    WriteBytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowMessage {
    pub id: WindowId,
    pub kind: MessageKind,
}

impl WindowMessage {
    pub fn new(id: WindowId, kind: MessageKind) -> Self {
        Self { id, kind }
    }

    pub fn is_write(&self) -> bool {
        matches!(self.kind, MessageKind::WriteBytes(_))
    }
}

/// Items on the controller's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    Window(WindowMessage),
    /// Pushed when the shutdown token is cancelled so an idle loop wakes at once.
    Wake,
}

impl From<WindowMessage> for ControllerEvent {
    fn from(msg: WindowMessage) -> Self {
        Self::Window(msg)
    }
}
