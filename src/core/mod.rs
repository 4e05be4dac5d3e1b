pub mod line_buffer;
pub mod message;
pub mod output;
pub mod pane;
pub mod shutdown;
pub mod terminal;
pub mod text;
