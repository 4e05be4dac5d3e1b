//! Rendering pipeline.

pub mod renderer;

pub use renderer::{Renderer, ERROR_TITLE_COLORS, NORMAL_TITLE_COLORS, TITLE_BAR_ROWS};
