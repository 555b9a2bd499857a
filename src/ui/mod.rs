//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`preview`]: Flattening the rendered tree into terminal lines
//! - [`style`]: Theming and colors

pub mod preview;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{CLEAR_PROMPT, centered_popup_rect};
pub use render::{
    PREVIEW_TITLE, PaneLayout, SOURCE_TITLE, char_display_width, line_number_width, render,
    source_text_width,
};
pub use status::status_text;

#[cfg(test)]
mod tests;
