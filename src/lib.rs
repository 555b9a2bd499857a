// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. export::ExportError)
    clippy::module_name_repetitions
)]

//! # Markpad
//!
//! A two-pane terminal markdown editor that exports rich text for
//! publishing platforms.
//!
//! Markpad provides:
//! - Live preview of the document next to its source
//! - Proportional scroll synchronization between the panes
//! - Rich-text copy with every style inlined onto the elements
//! - A word count that treats each CJK ideograph as a word
//! - A static file server for the browser build
//!
//! ## Architecture
//!
//! Markpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state, owning one [`session::EditorSession`]
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`session`]: The document and everything derived from it
//! - [`render`]: Markdown to element tree
//! - [`export`]: Inline-style transform for rich-text copy
//! - [`html`]: Element tree, serializer and style declarations
//! - [`highlight`]: Syntax highlighting
//! - [`scroll`]: Scroll synchronization between panes
//! - [`editor`]: Rope-backed text buffer with selection
//! - [`ui`]: Terminal UI components
//! - [`server`]: Static file server

pub mod app;
pub mod clipboard;
pub mod config;
pub mod editor;
pub mod export;
pub mod highlight;
pub mod html;
pub mod render;
pub mod scroll;
pub mod server;
pub mod session;
pub mod store;
pub mod ui;
pub mod words;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::export::{ExportOptions, TaskDetection};
    pub use crate::render::RenderOptions;
    pub use crate::session::EditorSession;
    pub use crate::ui::viewport::Viewport;
}
