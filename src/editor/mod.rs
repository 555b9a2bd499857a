//! Source pane editing.
//!
//! Provides a rope-backed text buffer with cursor and selection management,
//! designed for integration into the TEA architecture.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
