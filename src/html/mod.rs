//! Abstract HTML tree.
//!
//! The renderer builds these trees, the preview pane flattens them into
//! terminal lines and the rich-text exporter rewrites their inline styles.

mod node;
mod style;

pub use node::{Element, Node};
pub use style::InlineStyle;
