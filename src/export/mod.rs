//! Rich-text export.
//!
//! Publishing platforms paste HTML through editors that drop `<style>` blocks
//! and class attributes. [`export`] rewrites a rendered tree so every element
//! carries the inline declarations it needs to look right on its own, and
//! [`copy_rich_text`] hands the result to a [`Clipboard`].
//!
//! The passes run in a fixed order. Later passes only add declarations for
//! their own category, so the specific rules (header shading, blockquote
//! tint, first-level heading counters) are never undone by the generic ones,
//! and the root container defaults go on last.

mod rules;

pub use rules::{Category, DEFAULT_ACCENT, declarations};

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clipboard::{Clipboard, ClipboardError};
use crate::html::{Element, Node};

const UNCHECKED_TOKEN: &str = "[ ]";
const CHECKED_TOKEN: &str = "[x]";
const UNCHECKED_GLYPH: &str = "☐";
const CHECKED_GLYPH: &str = "☑";

/// How task-list items are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskDetection {
    /// A list item holding a checkbox `input`, as emitted by the renderer.
    #[default]
    Structural,
    /// A list item whose text contains `[ ]` or `[x]`, or that holds a
    /// checkbox `input`.
    ///
    /// Also fires on items that merely mention those bracket sequences.
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Accent color for links, emphasis, counters, checked tasks and quotes.
    pub accent: String,
    pub task_detection: TaskDetection,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            accent: DEFAULT_ACCENT.to_string(),
            task_detection: TaskDetection::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("copying rich text is not supported here")]
    CopyUnsupported,
    #[error("copying rich text failed: {0}")]
    CopyFailed(#[source] ClipboardError),
}

/// Produce a style-inlined copy of `rendered`.
///
/// The children of `rendered` are cloned into a fresh `div` container; the
/// input tree is left untouched.
pub fn export(rendered: &Element, options: &ExportOptions) -> Element {
    let started = Instant::now();
    let accent = options.accent.as_str();
    let mut root = Element::new("div");
    for child in rendered.children() {
        root.push(child.clone());
    }

    strip_backgrounds(&mut root);
    style_tables(&mut root, accent);
    apply_to(&mut root, &["blockquote"], Category::Blockquote, accent);
    apply_to(&mut root, &["ul", "ol"], Category::List, accent);
    style_task_items(&mut root, options);
    apply_to(&mut root, &["a"], Category::Link, accent);
    style_headings(&mut root, accent);
    apply_to(&mut root, &["p"], Category::Paragraph, accent);
    apply_to(&mut root, &["strong", "b"], Category::Strong, accent);
    apply_to(&mut root, &["em", "i"], Category::Emphasis, accent);
    apply_to(&mut root, &["img"], Category::Image, accent);
    style_code_spans(&mut root, accent, false);
    apply_to(&mut root, &["pre"], Category::CodeBlock, accent);
    rules::apply(Category::Root, root.style_mut(), accent);

    debug!(
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "exported rich text"
    );
    root
}

/// Export and serialize in one step.
pub fn export_html(rendered: &Element, options: &ExportOptions) -> String {
    export(rendered, options).to_html()
}

/// Export `rendered` and place it on `clipboard` as HTML, with the plain
/// text as the alternative flavor.
///
/// # Errors
///
/// [`ExportError::CopyUnsupported`] when the clipboard declines the copy,
/// [`ExportError::CopyFailed`] when it reports an error. Either way nothing
/// else about the caller's state changes.
pub fn copy_rich_text(
    rendered: &Element,
    options: &ExportOptions,
    clipboard: &mut dyn Clipboard,
) -> Result<(), ExportError> {
    let styled = export(rendered, options);
    let html = styled.to_html();
    let plain = styled.text_content();
    match clipboard.copy_html(&html, &plain) {
        Ok(true) => {
            info!(bytes = html.len(), "copied rich text");
            Ok(())
        }
        Ok(false) => {
            warn!("clipboard declined rich text copy");
            Err(ExportError::CopyUnsupported)
        }
        Err(err) => {
            warn!(error = %err, "rich text copy failed");
            Err(ExportError::CopyFailed(err))
        }
    }
}

fn apply_to(root: &mut Element, tags: &[&str], category: Category, accent: &str) {
    root.select_mut(tags, &mut |element| {
        rules::apply(category, element.style_mut(), accent);
    });
}

fn strip_backgrounds(root: &mut Element) {
    root.for_each_descendant_mut(&mut |element| {
        let style = element.style_mut();
        style.remove("background-color");
        style.remove("background");
    });
}

fn style_tables(root: &mut Element, accent: &str) {
    apply_to(root, &["table"], Category::Table, accent);
    apply_to(root, &["th", "td"], Category::TableCell, accent);
    apply_to(root, &["th"], Category::TableHeader, accent);

    // Even rows lose any zebra striping.
    root.for_each_descendant_mut(&mut |parent| {
        let mut position = 0;
        for child in parent.children_mut() {
            let Node::Element(element) = child else {
                continue;
            };
            position += 1;
            if position % 2 == 0 && element.is("tr") {
                element.style_mut().remove("background-color");
            }
        }
    });
}

fn style_task_items(root: &mut Element, options: &ExportOptions) {
    let accent = options.accent.as_str();
    root.select_mut(&["li"], &mut |item| {
        let converted = match options.task_detection {
            TaskDetection::Structural => replace_checkbox(item, accent),
            TaskDetection::Literal => replace_literal_token(item, accent),
        };
        if converted {
            rules::apply(Category::TaskItem, item.style_mut(), accent);
        }
    });
}

fn glyph(checked: bool, accent: &str) -> Element {
    let (category, text) = if checked {
        (Category::TaskGlyphChecked, CHECKED_GLYPH)
    } else {
        (Category::TaskGlyphUnchecked, UNCHECKED_GLYPH)
    };
    let mut span = Element::new("span").with_child(text);
    rules::apply(category, span.style_mut(), accent);
    span
}

fn replace_checkbox(item: &mut Element, accent: &str) -> bool {
    let Some(position) = item.children().iter().position(|child| {
        child
            .as_element()
            .is_some_and(|el| el.is("input") && el.attr("type") == Some("checkbox"))
    }) else {
        return false;
    };
    let checked = item.children()[position]
        .as_element()
        .is_some_and(|el| el.has_attr("checked"));
    item.children_mut()[position] = glyph(checked, accent).into();
    true
}

fn replace_literal_token(item: &mut Element, accent: &str) -> bool {
    // GFM task items arrive from the renderer with their brackets already
    // turned into a checkbox.
    if replace_checkbox(item, accent) {
        return true;
    }
    let text = item.text_content();
    let (token, checked) = if text.contains(UNCHECKED_TOKEN) {
        (UNCHECKED_TOKEN, false)
    } else if text.contains(CHECKED_TOKEN) {
        (CHECKED_TOKEN, true)
    } else {
        return false;
    };
    item.normalize();
    replace_first_text(item, token, &glyph(checked, accent));
    true
}

/// Replace the first occurrence of `token` inside a single text node.
fn replace_first_text(element: &mut Element, token: &str, replacement: &Element) -> bool {
    let children = element.children_mut();
    for idx in 0..children.len() {
        let split = match &children[idx] {
            Node::Text(text) => text
                .find(token)
                .map(|at| (text[..at].to_string(), text[at + token.len()..].to_string())),
            Node::Element(_) => None,
        };
        if let Some((before, after)) = split {
            let mut parts = Vec::with_capacity(3);
            if !before.is_empty() {
                parts.push(Node::Text(before));
            }
            parts.push(replacement.clone().into());
            if !after.is_empty() {
                parts.push(Node::Text(after));
            }
            children.splice(idx..=idx, parts);
            return true;
        }
        if let Node::Element(child) = &mut children[idx] {
            if replace_first_text(child, token, replacement) {
                return true;
            }
        }
    }
    false
}

fn style_headings(root: &mut Element, accent: &str) {
    apply_to(
        root,
        &["h1", "h2", "h3", "h4", "h5", "h6"],
        Category::Heading,
        accent,
    );

    let mut counter = 0_usize;
    root.select_mut(&["h1"], &mut |heading| {
        counter += 1;
        rules::apply(Category::HeadingOne, heading.style_mut(), accent);
        let mut label = Element::new("span").with_child(format!("{counter:02}"));
        rules::apply(Category::HeadingOneCounter, label.style_mut(), accent);
        heading.children_mut().insert(0, label.into());
    });

    apply_to(root, &["h2"], Category::HeadingTwo, accent);
}

fn style_code_spans(element: &mut Element, accent: &str, inside_pre: bool) {
    for child in element.children_mut() {
        let Node::Element(child) = child else {
            continue;
        };
        if child.is("code") && !inside_pre {
            rules::apply(Category::CodeSpan, child.style_mut(), accent);
        }
        let nested_pre = inside_pre || child.is("pre");
        style_code_spans(child, accent, nested_pre);
    }
}
