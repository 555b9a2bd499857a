//! Syntax highlighting for code blocks.
//!
//! Uses syntect with Sublime Text syntax definitions. Highlighted code is
//! emitted as HTML spans with inline `color` declarations so the result
//! survives targets that strip class-based styling.

use std::sync::{Mutex, OnceLock};

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;
use tracing::{debug, warn};

use crate::html::{Element, Node};

/// Highlighting a block failed partway through.
///
/// Never surfaced to the user: the caller falls back to another syntax or to
/// plain text.
#[derive(Debug, Error)]
#[error("failed to highlight {syntax} code: {source}")]
pub struct HighlightError {
    syntax: String,
    #[source]
    source: syntect::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightBackground {
    #[default]
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<HighlightBackground>> = OnceLock::new();

/// Choose the theme family used for all subsequent highlighting.
pub fn set_background_mode(mode: HighlightBackground) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(HighlightBackground::default()));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

pub fn background_mode() -> HighlightBackground {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(HighlightBackground::default()));
    lock.lock().map(|guard| *guard).unwrap_or_default()
}

/// Highlight `code` written in `language`.
///
/// The declared language is resolved by token (`rs`, `js`) and then by name
/// (`Rust`). When it is missing or unsupported the syntax is detected from
/// the first line (shebangs, XML prologs, ...). Code that matches nothing is
/// returned as a single text node.
pub fn highlight(code: &str, language: Option<&str>) -> Vec<Node> {
    let syntax_set = syntax_set();
    let declared = language.and_then(|lang| find_declared(syntax_set, lang));
    let detected = detect(syntax_set, code);

    for syntax in [declared, detected].into_iter().flatten() {
        match highlight_with(syntax_set, syntax, code) {
            Ok(nodes) => return nodes,
            Err(err) => warn!(language = ?language, error = %err, "highlighting failed"),
        }
    }

    if let Some(lang) = language {
        debug!(language = lang, "no syntax found; leaving code unhighlighted");
    }
    vec![Node::text(code)]
}

fn find_declared<'a>(syntax_set: &'a SyntaxSet, language: &str) -> Option<&'a SyntaxReference> {
    let language = language.trim();
    if language.is_empty() {
        return None;
    }
    syntax_set
        .find_syntax_by_token(language)
        .or_else(|| syntax_set.find_syntax_by_name(language))
}

fn detect<'a>(syntax_set: &'a SyntaxSet, code: &str) -> Option<&'a SyntaxReference> {
    let first_line = code.lines().next()?;
    syntax_set.find_syntax_by_first_line(first_line)
}

fn highlight_with(
    syntax_set: &SyntaxSet,
    syntax: &SyntaxReference,
    code: &str,
) -> Result<Vec<Node>, HighlightError> {
    let mut highlighter = HighlightLines::new(syntax, theme_for(background_mode()));
    let mut nodes = Vec::new();
    let mut pending: Option<(Style, String)> = None;

    for line in LinesWithEndings::from(code) {
        let ranges = highlighter
            .highlight_line(line, syntax_set)
            .map_err(|source| HighlightError {
                syntax: syntax.name.clone(),
                source,
            })?;
        for (style, text) in ranges {
            if let Some((current, buffer)) = pending.as_mut() {
                if same_look(current, &style) {
                    buffer.push_str(text);
                    continue;
                }
            }
            if let Some((prev_style, prev_text)) = pending.take() {
                nodes.push(styled_span(prev_style, prev_text));
            }
            pending = Some((style, text.to_string()));
        }
    }
    if let Some((style, text)) = pending {
        nodes.push(styled_span(style, text));
    }
    Ok(nodes)
}

fn same_look(a: &Style, b: &Style) -> bool {
    a.foreground == b.foreground && a.font_style == b.font_style
}

fn styled_span(style: Style, text: String) -> Node {
    if text.trim().is_empty() {
        return Node::Text(text);
    }
    let fg = style.foreground;
    let mut span = Element::new("span").with_style(
        "color",
        format!("#{:02x}{:02x}{:02x}", fg.r, fg.g, fg.b),
    );
    if style.font_style.contains(FontStyle::BOLD) {
        span.style_mut().set("font-weight", "bold");
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        span.style_mut().set("font-style", "italic");
    }
    span.with_child(text).into()
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_for(mode: HighlightBackground) -> &'static Theme {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    static FALLBACK: OnceLock<Theme> = OnceLock::new();
    let theme_set = THEME_SET.get_or_init(ThemeSet::load_defaults);
    let preferred = match mode {
        HighlightBackground::Light => [
            "InspiredGitHub",
            "Solarized (light)",
            "base16-ocean.light",
        ]
        .as_slice(),
        HighlightBackground::Dark => [
            "base16-ocean.dark",
            "base16-eighties.dark",
            "Solarized (dark)",
        ]
        .as_slice(),
    };

    preferred
        .iter()
        .find_map(|name| theme_set.themes.get(*name))
        .or_else(|| theme_set.themes.values().next())
        .unwrap_or_else(|| FALLBACK.get_or_init(Theme::default))
}
