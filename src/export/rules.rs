//! Inline style rule table for rich-text export.
//!
//! Values containing `{accent}` are resolved against the export accent color
//! when applied.

use crate::html::InlineStyle;

/// Default accent color.
pub const DEFAULT_ACCENT: &str = "#35B378";

/// Element categories that receive inline styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Table,
    TableCell,
    TableHeader,
    Blockquote,
    List,
    TaskItem,
    TaskGlyphUnchecked,
    TaskGlyphChecked,
    Link,
    Heading,
    HeadingOne,
    HeadingOneCounter,
    HeadingTwo,
    Paragraph,
    Strong,
    Emphasis,
    Image,
    CodeSpan,
    CodeBlock,
    Root,
}

const BORDER: &str = "1px solid #d0d7de";
const MONO_FONTS: &str =
    "ui-monospace, SFMono-Regular, SF Mono, Menlo, Consolas, Liberation Mono, monospace";
const BODY_FONTS: &str = "-apple-system, BlinkMacSystemFont, \"Segoe UI\", \"Noto Sans\", \
                          Helvetica, Arial, sans-serif, \"Apple Color Emoji\", \"Segoe UI Emoji\"";

const TABLE: &[(&str, &str)] = &[
    ("display", "table"),
    ("width", "100%"),
    ("overflow", "auto"),
    ("margin-bottom", "16px"),
    ("border-spacing", "0"),
    ("border-collapse", "collapse"),
    ("border", BORDER),
];

const TABLE_CELL: &[(&str, &str)] = &[("padding", "6px 13px"), ("border", BORDER)];

const TABLE_HEADER: &[(&str, &str)] = &[
    ("font-weight", "600"),
    ("background-color", "#f6f8fa"),
];

const BLOCKQUOTE: &[(&str, &str)] = &[
    ("margin", "16px 0"),
    ("padding", "10px 16px"),
    ("color", "#3f3f3f"),
    ("border-left", "4px solid {accent}"),
    ("background-color", "#f5f9f5"),
];

const LIST: &[(&str, &str)] = &[
    ("padding-left", "2em"),
    ("margin-bottom", "16px"),
    ("list-style", "none"),
];

const TASK_ITEM: &[(&str, &str)] = &[
    ("list-style", "none"),
    ("padding-left", "0"),
    ("margin-bottom", "8px"),
    ("display", "flex"),
    ("align-items", "center"),
    ("line-height", "1.6"),
];

const TASK_GLYPH_UNCHECKED: &[(&str, &str)] = &[
    ("margin-right", "8px"),
    ("font-size", "16px"),
    ("color", "#d0d7de"),
];

const TASK_GLYPH_CHECKED: &[(&str, &str)] = &[
    ("margin-right", "8px"),
    ("font-size", "16px"),
    ("color", "{accent}"),
];

const LINK: &[(&str, &str)] = &[("color", "{accent}"), ("text-decoration", "none")];

const HEADING: &[(&str, &str)] = &[
    ("margin-top", "24px"),
    ("margin-bottom", "16px"),
    ("font-weight", "600"),
    ("line-height", "1.25"),
    ("color", "#24292f"),
];

const HEADING_ONE: &[(&str, &str)] = &[
    ("font-size", "24px"),
    ("padding-bottom", "0.3em"),
    ("border-bottom", BORDER),
    ("position", "relative"),
];

const HEADING_ONE_COUNTER: &[(&str, &str)] = &[
    ("color", "{accent}"),
    ("font-weight", "700"),
    ("margin-right", "12px"),
    ("font-size", "24px"),
];

const HEADING_TWO: &[(&str, &str)] = &[
    ("font-size", "1.5em"),
    ("padding-bottom", "0.3em"),
    ("border-bottom", BORDER),
];

const PARAGRAPH: &[(&str, &str)] = &[("line-height", "1.6")];

const STRONG: &[(&str, &str)] = &[("color", "{accent}"), ("font-weight", "600")];

const EMPHASIS: &[(&str, &str)] = &[("color", "{accent}"), ("font-style", "italic")];

const IMAGE: &[(&str, &str)] = &[
    ("max-width", "100%"),
    ("box-sizing", "content-box"),
    ("height", "auto"),
];

const CODE_SPAN: &[(&str, &str)] = &[
    ("padding", "0.2em 0.4em"),
    ("margin", "0"),
    ("font-size", "85%"),
    ("background-color", "#f6f8fa"),
    ("color", "#24292e"),
    ("border-radius", "3px"),
    ("font-family", MONO_FONTS),
];

const CODE_BLOCK: &[(&str, &str)] = &[
    ("padding", "16px"),
    ("overflow", "auto"),
    ("font-size", "14px"),
    ("line-height", "1.5"),
    ("background-color", "#f6f8fa"),
    ("border", "1px solid #e1e4e8"),
    ("border-radius", "6px"),
    ("margin-bottom", "16px"),
];

const ROOT: &[(&str, &str)] = &[
    ("line-height", "1.6"),
    ("color", "#3f3f3f"),
    ("font-family", BODY_FONTS),
    ("font-size", "16px"),
];

/// The declarations for one category, with `{accent}` unresolved.
pub const fn declarations(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::Table => TABLE,
        Category::TableCell => TABLE_CELL,
        Category::TableHeader => TABLE_HEADER,
        Category::Blockquote => BLOCKQUOTE,
        Category::List => LIST,
        Category::TaskItem => TASK_ITEM,
        Category::TaskGlyphUnchecked => TASK_GLYPH_UNCHECKED,
        Category::TaskGlyphChecked => TASK_GLYPH_CHECKED,
        Category::Link => LINK,
        Category::Heading => HEADING,
        Category::HeadingOne => HEADING_ONE,
        Category::HeadingOneCounter => HEADING_ONE_COUNTER,
        Category::HeadingTwo => HEADING_TWO,
        Category::Paragraph => PARAGRAPH,
        Category::Strong => STRONG,
        Category::Emphasis => EMPHASIS,
        Category::Image => IMAGE,
        Category::CodeSpan => CODE_SPAN,
        Category::CodeBlock => CODE_BLOCK,
        Category::Root => ROOT,
    }
}

/// Apply a category's declarations to `style`.
pub fn apply(category: Category, style: &mut InlineStyle, accent: &str) {
    for (property, value) in declarations(category) {
        if value.contains("{accent}") {
            style.set(property, value.replace("{accent}", accent));
        } else {
            style.set(property, *value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_resolves_accent_placeholder() {
        let mut style = InlineStyle::default();
        apply(Category::Blockquote, &mut style, "#ff0000");
        assert_eq!(style.get("border-left"), Some("4px solid #ff0000"));
        assert_eq!(style.get("background-color"), Some("#f5f9f5"));
    }

    #[test]
    fn test_apply_twice_is_stable() {
        let mut once = InlineStyle::default();
        apply(Category::CodeBlock, &mut once, DEFAULT_ACCENT);
        let mut twice = once.clone();
        apply(Category::CodeBlock, &mut twice, DEFAULT_ACCENT);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_rule_leaves_placeholder_unresolved() {
        let mut style = InlineStyle::default();
        for category in [
            Category::Link,
            Category::Strong,
            Category::Emphasis,
            Category::HeadingOneCounter,
            Category::TaskGlyphChecked,
        ] {
            apply(category, &mut style, DEFAULT_ACCENT);
        }
        assert!(style.iter().all(|(_, value)| !value.contains('{')));
    }
}
