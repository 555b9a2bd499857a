//! Markdown rendering with comrak.
//!
//! Parses raw text with comrak and converts the AST into an [`Element`]
//! tree, highlighting fenced code along the way. The tree is the single
//! rendered form of a document: the preview pane, the HTML output and the
//! rich-text exporter all consume it.
//!
//! Raw HTML in the source is never passed through. Inline and block HTML
//! are rendered as escaped text, and link targets with script-capable
//! schemes are dropped.

use std::time::Instant;

use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{Anchorizer, Arena, Options, parse_document};
use tracing::debug;

use crate::highlight;
use crate::html::{Element, Node};

/// Class on the root container of every rendered tree.
pub const ROOT_CLASS: &str = "markdown-body";

/// Class on list items that carry a GFM task checkbox.
pub const TASK_ITEM_CLASS: &str = "task-list-item";

/// Rendering switches, mirroring the options the preview was designed around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render single newlines inside a paragraph as `<br>`.
    pub hard_breaks: bool,
    /// GitHub flavored extensions: tables, strikethrough, autolinks, task lists.
    pub gfm: bool,
    /// Give headings slug `id` attributes.
    pub header_ids: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            hard_breaks: true,
            gfm: true,
            header_ids: true,
        }
    }
}

/// Render markdown into a tree rooted at a `div.markdown-body` container.
///
/// # Example
///
/// ```
/// use markpad::render::{render, RenderOptions};
///
/// let root = render("# Hello\n\n- [x] done", &RenderOptions::default());
/// assert_eq!(root.select(&["h1"]).len(), 1);
/// assert_eq!(root.select(&["input"]).len(), 1);
/// ```
pub fn render(source: &str, options: &RenderOptions) -> Element {
    let started = Instant::now();
    let arena = Arena::new();
    let mut comrak_options = Options::default();
    configure(&mut comrak_options, options);
    let document = parse_document(&arena, source, &comrak_options);

    let mut converter = Converter {
        options,
        anchorizer: Anchorizer::new(),
    };
    let mut root = Element::new("div").with_attr("class", ROOT_CLASS);
    for child in document.children() {
        for node in converter.convert(child) {
            root.push(node);
        }
    }

    debug!(
        bytes = source.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "rendered markdown"
    );
    root
}

/// Render markdown to an HTML fragment (the root container's inner HTML).
pub fn render_html(source: &str, options: &RenderOptions) -> String {
    render(source, options).inner_html()
}

/// Wrap a rendered fragment in a standalone page that links `styles.css`.
pub fn standalone_page(title: &str, fragment: &str) -> String {
    let mut escaped_title = String::new();
    for ch in title.chars() {
        match ch {
            '&' => escaped_title.push_str("&amp;"),
            '<' => escaped_title.push_str("&lt;"),
            '>' => escaped_title.push_str("&gt;"),
            _ => escaped_title.push(ch),
        }
    }
    format!(
        "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{escaped_title}</title>\n<link rel=\"stylesheet\" href=\"styles.css\">\n\
         </head>\n<body>\n<div class=\"{ROOT_CLASS}\">\n{fragment}\n</div>\n</body>\n</html>\n"
    )
}

fn configure(comrak: &mut Options, options: &RenderOptions) {
    if options.gfm {
        comrak.extension.strikethrough = true;
        comrak.extension.table = true;
        comrak.extension.autolink = true;
        comrak.extension.tasklist = true;
    }
}

struct Converter<'o> {
    options: &'o RenderOptions,
    anchorizer: Anchorizer,
}

impl Converter<'_> {
    fn convert<'a>(&mut self, node: &'a AstNode<'a>) -> Vec<Node> {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Paragraph => {
                let children = self.convert_children(node);
                if in_tight_list(node) {
                    children
                } else {
                    vec![element_with(Element::new("p"), children)]
                }
            }
            NodeValue::Heading(heading) => {
                let mut element = Element::new(&format!("h{}", heading.level.clamp(1, 6)));
                for child in self.convert_children(node) {
                    element.push(child);
                }
                if self.options.header_ids {
                    let id = self.anchorizer.anchorize(element.text_content());
                    element.set_attr("id", id);
                }
                vec![element.into()]
            }
            NodeValue::BlockQuote => vec![element_with(
                Element::new("blockquote"),
                self.convert_children(node),
            )],
            NodeValue::List(list) => {
                let element = match list.list_type {
                    ListType::Bullet => Element::new("ul"),
                    ListType::Ordered if list.start != 1 => {
                        Element::new("ol").with_attr("start", list.start.to_string())
                    }
                    ListType::Ordered => Element::new("ol"),
                };
                vec![element_with(element, self.convert_children(node))]
            }
            NodeValue::Item(_) => vec![element_with(
                Element::new("li"),
                self.convert_children(node),
            )],
            NodeValue::TaskItem(symbol) => {
                let mut checkbox = Element::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if symbol.is_some() {
                    checkbox.set_attr("checked", "");
                }
                let mut item = Element::new("li")
                    .with_attr("class", TASK_ITEM_CLASS)
                    .with_child(checkbox)
                    .with_child(" ");
                for child in self.convert_children(node) {
                    item.push(child);
                }
                vec![item.into()]
            }
            NodeValue::CodeBlock(block) => {
                let language = block
                    .info
                    .split_whitespace()
                    .next()
                    .filter(|lang| !lang.is_empty());
                let mut code = Element::new("code");
                if let Some(lang) = language {
                    code.set_attr("class", format!("language-{lang}"));
                }
                for span in highlight::highlight(&block.literal, language) {
                    code.push(span);
                }
                vec![Element::new("pre").with_child(code).into()]
            }
            NodeValue::HtmlBlock(block) => vec![Node::Text(block.literal)],
            NodeValue::HtmlInline(raw) => vec![Node::Text(raw)],
            NodeValue::ThematicBreak => vec![Element::new("hr").into()],
            NodeValue::Table(table) => vec![self.convert_table(node, &table.alignments).into()],
            NodeValue::Text(text) => vec![Node::Text(text)],
            NodeValue::SoftBreak => {
                if self.options.hard_breaks {
                    vec![Element::new("br").into(), Node::text("\n")]
                } else {
                    vec![Node::text("\n")]
                }
            }
            NodeValue::LineBreak => vec![Element::new("br").into(), Node::text("\n")],
            NodeValue::Code(code) => {
                vec![Element::new("code").with_child(code.literal).into()]
            }
            NodeValue::Emph => vec![element_with(Element::new("em"), self.convert_children(node))],
            NodeValue::Strong => vec![element_with(
                Element::new("strong"),
                self.convert_children(node),
            )],
            NodeValue::Strikethrough => vec![element_with(
                Element::new("del"),
                self.convert_children(node),
            )],
            NodeValue::Link(link) => {
                let mut anchor = Element::new("a");
                if is_safe_url(&link.url) {
                    anchor.set_attr("href", link.url);
                }
                if !link.title.is_empty() {
                    anchor.set_attr("title", link.title);
                }
                vec![element_with(anchor, self.convert_children(node))]
            }
            NodeValue::Image(link) => {
                let alt = element_with(Element::new("span"), self.convert_children(node));
                let alt = alt
                    .as_element()
                    .map(Element::text_content)
                    .unwrap_or_default();
                let mut image = Element::new("img");
                if is_safe_url(&link.url) {
                    image.set_attr("src", link.url);
                }
                image.set_attr("alt", alt);
                if !link.title.is_empty() {
                    image.set_attr("title", link.title);
                }
                vec![image.into()]
            }
            _ => self.convert_children(node),
        }
    }

    fn convert_children<'a>(&mut self, node: &'a AstNode<'a>) -> Vec<Node> {
        let mut out = Vec::new();
        for child in node.children() {
            out.extend(self.convert(child));
        }
        out
    }

    fn convert_table<'a>(&mut self, node: &'a AstNode<'a>, alignments: &[TableAlignment]) -> Element {
        let mut head = Element::new("thead");
        let mut body = Element::new("tbody");

        for row_node in node.children() {
            let is_header = match &row_node.data.borrow().value {
                NodeValue::TableRow(header) => *header,
                _ => continue,
            };
            let mut row = Element::new("tr");
            for (idx, cell_node) in row_node.children().enumerate() {
                let mut cell = Element::new(if is_header { "th" } else { "td" });
                if let Some(align) = alignments.get(idx).and_then(alignment_attr) {
                    cell.set_attr("align", align);
                }
                for child in self.convert_children(cell_node) {
                    cell.push(child);
                }
                row.push(cell);
            }
            if is_header {
                head.push(row);
            } else {
                body.push(row);
            }
        }

        let mut table = Element::new("table");
        if !head.children().is_empty() {
            table.push(head);
        }
        if !body.children().is_empty() {
            table.push(body);
        }
        table
    }
}

fn element_with(mut element: Element, children: Vec<Node>) -> Node {
    for child in children {
        element.push(child);
    }
    element.into()
}

const fn alignment_attr(alignment: &TableAlignment) -> Option<&'static str> {
    match alignment {
        TableAlignment::Left => Some("left"),
        TableAlignment::Center => Some("center"),
        TableAlignment::Right => Some("right"),
        TableAlignment::None => None,
    }
}

fn in_tight_list<'a>(paragraph: &'a AstNode<'a>) -> bool {
    paragraph
        .parent()
        .and_then(|item| item.parent())
        .is_some_and(|list| matches!(&list.data.borrow().value, NodeValue::List(l) if l.tight))
}

fn is_safe_url(url: &str) -> bool {
    const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "file:", "data:"];
    const SAFE_DATA: &[&str] = &[
        "data:image/png",
        "data:image/gif",
        "data:image/jpeg",
        "data:image/webp",
    ];
    let lower = url.trim_start().to_ascii_lowercase();
    if SAFE_DATA.iter().any(|prefix| lower.starts_with(prefix)) {
        return true;
    }
    !UNSAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(source: &str) -> String {
        render_html(source, &RenderOptions::default())
    }

    #[test]
    fn test_heading_gets_slug_id() {
        assert_eq!(html("# Hello World"), "<h1 id=\"hello-world\">Hello World</h1>");
    }

    #[test]
    fn test_duplicate_headings_get_unique_ids() {
        let root = render("## Intro\n\n## Intro", &RenderOptions::default());
        let ids: Vec<_> = root
            .select(&["h2"])
            .iter()
            .filter_map(|h| h.attr("id").map(str::to_string))
            .collect();
        assert_eq!(ids, vec!["intro".to_string(), "intro-1".to_string()]);
    }

    #[test]
    fn test_header_ids_can_be_disabled() {
        let options = RenderOptions {
            header_ids: false,
            ..RenderOptions::default()
        };
        assert_eq!(render_html("# Hi", &options), "<h1>Hi</h1>");
    }

    #[test]
    fn test_soft_break_becomes_br_with_hard_breaks() {
        assert_eq!(html("one\ntwo"), "<p>one<br>\ntwo</p>");
        let options = RenderOptions {
            hard_breaks: false,
            ..RenderOptions::default()
        };
        assert_eq!(render_html("one\ntwo", &options), "<p>one\ntwo</p>");
    }

    #[test]
    fn test_tight_list_items_have_no_paragraphs() {
        assert_eq!(html("- a\n- b"), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_loose_list_items_keep_paragraphs() {
        assert_eq!(
            html("- a\n\n- b"),
            "<ul><li><p>a</p></li><li><p>b</p></li></ul>"
        );
    }

    #[test]
    fn test_ordered_list_keeps_start() {
        assert!(html("3. three\n4. four").starts_with("<ol start=\"3\">"));
    }

    #[test]
    fn test_task_items_render_checkboxes() {
        assert_eq!(
            html("- [x] done\n- [ ] todo"),
            "<ul><li class=\"task-list-item\"><input type=\"checkbox\" disabled=\"\" checked=\"\"> done</li>\
             <li class=\"task-list-item\"><input type=\"checkbox\" disabled=\"\"> todo</li></ul>"
        );
    }

    #[test]
    fn test_task_items_are_plain_text_without_gfm() {
        let options = RenderOptions {
            gfm: false,
            ..RenderOptions::default()
        };
        let out = render_html("- [ ] todo", &options);
        assert!(out.contains("[ ] todo"));
        assert!(!out.contains("<input"));
    }

    #[test]
    fn test_table_splits_head_and_body() {
        let out = html("| a | b |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            out,
            "<table><thead><tr><th align=\"left\">a</th><th align=\"right\">b</th></tr></thead>\
             <tbody><tr><td align=\"left\">1</td><td align=\"right\">2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_code_block_carries_language_class_and_highlighting() {
        let root = render("```rust\nfn main() {}\n```", &RenderOptions::default());
        let code = root.select(&["code"]);
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].attr("class"), Some("language-rust"));
        assert!(!code[0].select(&["span"]).is_empty());
        assert_eq!(code[0].text_content(), "fn main() {}\n");
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let out = html("<script>alert(1)</script>\n\nhi <b>x</b>");
        assert!(out.contains("&lt;script&gt;"));
        assert!(out.contains("hi &lt;b&gt;x&lt;/b&gt;"));
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_javascript_links_lose_href() {
        let out = html("[x](javascript:alert(1))");
        assert_eq!(out, "<p><a>x</a></p>");
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            html("**b** *i* ~~s~~ `c`"),
            "<p><strong>b</strong> <em>i</em> <del>s</del> <code>c</code></p>"
        );
    }

    #[test]
    fn test_image_alt_and_title() {
        assert_eq!(
            html("![alt *text*](a.png \"T\")"),
            "<p><img src=\"a.png\" alt=\"alt text\" title=\"T\"></p>"
        );
    }

    #[test]
    fn test_email_addresses_are_not_mangled() {
        let out = html("mail me@example.com");
        assert!(out.contains("me@example.com"));
    }

    #[test]
    fn test_standalone_page_links_stylesheet() {
        let page = standalone_page("a<b", "<p>x</p>");
        assert!(page.contains("<title>a&lt;b</title>"));
        assert!(page.contains("href=\"styles.css\""));
        assert!(page.contains("<p>x</p>"));
    }
}
