use std::fmt::Write as _;

use super::InlineStyle;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "br", "col", "hr", "img", "input", "link", "meta", "wbr",
];

/// A node in a rendered HTML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Element(element) => element.write_html(out),
            Self::Text(text) => escape_text(text, out),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Self::Text(text) => out.push_str(text),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// An HTML element: tag, attributes, inline style and children.
///
/// The `style` attribute is kept apart from the other attributes as parsed
/// [`InlineStyle`] declarations so that style rules can be applied and
/// removed per property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    style: InlineStyle,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            style: InlineStyle::default(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attr`].
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`Element::push`].
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.push(child);
        self
    }

    /// Builder that sets one inline style declaration.
    #[must_use]
    pub fn with_style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.style.set(property, value);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn is_any(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.tag == *tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case("style") {
            return None;
        }
        self.attributes
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute. A `style` attribute replaces the inline style.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if name.eq_ignore_ascii_case("style") {
            self.style = InlineStyle::parse(&value);
            return;
        }
        let name = name.to_ascii_lowercase();
        if let Some(slot) = self
            .attributes
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub const fn style(&self) -> &InlineStyle {
        &self.style
    }

    pub const fn style_mut(&mut self) -> &mut InlineStyle {
        &mut self.style
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub const fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Merge adjacent text nodes throughout the subtree and drop empty ones,
    /// like DOM `normalize()`.
    pub fn normalize(&mut self) {
        let mut merged: Vec<Node> = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            match child {
                Node::Text(text) if text.is_empty() => {}
                Node::Text(text) => {
                    if let Some(Node::Text(previous)) = merged.last_mut() {
                        previous.push_str(&text);
                    } else {
                        merged.push(Node::Text(text));
                    }
                }
                Node::Element(mut element) => {
                    element.normalize();
                    merged.push(Node::Element(element));
                }
            }
        }
        self.children = merged;
    }

    /// Concatenated text of all descendant text nodes, like DOM `textContent`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Visit every descendant element in document order (pre-order), not
    /// including `self`.
    ///
    /// The callback runs before an element's children are visited, so
    /// children it inserts are visited too.
    pub fn for_each_descendant_mut(&mut self, f: &mut dyn FnMut(&mut Self)) {
        for child in &mut self.children {
            if let Node::Element(element) = child {
                f(element);
                element.for_each_descendant_mut(f);
            }
        }
    }

    /// Visit every descendant element whose tag is one of `tags`.
    pub fn select_mut(&mut self, tags: &[&str], f: &mut dyn FnMut(&mut Self)) {
        self.for_each_descendant_mut(&mut |element| {
            if element.is_any(tags) {
                f(element);
            }
        });
    }

    /// Descendant elements with one of the given tags, in document order.
    pub fn select(&self, tags: &[&str]) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect_matching(tags, &mut found);
        found
    }

    fn collect_matching<'a>(&'a self, tags: &[&str], found: &mut Vec<&'a Self>) {
        for child in &self.children {
            if let Node::Element(element) = child {
                if element.is_any(tags) {
                    found.push(element);
                }
                element.collect_matching(tags, found);
            }
        }
    }

    /// Serialize this element and its subtree.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Serialize only the children, like DOM `innerHTML`.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"");
            escape_attr(value, out);
            out.push('"');
        }
        if !self.style.is_empty() {
            out.push_str(" style=\"");
            escape_attr(&self.style.to_string(), out);
            out.push('"');
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .with_child(
                Element::new("h1")
                    .with_attr("id", "title")
                    .with_child("Tom & Jerry"),
            )
            .with_child(
                Element::new("p")
                    .with_child("a ")
                    .with_child(Element::new("strong").with_child("<b>"))
                    .with_child(Element::new("br")),
            )
    }

    #[test]
    fn test_to_html_escapes_text_and_skips_void_close_tags() {
        assert_eq!(
            sample().to_html(),
            "<div><h1 id=\"title\">Tom &amp; Jerry</h1><p>a <strong>&lt;b&gt;</strong><br></p></div>"
        );
    }

    #[test]
    fn test_style_attribute_is_serialized_last_and_escaped() {
        let el = Element::new("span")
            .with_attr("class", "x")
            .with_style("font-family", "\"Segoe UI\", sans-serif");
        assert_eq!(
            el.to_html(),
            "<span class=\"x\" style=\"font-family: &quot;Segoe UI&quot;, sans-serif\"></span>"
        );
    }

    #[test]
    fn test_set_attr_style_parses_declarations() {
        let mut el = Element::new("p");
        el.set_attr("style", "color: red; background: blue");
        assert_eq!(el.style().get("background"), Some("blue"));
        assert_eq!(el.attr("style"), None);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        assert_eq!(sample().text_content(), "Tom & Jerrya <b>");
    }

    #[test]
    fn test_select_returns_document_order_excluding_root() {
        let root = Element::new("div")
            .with_child(Element::new("div").with_child(Element::new("p").with_child("1")))
            .with_child(Element::new("p").with_child("2"));
        let found = root.select(&["p", "div"]);
        let tags: Vec<_> = found.iter().map(|el| el.tag()).collect();
        assert_eq!(tags, vec!["div", "p", "p"]);
    }

    #[test]
    fn test_for_each_descendant_visits_inserted_children() {
        let mut root = Element::new("div").with_child(Element::new("h1"));
        let mut seen = Vec::new();
        root.for_each_descendant_mut(&mut |el| {
            seen.push(el.tag().to_string());
            if el.is("h1") {
                el.children_mut().insert(0, Element::new("span").into());
            }
        });
        assert_eq!(seen, vec!["h1", "span"]);
    }

    #[test]
    fn test_normalize_merges_adjacent_text() {
        let mut el = Element::new("li")
            .with_child("[")
            .with_child("")
            .with_child(" ] todo")
            .with_child(Element::new("em").with_child("a").with_child("b"));
        el.normalize();
        assert_eq!(el.children().len(), 2);
        assert_eq!(el.children()[0], Node::text("[ ] todo"));
        assert_eq!(el.select(&["em"])[0].children(), &[Node::text("ab")]);
    }

    #[test]
    fn test_has_class_matches_whole_words() {
        let el = Element::new("li").with_attr("class", "task-list-item done");
        assert!(el.has_class("task-list-item"));
        assert!(!el.has_class("task"));
    }
}
