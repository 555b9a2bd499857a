//! Flattening a rendered tree into styled terminal lines for the preview pane.
//!
//! Block elements start new lines; paragraphs, headings and lists are
//! separated by a blank line. Text wraps at word boundaries, and CJK text
//! may break between any two characters. Code blocks keep their own line
//! structure and wrap by character.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::html::{Element, Node};

use super::style::{Theme, parse_css_color};

const BLOCK_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "blockquote", "ul", "ol", "pre", "table", "hr",
    "div",
];

/// Flatten `root` into lines at most `width` columns wide.
pub fn preview_lines(root: &Element, width: u16, theme: &Theme) -> Vec<Line<'static>> {
    let mut flattener = Flattener::new(usize::from(width).max(4), theme);
    flattener.container(root, Style::default());
    flattener.end_line();
    flattener.lines
}

struct Prefix {
    first: String,
    rest: String,
    style: Style,
    used: bool,
}

struct Flattener<'t> {
    theme: &'t Theme,
    width: usize,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    current_width: usize,
    prefix_width: usize,
    line_open: bool,
    pending_gap: bool,
    prefixes: Vec<Prefix>,
}

impl<'t> Flattener<'t> {
    const fn new(width: usize, theme: &'t Theme) -> Self {
        Self {
            theme,
            width,
            lines: Vec::new(),
            current: Vec::new(),
            current_width: 0,
            prefix_width: 0,
            line_open: false,
            pending_gap: false,
            prefixes: Vec::new(),
        }
    }

    // --- Line assembly ---

    fn start_line(&mut self) {
        if self.line_open {
            return;
        }
        if self.pending_gap && !self.lines.is_empty() {
            let blank: Vec<Span<'static>> = self
                .prefixes
                .iter()
                .map(|prefix| Span::styled(prefix.rest.clone(), prefix.style))
                .collect();
            self.lines.push(Line::from(blank));
        }
        self.pending_gap = false;

        let mut width = 0;
        for prefix in &mut self.prefixes {
            let text = if prefix.used {
                prefix.rest.clone()
            } else {
                prefix.used = true;
                prefix.first.clone()
            };
            width += text.width();
            self.current.push(Span::styled(text, prefix.style));
        }
        self.current_width = width;
        self.prefix_width = width;
        self.line_open = true;
    }

    fn end_line(&mut self) {
        if !self.line_open {
            return;
        }
        self.lines.push(Line::from(std::mem::take(&mut self.current)));
        self.current_width = 0;
        self.line_open = false;
    }

    fn gap(&mut self) {
        self.end_line();
        self.pending_gap = true;
    }

    const fn at_line_start(&self) -> bool {
        !self.line_open || self.current_width == self.prefix_width
    }

    fn append(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        self.start_line();
        self.current_width += text.width();
        if self.current.len() > self.prefixes.len()
            && let Some(last) = self.current.last_mut()
            && last.style == style
        {
            last.content.to_mut().push_str(text);
            return;
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    /// Wrapped prose.
    fn push_text(&mut self, text: &str, style: Style) {
        for token in tokens(text) {
            let token_width = token.width();
            if token.chars().all(char::is_whitespace) {
                if self.at_line_start() {
                    continue;
                }
                if self.current_width + token_width > self.width {
                    self.end_line();
                    continue;
                }
                self.append(" ", style);
                continue;
            }
            if !self.at_line_start() && self.current_width + token_width > self.width {
                self.end_line();
            }
            self.start_line();
            if self.current_width + token_width > self.width {
                self.push_chars(token, style);
            } else {
                self.append(token, style);
            }
        }
    }

    /// Character-wrapped text that keeps its whitespace and newlines.
    fn push_chars(&mut self, text: &str, style: Style) {
        let mut buf = String::new();
        for ch in text.chars() {
            if ch == '\n' {
                self.append(&std::mem::take(&mut buf), style);
                self.start_line();
                self.end_line();
                continue;
            }
            let (ch_text, ch_width) = if ch == '\t' {
                ("    ".to_string(), 4)
            } else {
                (ch.to_string(), ch.width().unwrap_or(0))
            };
            self.start_line();
            let pending = buf.width();
            if self.current_width + pending + ch_width > self.width
                && self.current_width + pending > self.prefix_width
            {
                self.append(&std::mem::take(&mut buf), style);
                self.end_line();
                self.start_line();
            }
            buf.push_str(&ch_text);
        }
        self.append(&buf, style);
    }

    // --- Tree walking ---

    fn container(&mut self, element: &Element, style: Style) {
        for child in element.children() {
            self.node(child, style);
        }
    }

    fn node(&mut self, node: &Node, style: Style) {
        match node {
            Node::Text(text) => self.push_text(text, style),
            Node::Element(element) if element.is_any(BLOCK_TAGS) => self.block(element, style),
            Node::Element(element) => self.inline(element, style),
        }
    }

    fn block(&mut self, element: &Element, style: Style) {
        match element.tag() {
            tag @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                self.end_line();
                self.container(element, style.patch(self.theme.heading(level)));
                self.gap();
            }
            "p" => {
                self.end_line();
                self.container(element, style);
                self.gap();
            }
            "blockquote" => {
                self.end_line();
                self.prefixes.push(Prefix {
                    first: "│ ".to_string(),
                    rest: "│ ".to_string(),
                    style: self.theme.quote,
                    used: false,
                });
                self.container(element, style.patch(self.theme.quote));
                self.end_line();
                self.prefixes.pop();
                self.gap();
            }
            "ul" | "ol" => self.list(element, style),
            "pre" => self.code_block(element),
            "table" => self.table(element, style),
            "hr" => {
                self.end_line();
                self.start_line();
                let rule = "─".repeat(self.width.saturating_sub(self.current_width));
                self.append(&rule, self.theme.hr);
                self.gap();
            }
            _ => self.container(element, style),
        }
    }

    fn inline(&mut self, element: &Element, style: Style) {
        let theme = self.theme;
        match element.tag() {
            "strong" | "b" => self.container(element, style.patch(theme.strong)),
            "em" | "i" => self.container(element, style.patch(theme.emphasis)),
            "del" | "s" => self.container(element, style.patch(theme.strikethrough)),
            "code" => self.container(element, style.patch(theme.inline_code)),
            "a" => self.container(element, style.patch(theme.link)),
            "br" => {
                self.start_line();
                self.end_line();
            }
            "img" => {
                let alt = element.attr("alt").unwrap_or_default();
                self.push_text(&format!("[图片: {alt}]"), style.patch(theme.image));
            }
            "input" => {}
            "span" => {
                let color = element.style().get("color").and_then(parse_css_color);
                let style = color.map_or(style, |fg| style.fg(fg));
                self.container(element, style);
            }
            _ => self.container(element, style),
        }
    }

    fn list(&mut self, list: &Element, style: Style) {
        let ordered = list.is("ol");
        let start = list
            .attr("start")
            .and_then(|start| start.parse::<usize>().ok())
            .unwrap_or(1);
        let nested = !self.prefixes.is_empty();
        self.end_line();

        let items = list
            .children()
            .iter()
            .filter_map(Node::as_element)
            .filter(|el| el.is("li"));
        for (idx, item) in items.enumerate() {
            let (marker, marker_style) = self.list_marker(item, ordered, start + idx);
            let indent = " ".repeat(marker.width());
            self.prefixes.push(Prefix {
                first: marker,
                rest: indent,
                style: marker_style,
                used: false,
            });
            self.container(item, style);
            self.end_line();
            self.prefixes.pop();
        }
        if !nested {
            self.gap();
        }
    }

    fn list_marker(&self, item: &Element, ordered: bool, number: usize) -> (String, Style) {
        let checkbox = item.children().iter().filter_map(Node::as_element).find(|el| {
            el.is("input") && el.attr("type") == Some("checkbox")
        });
        match checkbox {
            Some(input) if input.has_attr("checked") => {
                ("☑ ".to_string(), self.theme.task_checked)
            }
            Some(_) => ("☐ ".to_string(), self.theme.task_unchecked),
            None if ordered => (format!("{number}. "), self.theme.list_marker),
            None => ("• ".to_string(), self.theme.list_marker),
        }
    }

    fn code_block(&mut self, pre: &Element) {
        self.end_line();
        self.prefixes.push(Prefix {
            first: "  ".to_string(),
            rest: "  ".to_string(),
            style: Style::default(),
            used: false,
        });
        let code_style = self.theme.code;
        let mut pieces: Vec<(String, Style)> = Vec::new();
        collect_code(pre, code_style, &mut pieces);
        if let Some((last, _)) = pieces.last_mut() {
            while last.ends_with('\n') {
                last.pop();
            }
        }
        for (text, style) in pieces {
            self.push_chars(&text, style);
        }
        if !self.line_open {
            self.start_line();
        }
        self.end_line();
        self.prefixes.pop();
        self.gap();
    }

    fn table(&mut self, table: &Element, style: Style) {
        self.end_line();
        let rows: Vec<Vec<(String, bool, Option<String>)>> = table
            .select(&["tr"])
            .into_iter()
            .map(|row| {
                row.children()
                    .iter()
                    .filter_map(Node::as_element)
                    .filter(|cell| cell.is_any(&["th", "td"]))
                    .map(|cell| {
                        (
                            cell.text_content().replace('\n', " "),
                            cell.is("th"),
                            cell.attr("align").map(ToOwned::to_owned),
                        )
                    })
                    .collect()
            })
            .collect();
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut widths = vec![1_usize; columns];
        for row in &rows {
            for (col, (text, _, _)) in row.iter().enumerate() {
                widths[col] = widths[col].max(text.width());
            }
        }
        let available = self
            .width
            .saturating_sub(self.prefix_total_width())
            .saturating_sub(3 * (columns - 1));
        let total: usize = widths.iter().sum();
        if total > available {
            let cap = (available / columns).max(1);
            for width in &mut widths {
                *width = (*width).min(cap);
            }
        }

        let border = self.theme.table_border;
        for (row_idx, row) in rows.iter().enumerate() {
            self.start_line();
            for (col, width) in widths.iter().enumerate() {
                if col > 0 {
                    self.append(" │ ", border);
                }
                let (text, header, align) = row
                    .get(col)
                    .map_or(("", false, None), |(t, h, a)| (t.as_str(), *h, a.as_deref()));
                let cell_style = if header {
                    style.patch(self.theme.strong)
                } else {
                    style
                };
                let cell = pad_cell(text, *width, align);
                self.append(&cell, cell_style);
            }
            self.end_line();

            let is_header_row = row.iter().any(|(_, header, _)| *header);
            if is_header_row && row_idx == 0 {
                self.start_line();
                let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
                self.append(&rule.join("─┼─"), border);
                self.end_line();
            }
        }
        self.gap();
    }

    fn prefix_total_width(&self) -> usize {
        self.prefixes
            .iter()
            .map(|prefix| prefix.rest.width().max(prefix.first.width()))
            .sum()
    }
}

fn collect_code(element: &Element, style: Style, out: &mut Vec<(String, Style)>) {
    for child in element.children() {
        match child {
            Node::Text(text) => out.push((text.clone(), style)),
            Node::Element(el) => {
                let color = el.style().get("color").and_then(parse_css_color);
                collect_code(el, color.map_or(style, |fg| style.fg(fg)), out);
            }
        }
    }
}

fn pad_cell(text: &str, width: usize, align: Option<&str>) -> String {
    let mut fitted = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        fitted.push(ch);
        used += w;
    }
    let pad = width - used;
    match align {
        Some("right") => format!("{}{fitted}", " ".repeat(pad)),
        Some("center") => format!(
            "{}{fitted}{}",
            " ".repeat(pad / 2),
            " ".repeat(pad - pad / 2)
        ),
        _ => format!("{fitted}{}", " ".repeat(pad)),
    }
}

/// Split into whitespace runs, runs of narrow non-space characters, and
/// single wide characters.
fn tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<(usize, bool)> = None;
    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        let wide = ch.width().unwrap_or(0) > 1;
        if let Some((begin, was_space)) = start
            && (was_space != space || wide)
        {
            out.push(&text[begin..idx]);
            start = None;
        }
        if wide {
            out.push(&text[idx..idx + ch.len_utf8()]);
            continue;
        }
        if start.is_none() {
            start = Some((idx, space));
        }
    }
    if let Some((begin, _)) = start {
        out.push(&text[begin..]);
    }
    out
}
