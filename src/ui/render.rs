use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::scroll::Pane;

use super::style::Theme;
use super::{overlays, status};

pub const SOURCE_TITLE: &str = " 编辑 ";
pub const PREVIEW_TITLE: &str = " 预览 ";

/// Screen areas of the two panes and the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    pub source: Rect,
    pub preview: Rect,
    pub status: Rect,
}

impl PaneLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);
        Self {
            source: columns[0],
            preview: columns[1],
            status: rows[1],
        }
    }

    /// Text area of the source pane, inside its border.
    pub fn source_inner(&self) -> Rect {
        pane_block(SOURCE_TITLE, Style::default()).inner(self.source)
    }

    /// Text area of the preview pane, inside its border.
    pub fn preview_inner(&self) -> Rect {
        pane_block(PREVIEW_TITLE, Style::default()).inner(self.preview)
    }

    /// The pane under a screen position, borders included.
    pub fn pane_at(&self, column: u16, row: u16) -> Option<Pane> {
        let position = Position::new(column, row);
        if self.source.contains(position) {
            Some(Pane::Source)
        } else if self.preview.contains(position) {
            Some(Pane::Preview)
        } else {
            None
        }
    }
}

fn pane_block(title: &str, border_style: Style) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = PaneLayout::new(area);

    render_source(model, frame, layout.source);
    render_preview(model, frame, layout.preview);
    status::render_status_bar(model, frame, layout.status);

    if model.alert.is_some() {
        overlays::render_alert_overlay(model, frame, area);
    } else if model.confirm_clear {
        overlays::render_confirm_clear_overlay(model, frame, area);
    } else if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_source(model: &Model, frame: &mut Frame, area: Rect) {
    let block = pane_block(SOURCE_TITLE, Style::default().fg(model.theme.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buf = &model.buffer;
    let gutter_width = line_number_width(buf.line_count());
    let text_width = source_text_width(inner.width, buf.line_count());
    let cursor = buf.cursor();
    let selection = buf.selection();

    let mut content: Vec<Line> = Vec::new();
    for line_idx in model.source_viewport.visible_range() {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);
        let mut spans = vec![Span::styled(line_num, model.theme.gutter)];
        let view = SourceLineView {
            first_char: buf.line_to_char(line_idx),
            cursor_col: (line_idx == cursor.line).then_some(cursor.col),
            selection: selection.clone(),
            col_offset: model.source_col_offset,
            width: text_width,
        };
        spans.extend(source_line_spans(&line_text, &view, &model.theme));
        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, inner);
    frame.render_widget(Paragraph::new(content), inner);
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let block = pane_block(PREVIEW_TITLE, model.theme.table_border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = model
        .preview_lines()
        .get(model.preview_viewport.visible_range())
        .unwrap_or_default()
        .to_vec();
    frame.render_widget(Clear, inner);
    frame.render_widget(Paragraph::new(visible), inner);
}

struct SourceLineView {
    first_char: usize,
    cursor_col: Option<usize>,
    selection: Option<Range<usize>>,
    col_offset: usize,
    width: usize,
}

fn source_line_spans(text: &str, view: &SourceLineView, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut col = 0;
    for (idx, ch) in text.chars().enumerate() {
        let width = char_display_width(ch);
        if col < view.col_offset {
            col += width;
            continue;
        }
        if col + width - view.col_offset > view.width {
            break;
        }
        let mut style = Style::default();
        if view
            .selection
            .as_ref()
            .is_some_and(|range| range.contains(&(view.first_char + idx)))
        {
            style = style.patch(theme.selection);
        }
        if view.cursor_col == Some(idx) {
            style = style.patch(theme.cursor);
        }
        push_styled(&mut spans, display_char(ch), style);
        col += width;
    }

    let line_width: usize = text.chars().map(char_display_width).sum();
    if let Some(cursor_col) = view.cursor_col
        && cursor_col >= text.chars().count()
        && line_width >= view.col_offset
        && line_width - view.col_offset < view.width
    {
        push_styled(&mut spans, ' ', theme.cursor);
    }
    spans
}

fn push_styled(spans: &mut Vec<Span<'static>>, ch: char, style: Style) {
    if let Some(last) = spans.last_mut()
        && last.style == style
    {
        last.content.to_mut().push(ch);
        return;
    }
    spans.push(Span::styled(ch.to_string(), style));
}

fn display_char(ch: char) -> char {
    if ch == '\t' || ch.is_control() { ' ' } else { ch }
}

/// Columns a character occupies in the source pane.
pub fn char_display_width(ch: char) -> usize {
    if ch == '\t' || ch.is_control() {
        1
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Columns available for text in a source pane `inner_width` wide.
pub fn source_text_width(inner_width: u16, total_lines: usize) -> usize {
    usize::from(inner_width.saturating_sub(line_number_width(total_lines) + 1)).max(1)
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
