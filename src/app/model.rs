use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::{Position, Rect};
use ratatui::text::Line;
use tracing::debug;

use crate::editor::EditorBuffer;
use crate::scroll::Pane;
use crate::session::EditorSession;
use crate::ui::preview::preview_lines;
use crate::ui::style::Theme;
use crate::ui::viewport::Viewport;
use crate::ui::{PaneLayout, char_display_width, line_number_width, source_text_width};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The document with its rendered tree, word count and store
    pub session: EditorSession,
    /// Editable copy of the document text with cursor and selection
    pub buffer: EditorBuffer,
    /// Visible lines of the source pane
    pub source_viewport: Viewport,
    /// Visible lines of the preview pane
    pub preview_viewport: Viewport,
    /// First visible display column of the source pane
    pub source_col_offset: usize,
    preview: Vec<Line<'static>>,
    pub theme: Theme,
    /// Blocking message; any key dismisses it
    pub alert: Option<String>,
    /// Whether the clear confirmation is showing
    pub confirm_clear: bool,
    pub help_visible: bool,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Scroll sync started by the last update, released once it has been applied
    pending_settle: Option<u64>,
    /// Terminal size the panes were laid out for
    size: (u16, u16),
    /// Store path shown in help
    pub store_path: Option<PathBuf>,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("buffer", &self.buffer)
            .field("source_viewport", &self.source_viewport)
            .field("preview_viewport", &self.preview_viewport)
            .field("confirm_clear", &self.confirm_clear)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model for `session`, laid out for a terminal of `terminal_size`.
    pub fn new(session: EditorSession, theme: Theme, terminal_size: (u16, u16)) -> Self {
        let buffer = EditorBuffer::from_text(session.text());
        let layout = PaneLayout::new(Rect::new(0, 0, terminal_size.0, terminal_size.1));
        let source = layout.source_inner();
        let preview = layout.preview_inner();

        let mut model = Self {
            source_viewport: Viewport::new(source.width, source.height, buffer.line_count()),
            preview_viewport: Viewport::new(preview.width, preview.height, 0),
            session,
            buffer,
            source_col_offset: 0,
            preview: Vec::new(),
            theme,
            alert: None,
            confirm_clear: false,
            help_visible: false,
            toast: None,
            should_quit: false,
            pending_settle: None,
            size: terminal_size,
            store_path: None,
            config_global_path: None,
            config_local_path: None,
        };
        model.rebuild_preview();
        model
    }

    pub fn layout(&self) -> PaneLayout {
        PaneLayout::new(Rect::new(0, 0, self.size.0, self.size.1))
    }

    /// Preview lines for the current text and preview width.
    pub fn preview_lines(&self) -> &[Line<'static>] {
        &self.preview
    }

    pub(super) fn rebuild_preview(&mut self) {
        let started = Instant::now();
        self.preview = preview_lines(
            self.session.rendered(),
            self.preview_viewport.width(),
            &self.theme,
        );
        self.preview_viewport.set_total_lines(self.preview.len());
        debug!(
            lines = self.preview.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "preview reflowed"
        );
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        let layout = self.layout();
        let source = layout.source_inner();
        let preview = layout.preview_inner();
        let preview_width_changed = preview.width != self.preview_viewport.width();

        self.source_viewport.resize(source.width, source.height);
        self.preview_viewport.resize(preview.width, preview.height);
        if preview_width_changed {
            self.rebuild_preview();
        }
        self.follow_cursor();
    }

    /// Push the buffer's text into the session.
    pub(super) fn commit_edit(&mut self) {
        self.session.set_text(self.buffer.text());
        self.buffer.mark_clean();
        self.after_text_change();
    }

    /// Refresh everything derived from the session's text.
    pub(super) fn after_text_change(&mut self) {
        self.source_viewport
            .set_total_lines(self.buffer.line_count());
        self.rebuild_preview();
        self.follow_cursor();
    }

    /// Keep the cursor visible in the source pane, horizontally and vertically.
    pub(super) fn follow_cursor(&mut self) {
        let before = self.source_viewport.offset();
        let cursor = self.buffer.cursor();
        self.source_viewport.reveal(cursor.line);

        let text_width = source_text_width(self.source_viewport.width(), self.buffer.line_count());
        let line = self.buffer.line_at(cursor.line).unwrap_or_default();
        let cursor_display: usize = line
            .chars()
            .take(cursor.col)
            .map(char_display_width)
            .sum();
        if cursor_display < self.source_col_offset {
            self.source_col_offset = cursor_display;
        } else if cursor_display >= self.source_col_offset + text_width {
            self.source_col_offset = cursor_display + 1 - text_width;
        }

        if self.source_viewport.offset() != before {
            self.sync_from(Pane::Source);
        }
    }

    /// Mirror `pane`'s scroll position onto the other pane.
    pub(super) fn sync_from(&mut self, pane: Pane) {
        let (source, target) = match pane {
            Pane::Source => (
                self.source_viewport.metrics(),
                self.preview_viewport.metrics(),
            ),
            Pane::Preview => (
                self.preview_viewport.metrics(),
                self.source_viewport.metrics(),
            ),
        };
        let Some(command) = self.session.on_scroll(pane, source, target) else {
            return;
        };
        match command.target {
            Pane::Source => self.source_viewport.go_to_line(command.offset),
            Pane::Preview => self.preview_viewport.go_to_line(command.offset),
        }
        self.pending_settle = Some(command.generation);
    }

    /// Release the scroll guard taken by the last update.
    pub fn settle_pending_scroll(&mut self) -> bool {
        self.pending_settle
            .take()
            .is_some_and(|generation| self.session.settle_scroll(generation))
    }

    /// Buffer position under a screen cell of the source pane.
    ///
    /// Clicks below the last line land at the end of the text.
    pub fn source_position_at(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        let inner = self.layout().source_inner();
        if !inner.contains(Position::new(column, row)) {
            return None;
        }
        let line_count = self.buffer.line_count();
        let line = self.source_viewport.offset() + usize::from(row - inner.y);
        if line >= line_count {
            return Some((line_count.saturating_sub(1), usize::MAX));
        }
        let gutter = line_number_width(line_count) + 1;
        let display = usize::from(column.saturating_sub(inner.x + gutter)) + self.source_col_offset;
        let text = self.buffer.line_at(line).unwrap_or_default();
        Some((line, char_col_at_display(&text, display)))
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Whether a popup is capturing input.
    pub const fn overlay_active(&self) -> bool {
        self.alert.is_some() || self.confirm_clear || self.help_visible
    }
}

/// Character column whose cell covers display column `display`.
fn char_col_at_display(text: &str, display: usize) -> usize {
    let mut col = 0;
    for (idx, ch) in text.chars().enumerate() {
        let width = char_display_width(ch);
        if col + width > display {
            return idx;
        }
        col += width;
    }
    text.chars().count()
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            session: EditorSession::blank(),
            buffer: EditorBuffer::empty(),
            source_viewport: Viewport::new(80, 24, 0),
            preview_viewport: Viewport::new(80, 24, 0),
            source_col_offset: 0,
            preview: Vec::new(),
            theme: Theme::default(),
            alert: None,
            confirm_clear: false,
            help_visible: false,
            toast: None,
            should_quit: false,
            pending_settle: None,
            size: (80, 24),
            store_path: None,
            config_global_path: None,
            config_local_path: None,
        }
    }
}
