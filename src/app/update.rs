use crate::app::Model;
use crate::editor::{Direction, EditorBuffer};
use crate::scroll::Pane;
use crate::session::Wrap;
use crate::ui::viewport::Viewport;

/// Spaces inserted for Tab.
pub const TAB_SPACES: &str = "    ";

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
/// Movement messages carry `true` when the selection should be extended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Split line at cursor (Enter)
    InsertNewline,
    /// Insert spaces for Tab
    InsertTab,
    /// Insert pasted text
    Paste(String),
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,

    // Cursor
    MoveCursor(Direction, bool),
    MoveHome(bool),
    MoveEnd(bool),
    MoveWordLeft(bool),
    MoveWordRight(bool),
    MoveToStart(bool),
    MoveToEnd(bool),
    /// Move the cursor one source page up
    PageUp(bool),
    /// Move the cursor one source page down
    PageDown(bool),
    /// Place the cursor (mouse click)
    ClickSource(usize, usize),
    /// Extend the selection (mouse drag)
    DragSource(usize, usize),
    SelectAll,

    // Formatting
    /// Wrap the selection in emphasis markers
    Format(Wrap),

    // Panes
    /// Scroll the source pane by n lines (negative is up)
    ScrollSource(isize),
    /// Scroll the preview pane by n lines (negative is up)
    ScrollPreview(isize),

    // Document
    /// Copy the preview as rich text
    CopyRichText,
    /// Ask before clearing
    RequestClear,
    ConfirmClear,
    CancelClear,
    DismissAlert,
    ToggleHelp,
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Save and quit
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. The one
/// side effect is the session's autosave on every text change; clipboard
/// and exit handling live in the effects.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Editing
        Message::InsertChar(ch) => {
            model.buffer.insert_char(ch);
            model.commit_edit();
        }
        Message::InsertNewline => {
            model.buffer.split_line();
            model.commit_edit();
        }
        Message::InsertTab => {
            model.buffer.insert_str(TAB_SPACES);
            model.commit_edit();
        }
        Message::Paste(text) => {
            let text = text.replace("\r\n", "\n").replace('\r', "\n");
            model.buffer.insert_str(&text);
            model.commit_edit();
        }
        Message::DeleteBack => {
            if model.buffer.delete_back() {
                model.commit_edit();
            }
        }
        Message::DeleteForward => {
            if model.buffer.delete_forward() {
                model.commit_edit();
            }
        }

        // Cursor
        Message::MoveCursor(direction, extend) => {
            model.buffer.move_cursor(direction, extend);
            model.follow_cursor();
        }
        Message::MoveHome(extend) => {
            model.buffer.move_home(extend);
            model.follow_cursor();
        }
        Message::MoveEnd(extend) => {
            model.buffer.move_end(extend);
            model.follow_cursor();
        }
        Message::MoveWordLeft(extend) => {
            model.buffer.move_word_left(extend);
            model.follow_cursor();
        }
        Message::MoveWordRight(extend) => {
            model.buffer.move_word_right(extend);
            model.follow_cursor();
        }
        Message::MoveToStart(extend) => {
            model.buffer.move_to_start(extend);
            model.follow_cursor();
        }
        Message::MoveToEnd(extend) => {
            model.buffer.move_to_end(extend);
            model.follow_cursor();
        }
        Message::PageUp(extend) => {
            let page = page_lines(&model.source_viewport);
            model.buffer.move_lines(-page, extend);
            model.follow_cursor();
        }
        Message::PageDown(extend) => {
            let page = page_lines(&model.source_viewport);
            model.buffer.move_lines(page, extend);
            model.follow_cursor();
        }
        Message::ClickSource(line, col) => {
            model.buffer.move_to(line, col);
            model.follow_cursor();
        }
        Message::DragSource(line, col) => {
            model.buffer.extend_to(line, col);
            model.follow_cursor();
        }
        Message::SelectAll => {
            let len = model.buffer.len_chars();
            model.buffer.select(0..len);
            model.follow_cursor();
        }

        // Formatting
        Message::Format(wrap) => {
            let selection = model.buffer.selection().unwrap_or_else(|| {
                let at = model.buffer.cursor_char_idx();
                at..at
            });
            let selected = model.session.wrap_selection(selection, wrap);
            model.buffer.set_text(model.session.text());
            model.buffer.select(selected);
            model.buffer.mark_clean();
            model.after_text_change();
        }

        // Panes
        Message::ScrollSource(delta) => {
            if scroll_by(&mut model.source_viewport, delta) {
                model.sync_from(Pane::Source);
            }
        }
        Message::ScrollPreview(delta) => {
            if scroll_by(&mut model.preview_viewport, delta) {
                model.sync_from(Pane::Preview);
            }
        }

        // Document
        Message::RequestClear => {
            model.confirm_clear = true;
        }
        Message::ConfirmClear => {
            model.confirm_clear = false;
            model.session.clear();
            model.buffer = EditorBuffer::empty();
            model.source_col_offset = 0;
            model.after_text_change();
        }
        Message::CancelClear => {
            model.confirm_clear = false;
        }
        Message::DismissAlert => {
            model.alert = None;
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        // Window
        Message::Resize(width, height) => {
            model.resize(width, height);
        }

        // Application
        Message::Quit => {
            model.should_quit = true;
        }

        // CopyRichText: handled in effects (clipboard)
        // Redraw: no state change needed
        Message::CopyRichText | Message::Redraw => {}
    }
    model
}

fn page_lines(viewport: &Viewport) -> isize {
    isize::try_from(viewport.height()).unwrap_or(isize::MAX).max(1)
}

/// Returns whether the offset moved.
fn scroll_by(viewport: &mut Viewport, delta: isize) -> bool {
    let before = viewport.offset();
    if delta < 0 {
        viewport.scroll_up(delta.unsigned_abs());
    } else {
        viewport.scroll_down(delta.unsigned_abs());
    }
    viewport.offset() != before
}
