use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::debug;

use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::scroll::Pane;
use crate::session::Wrap;

use super::event_loop::ResizeDebouncer;

/// Lines scrolled per mouse wheel notch.
pub const WHEEL_LINES: isize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) if !model.overlay_active() => Some(Message::Paste(text.clone())),
            Event::Resize(width, height) => {
                debug!(width, height, "resize queued");
                resize_debouncer.queue(*width, *height, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.alert.is_some() {
            return Some(Message::DismissAlert);
        }
        if model.confirm_clear {
            return match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Message::ConfirmClear),
                _ => Some(Message::CancelClear),
            };
        }
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if ctrl {
            return match key.code {
                KeyCode::Char('q' | 'c') => Some(Message::Quit),
                KeyCode::Char('b') => Some(Message::Format(Wrap::Bold)),
                KeyCode::Char('i') => Some(Message::Format(Wrap::Italic)),
                KeyCode::Char('r') => Some(Message::CopyRichText),
                KeyCode::Char('l') => Some(Message::RequestClear),
                KeyCode::Char('a') => Some(Message::SelectAll),
                KeyCode::Left => Some(Message::MoveWordLeft(shift)),
                KeyCode::Right => Some(Message::MoveWordRight(shift)),
                KeyCode::Home => Some(Message::MoveToStart(shift)),
                KeyCode::End => Some(Message::MoveToEnd(shift)),
                _ => None,
            };
        }

        if alt {
            let page = isize::try_from(model.preview_viewport.height()).unwrap_or(1);
            return match key.code {
                KeyCode::Char('i') => Some(Message::Format(Wrap::Italic)),
                KeyCode::Char('b') => Some(Message::Format(Wrap::Bold)),
                KeyCode::Up => Some(Message::ScrollPreview(-1)),
                KeyCode::Down => Some(Message::ScrollPreview(1)),
                KeyCode::PageUp => Some(Message::ScrollPreview(-page)),
                KeyCode::PageDown => Some(Message::ScrollPreview(page)),
                _ => None,
            };
        }

        match key.code {
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char(ch) => Some(Message::InsertChar(ch)),
            KeyCode::Enter => Some(Message::InsertNewline),
            KeyCode::Tab => Some(Message::InsertTab),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up, shift)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down, shift)),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left, shift)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right, shift)),
            KeyCode::Home => Some(Message::MoveHome(shift)),
            KeyCode::End => Some(Message::MoveEnd(shift)),
            KeyCode::PageUp => Some(Message::PageUp(shift)),
            KeyCode::PageDown => Some(Message::PageDown(shift)),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.overlay_active() {
            return None;
        }

        let pane = model.layout().pane_at(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::ScrollUp => match pane? {
                Pane::Source => Some(Message::ScrollSource(-WHEEL_LINES)),
                Pane::Preview => Some(Message::ScrollPreview(-WHEEL_LINES)),
            },
            MouseEventKind::ScrollDown => match pane? {
                Pane::Source => Some(Message::ScrollSource(WHEEL_LINES)),
                Pane::Preview => Some(Message::ScrollPreview(WHEEL_LINES)),
            },
            MouseEventKind::Down(MouseButton::Left) => {
                let (line, col) = model.source_position_at(mouse.column, mouse.row)?;
                Some(Message::ClickSource(line, col))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (line, col) = model.source_position_at(mouse.column, mouse.row)?;
                Some(Message::DragSource(line, col))
            }
            _ => None,
        }
    }
}
