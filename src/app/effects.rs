use tracing::{info, warn};

use crate::app::{App, Message, Model, ToastLevel};
use crate::clipboard::{Clipboard, SystemClipboard};

pub const COPIED_MESSAGE: &str = "已复制!";
pub const COPY_FAILED_MESSAGE: &str = "复制失败，请手动选择并复制内容";

impl App {
    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        match msg {
            Message::CopyRichText => {
                let clipboard = self.clipboard.get_or_insert_with(SystemClipboard::new);
                copy_rich_text(model, clipboard);
            }
            Message::Quit => {
                if let Err(err) = model.session.flush() {
                    warn!(error = %err, "final save failed");
                } else {
                    info!("document saved on exit");
                }
            }
            _ => {}
        }
    }
}

/// Copy the preview to `clipboard`, reporting the outcome on the model.
pub(super) fn copy_rich_text(model: &mut Model, clipboard: &mut dyn Clipboard) {
    match model.session.copy_rich_text(clipboard) {
        Ok(()) => model.show_toast(ToastLevel::Info, COPIED_MESSAGE),
        Err(err) => {
            warn!(error = %err, "rich-text copy failed");
            model.alert = Some(COPY_FAILED_MESSAGE.to_string());
        }
    }
}
