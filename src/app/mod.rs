//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::{COPIED_MESSAGE, COPY_FAILED_MESSAGE};
pub use model::{Model, ToastLevel};
pub use update::{Message, TAB_SPACES, update};

use std::path::PathBuf;

use crate::clipboard::SystemClipboard;
use crate::export::ExportOptions;
use crate::render::RenderOptions;
use crate::ui::style::Theme;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    store_path: PathBuf,
    theme: Theme,
    render_options: RenderOptions,
    export_options: ExportOptions,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
    /// Opened on first copy and kept so X11 keeps serving the contents.
    clipboard: Option<SystemClipboard>,
}

impl App {
    /// Create a new application persisting to `store_path`.
    pub fn new(store_path: PathBuf) -> Self {
        Self {
            store_path,
            theme: Theme::default(),
            render_options: RenderOptions::default(),
            export_options: ExportOptions::default(),
            config_global_path: None,
            config_local_path: None,
            clipboard: None,
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub const fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Set the accent color and task detection used for rich-text export.
    #[must_use]
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.export_options = options;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
