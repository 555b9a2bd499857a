use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, ToastLevel};
use crate::session::clock_label;

const KEY_HINTS: &str = "Ctrl+B 粗体  Ctrl+I 斜体  Ctrl+R 复制  Ctrl+L 清空  F1 帮助  Ctrl+Q 退出 ";

/// Word count and save time on the left, key hints on the right when they fit.
pub fn status_text(model: &Model, width: u16) -> String {
    let words = model.session.word_count().total();
    let saved = model
        .session
        .last_saved()
        .map_or_else(|| "--:--:--".to_string(), clock_label);
    let cursor = model.buffer.cursor();
    let left = format!(
        " 字数: {words}  上次保存: {saved}  行 {}, 列 {}",
        cursor.line + 1,
        cursor.col + 1
    );

    let used = left.width() + KEY_HINTS.width();
    let width = usize::from(width);
    if used + 2 <= width {
        format!("{left}{}{KEY_HINTS}", " ".repeat(width - used))
    } else {
        left
    }
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    if model.active_toast().is_some() {
        render_toast_bar(model, frame, area);
        return;
    }
    let status_bar = Paragraph::new(status_text(model, area.width)).style(
        Style::default()
            .bg(model.theme.status_bg)
            .fg(model.theme.status_fg),
    );
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(model.theme.accent).fg(Color::Black),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!(" {prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
