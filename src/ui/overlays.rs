use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::Model;

pub const CLEAR_PROMPT: &str = "确定要清空所有内容吗？此操作不可撤销。";

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White))
}

fn render_message_popup(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'_>>) {
    let popup_width = area.width.saturating_sub(8).clamp(20, 56);
    // Border and padding take four rows.
    #[allow(clippy::cast_possible_truncation)]
    let popup_height = lines.len() as u16 + 4;
    let popup = centered_popup_rect(popup_width, popup_height, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(popup_block(title)),
        popup,
    );
}

pub fn render_alert_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(message) = model.alert.as_deref() else {
        return;
    };
    let dim_style = Style::default().fg(Color::Indexed(245));
    let lines = vec![
        Line::raw(message),
        Line::raw(""),
        Line::styled("按任意键继续", dim_style),
    ];
    render_message_popup(frame, area, " 提示 ", lines);
}

pub fn render_confirm_clear_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let key_style = Style::default()
        .fg(model.theme.accent)
        .add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::raw(CLEAR_PROMPT),
        Line::raw(""),
        Line::from(vec![
            Span::styled("y", key_style),
            Span::raw(" 确定    "),
            Span::styled("n", key_style),
            Span::raw(" 取消"),
        ]),
    ];
    render_message_popup(frame, area, " 清空 ", lines);
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let display = |path: Option<&std::path::Path>, missing: &str| {
        path.map_or_else(|| missing.to_string(), |p| p.display().to_string())
    };
    let store = display(model.store_path.as_deref(), "<memory>");
    let global_cfg = display(model.config_global_path.as_deref(), "<unknown>");
    let local_cfg = display(model.config_local_path.as_deref(), "<none>");

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("格式", section_style));
    lines.push(Line::raw("  Ctrl+B              粗体 **…**"));
    lines.push(Line::raw("  Ctrl+I / Alt+I      斜体 *…*"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("编辑", section_style));
    lines.push(Line::raw("  Arrows, Home/End    移动光标"));
    lines.push(Line::raw("  Shift+移动          选择"));
    lines.push(Line::raw("  Ctrl+Left/Right     按词移动"));
    lines.push(Line::raw("  Ctrl+Home/End       文首 / 文末"));
    lines.push(Line::raw("  Ctrl+A              全选"));
    lines.push(Line::raw("  Mouse click / drag  定位 / 选择"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("预览", section_style));
    lines.push(Line::raw("  Mouse wheel         滚动所在窗格 (同步滚动)"));
    lines.push(Line::raw("  Alt+Up/Down         滚动预览"));
    lines.push(Line::raw("  Alt+PgUp/PgDn       预览翻页"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("其他", section_style));
    lines.push(Line::raw("  Ctrl+R              复制富文本"));
    lines.push(Line::raw("  Ctrl+L              清空内容"));
    lines.push(Line::raw("  Ctrl+Q / Ctrl+C     保存并退出"));
    lines.push(Line::raw("  F1                  帮助"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("文件", section_style));
    lines.push(Line::raw(format!("  Store: {store}")));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(popup_block(" 帮助 ")),
        popup,
    );
}

pub fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
