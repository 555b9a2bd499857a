use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use super::*;
use crate::app::{Message, Model, update};
use crate::export::ExportOptions;
use crate::render::RenderOptions;
use crate::scroll::Pane;
use crate::session::EditorSession;
use crate::store::{DOCUMENT_KEY, MemoryStore, Store};
use crate::ui::style::Theme;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 40);
    Terminal::new(backend).unwrap()
}

fn create_test_model(text: &str) -> Model {
    let mut store = MemoryStore::default();
    store.set(DOCUMENT_KEY, text).unwrap();
    let session = EditorSession::open(
        Box::new(store),
        RenderOptions::default(),
        ExportOptions::default(),
    );
    Model::new(session, Theme::default(), (80, 40))
}

fn draw(model: &Model) -> String {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}

/// Wide characters leave blank continuation cells; drop all whitespace
/// before matching CJK text.
fn compact(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}

fn row_text(model: &Model, row: u16) -> String {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, row)].symbol().to_string())
        .collect()
}

#[test]
fn test_layout_splits_panes_evenly_above_status() {
    let layout = PaneLayout::new(Rect::new(0, 0, 80, 40));
    assert_eq!(layout.source, Rect::new(0, 0, 40, 39));
    assert_eq!(layout.preview, Rect::new(40, 0, 40, 39));
    assert_eq!(layout.status, Rect::new(0, 39, 80, 1));
    assert_eq!(layout.source_inner(), Rect::new(1, 1, 38, 37));
    assert_eq!(layout.pane_at(45, 3), Some(Pane::Preview));
    assert_eq!(layout.pane_at(3, 39), None);
}

#[test]
fn test_render_shows_source_and_preview() {
    let model = create_test_model("# Title\n\n**bold** text");
    let content = draw(&model);
    assert!(compact(&content).contains("编辑"));
    assert!(compact(&content).contains("预览"));
    assert!(content.contains("# Title"), "source keeps markup");
    let row: String = row_text(&model, 3);
    assert!(row.starts_with("│3 **bold** text"), "{row}");
    let preview_half: String = row.chars().skip(41).collect();
    assert!(preview_half.starts_with("bold text"), "{preview_half}");
}

#[test]
fn test_source_has_line_numbers() {
    let model = create_test_model("first\nsecond");
    let row = row_text(&model, 2);
    assert!(row.starts_with("│2 second"), "{row}");
}

#[test]
fn test_status_bar_shows_word_count_and_save_time() {
    let model = create_test_model("你好 world");
    let status = compact(&row_text(&model, 39));
    assert!(status.contains("字数:3"), "{status}");
    assert!(status.contains("上次保存:--:--:--"), "{status}");

    let model = update(model, Message::InsertChar('x'));
    let status = row_text(&model, 39);
    assert!(!status.contains("--:--:--"), "{status}");
}

#[test]
fn test_status_text_drops_hints_when_narrow() {
    let model = create_test_model("a");
    assert!(status_text(&model, 200).contains("Ctrl+Q"));
    assert!(!status_text(&model, 30).contains("Ctrl+Q"));
}

#[test]
fn test_confirm_clear_overlay_shows_prompt() {
    let model = update(create_test_model("a"), Message::RequestClear);
    let content = compact(&draw(&model));
    assert!(content.contains("确定要清空所有内容吗"));
}

#[test]
fn test_alert_overlay_shows_message() {
    let mut model = create_test_model("a");
    model.alert = Some("复制失败".to_string());
    let content = compact(&draw(&model));
    assert!(content.contains("复制失败"));
    assert!(content.contains("按任意键继续"));
}

#[test]
fn test_help_overlay_lists_keys() {
    let model = update(create_test_model("a"), Message::ToggleHelp);
    let content = compact(&draw(&model));
    assert!(content.contains("Ctrl+B"));
    assert!(content.contains("复制富文本"));
}

#[test]
fn test_preview_follows_viewport_offset() {
    let text = (1..=100)
        .map(|i| format!("row {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let model = update(create_test_model(&text), Message::ScrollPreview(50));
    let row = row_text(&model, 1);
    assert!(row.contains("row 51"), "{row}");
}

#[test]
fn test_long_source_line_is_clipped_not_wrapped() {
    let model = create_test_model(&format!("{}END", "a".repeat(60)));
    let source_half: String = row_text(&model, 1).chars().take(40).collect();
    assert!(source_half.starts_with("│1 aaaa"), "{source_half}");
    assert!(!source_half.contains("END"), "{source_half}");
    let next_row: String = row_text(&model, 2).chars().take(40).collect();
    assert!(!next_row.contains('a'), "{next_row}");
}

#[test]
fn test_centered_popup_rect_clamps_to_area() {
    let area = Rect::new(0, 0, 20, 10);
    assert_eq!(centered_popup_rect(10, 4, area), Rect::new(5, 3, 10, 4));
    assert_eq!(centered_popup_rect(50, 50, area), area);
}

#[test]
fn test_line_number_width_grows_with_digits() {
    assert_eq!(line_number_width(9), 1);
    assert_eq!(line_number_width(10), 2);
    assert_eq!(line_number_width(12_345), 5);
}
