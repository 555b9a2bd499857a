use markpad::export::{DEFAULT_ACCENT, ExportOptions, export, export_html};
use markpad::render::{RenderOptions, render};
use proptest::prelude::*;

fn task_list(items: &[(bool, String)]) -> String {
    items
        .iter()
        .map(|(checked, text)| format!("- [{}] {text}", if *checked { 'x' } else { ' ' }))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_sample_document_exports_without_task_tokens() {
    let md = include_str!("fixtures/sample.md");
    let html = export_html(&render(md, &RenderOptions::default()), &ExportOptions::default());
    assert!(!html.contains("[ ]"));
    assert!(!html.contains("[x]"));
    assert!(!html.contains("<input"));
    assert!(html.contains("☑"));
    assert!(html.contains("☐"));
}

#[test]
fn test_sample_document_counts_first_level_headings() {
    let md = include_str!("fixtures/sample.md");
    let out = export(&render(md, &RenderOptions::default()), &ExportOptions::default());
    let labels: Vec<String> = out
        .select(&["h1"])
        .iter()
        .map(|h| h.select(&["span"])[0].text_content())
        .collect();
    assert_eq!(labels, vec!["01", "02", "03"]);
}

#[test]
fn test_custom_accent_reaches_links_and_counters() {
    let options = ExportOptions {
        accent: "#ff6600".to_string(),
        ..ExportOptions::default()
    };
    let out = export(
        &render("# T\n\n[link](https://example.com)", &RenderOptions::default()),
        &options,
    );
    assert_eq!(out.select(&["a"])[0].style().get("color"), Some("#ff6600"));
    let counter = out.select(&["h1"])[0].select(&["span"])[0];
    assert_eq!(counter.style().get("color"), Some("#ff6600"));
}

proptest! {
    #[test]
    fn test_task_items_become_glyphs(
        items in prop::collection::vec((any::<bool>(), "[a-z]{1,8}"), 1..8),
    ) {
        let md = task_list(&items);
        let out = export(&render(&md, &RenderOptions::default()), &ExportOptions::default());
        let html = out.to_html();
        prop_assert!(!html.contains("[ ]"));
        prop_assert!(!html.contains("[x]"));

        let rendered_items = out.select(&["li"]);
        prop_assert_eq!(rendered_items.len(), items.len());
        for (item, (checked, _)) in rendered_items.iter().zip(items.iter()) {
            let glyph = item.select(&["span"])[0];
            let color = glyph.style().get("color");
            if *checked {
                prop_assert_eq!(glyph.text_content(), "☑");
                prop_assert_eq!(color, Some(DEFAULT_ACCENT));
            } else {
                prop_assert_eq!(glyph.text_content(), "☐");
                prop_assert_ne!(color, Some(DEFAULT_ACCENT));
            }
        }
    }

    #[test]
    fn test_first_level_headings_numbered_without_gaps(
        subheadings in prop::collection::vec(0..3usize, 0..12),
    ) {
        let mut md = String::new();
        for (idx, extra) in subheadings.iter().enumerate() {
            md.push_str(&format!("# H{idx}\n\n"));
            for level in 0..*extra {
                md.push_str(&format!("{} sub\n\n", "#".repeat(level + 2)));
            }
        }
        let out = export(&render(&md, &RenderOptions::default()), &ExportOptions::default());
        let labels: Vec<String> = out
            .select(&["h1"])
            .iter()
            .map(|h| h.select(&["span"])[0].text_content())
            .collect();
        let expected: Vec<String> = (1..=subheadings.len()).map(|n| format!("{n:02}")).collect();
        prop_assert_eq!(labels, expected);
    }

    #[test]
    fn test_export_is_deterministic(
        words in prop::collection::vec("[a-z]{1,6}", 1..10),
        checked in any::<bool>(),
    ) {
        let body = words.join(" ");
        let md = format!(
            "# {body}\n\n> **{body}**\n\n- [{}] {body}\n\n| a | b |\n|---|---|\n| {body} | `x` |",
            if checked { 'x' } else { ' ' }
        );
        let rendered = render(&md, &RenderOptions::default());
        let options = ExportOptions::default();
        prop_assert_eq!(export_html(&rendered, &options), export_html(&rendered, &options));
    }
}
