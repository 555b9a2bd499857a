//! The editing session: one document and everything derived from it.
//!
//! Every text mutation goes through [`EditorSession::set_text`], which
//! re-renders the preview tree, saves to the store and recounts words in one
//! step, so the derived state never lags the text.

use std::ops::Range;
use std::time::{Instant, SystemTime};

use tracing::{debug, warn};

use crate::clipboard::Clipboard;
use crate::export::{self, ExportError, ExportOptions};
use crate::html::Element;
use crate::render::{self, RenderOptions};
use crate::scroll::{Pane, ScrollMetrics, ScrollSync, SyncCommand};
use crate::store::{DOCUMENT_KEY, MemoryStore, Store, StoreError};
use crate::words::{WordCount, count_words};

/// Document shown when the store holds nothing.
pub const SAMPLE_DOCUMENT: &str = r#"# Markdown 编辑器示例

## 基本语法

### 文本格式化

**粗体文本** 和 *斜体文本*，还有 ~~删除线~~。

### 列表

#### 无序列表
- 项目 1
- 项目 2
- 项目 3

#### 有序列表
1. 第一项
2. 第二项
3. 第三项

### 链接和图片

[GitHub](https://github.com) 是一个代码托管平台。

图片示例：
![示例图片](https://via.placeholder.com/150)

### 代码

行内代码：`const hello = "Hello, World!"`

代码块：
```javascript
function greet(name) {
    return `Hello, ${name}!`;
}

console.log(greet("World"));
```

### 引用

> 这是一段引用文本。
> 可以有多行。

### 表格

| 表头1 | 表头2 | 表头3 |
| ----- | ----- | ----- |
| 单元格1 | 单元格2 | 单元格3 |
| 单元格4 | 单元格5 | 单元格6 |

### 任务列表

- [x] 已完成任务
- [ ] 未完成任务 1
- [ ] 未完成任务 2
"#;

/// Inline emphasis inserted around a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    Bold,
    Italic,
}

impl Wrap {
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Bold => "**",
            Self::Italic => "*",
        }
    }
}

pub struct EditorSession {
    text: String,
    rendered: Element,
    words: WordCount,
    store: Box<dyn Store>,
    last_saved: Option<SystemTime>,
    scroll: ScrollSync,
    render_options: RenderOptions,
    export_options: ExportOptions,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::open(
            Box::new(MemoryStore::default()),
            RenderOptions::default(),
            ExportOptions::default(),
        )
    }
}

impl EditorSession {
    /// Load the saved document, or the sample document when nothing (or an
    /// empty document) was saved.
    pub fn open(
        store: Box<dyn Store>,
        render_options: RenderOptions,
        export_options: ExportOptions,
    ) -> Self {
        let saved = match store.get(DOCUMENT_KEY) {
            Ok(saved) => saved,
            Err(err) => {
                warn!(error = %err, "could not load saved document");
                None
            }
        };
        let text = saved
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| SAMPLE_DOCUMENT.to_string());
        debug!(bytes = text.len(), "opened session");
        Self {
            rendered: render::render(&text, &render_options),
            words: count_words(&text),
            text,
            store,
            last_saved: None,
            scroll: ScrollSync::new(),
            render_options,
            export_options,
        }
    }

    /// An empty in-memory session that skips loading and the sample.
    pub fn blank() -> Self {
        Self {
            text: String::new(),
            rendered: Element::new("div").with_attr("class", render::ROOT_CLASS),
            words: WordCount::default(),
            store: Box::new(MemoryStore::default()),
            last_saved: None,
            scroll: ScrollSync::new(),
            render_options: RenderOptions::default(),
            export_options: ExportOptions::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the document: re-render, save and recount.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.rendered = render::render(&self.text, &self.render_options);
        self.words = count_words(&self.text);
        if let Err(err) = self.save() {
            warn!(error = %err, "autosave failed");
        }
    }

    /// Surround the characters in `selection` with the emphasis marker.
    ///
    /// `selection` is in characters and may be empty or reversed. Returns
    /// the range the original selection occupies after the markers were
    /// inserted.
    pub fn wrap_selection(&mut self, selection: Range<usize>, wrap: Wrap) -> Range<usize> {
        let char_len = self.text.chars().count();
        let start = selection.start.min(selection.end).min(char_len);
        let end = selection.start.max(selection.end).min(char_len);
        let start_byte = byte_offset(&self.text, start);
        let end_byte = byte_offset(&self.text, end);

        let marker = wrap.marker();
        let mut next = String::with_capacity(self.text.len() + marker.len() * 2);
        next.push_str(&self.text[..start_byte]);
        next.push_str(marker);
        next.push_str(&self.text[start_byte..end_byte]);
        next.push_str(marker);
        next.push_str(&self.text[end_byte..]);
        self.set_text(next);

        let shift = marker.chars().count();
        (start + shift)..(end + shift)
    }

    /// Empty the document. Confirmation is the caller's job.
    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    /// Save the current text, e.g. right before exit.
    ///
    /// # Errors
    ///
    /// Returns the store's error when the write fails.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.save()
    }

    fn save(&mut self) -> Result<(), StoreError> {
        self.store.set(DOCUMENT_KEY, &self.text)?;
        self.last_saved = Some(SystemTime::now());
        Ok(())
    }

    pub const fn rendered(&self) -> &Element {
        &self.rendered
    }

    pub fn html(&self) -> String {
        self.rendered.inner_html()
    }

    pub const fn word_count(&self) -> WordCount {
        self.words
    }

    pub const fn last_saved(&self) -> Option<SystemTime> {
        self.last_saved
    }

    /// Export the preview as inline-styled HTML.
    pub fn export_html(&self) -> String {
        export::export_html(&self.rendered, &self.export_options)
    }

    /// Copy the preview to `clipboard` as inline-styled rich text.
    ///
    /// # Errors
    ///
    /// See [`export::copy_rich_text`].
    pub fn copy_rich_text(&self, clipboard: &mut dyn Clipboard) -> Result<(), ExportError> {
        export::copy_rich_text(&self.rendered, &self.export_options, clipboard)
    }

    pub fn on_scroll(
        &mut self,
        pane: Pane,
        source: ScrollMetrics,
        target: ScrollMetrics,
    ) -> Option<SyncCommand> {
        self.scroll.on_scroll(pane, source, target)
    }

    pub fn settle_scroll(&mut self, generation: u64) -> bool {
        self.scroll.settle(generation)
    }

    pub fn settle_stale_scroll(&mut self, now: Instant) -> bool {
        self.scroll.settle_if_stale(now)
    }

    pub const fn is_scroll_syncing(&self) -> bool {
        self.scroll.is_syncing()
    }
}

fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

/// `HH:MM:SS` wall-clock time in UTC.
pub fn clock_label(time: SystemTime) -> String {
    let secs = time
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    let day_secs = secs % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        day_secs / 3600,
        (day_secs % 3600) / 60,
        day_secs % 60
    )
}
