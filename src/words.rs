//! Word counting for mixed CJK and space-delimited text.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[#*_`~\[\](){}]").unwrap_or_else(|err| panic!("invalid markup pattern: {err}"))
});
static NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n+").unwrap_or_else(|err| panic!("invalid newline pattern: {err}")));
static CJK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{4e00}-\x{9fa5}]").unwrap_or_else(|err| panic!("invalid CJK pattern: {err}"))
});

/// Result of [`count_words`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WordCount {
    /// Characters in the CJK unified ideographs block, each counted once.
    pub cjk_chars: usize,
    /// Whitespace-delimited tokens left after removing CJK characters.
    pub words: usize,
}

impl WordCount {
    pub const fn total(self) -> usize {
        self.cjk_chars + self.words
    }
}

/// Count words in raw Markdown.
///
/// Markup punctuation (`# * _ ` ~ [ ] ( ) { }`) is dropped first, so `**bold**`
/// counts as one word and a bare `#` as none.
pub fn count_words(text: &str) -> WordCount {
    let stripped = MARKUP.replace_all(text, "");
    let collapsed = NEWLINES.replace_all(&stripped, " ");
    let plain = collapsed.trim();

    let cjk_chars = CJK.find_iter(plain).count();
    let words = CJK.replace_all(plain, "").split_whitespace().count();
    WordCount { cjk_chars, words }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_count_words_latin() {
        assert_eq!(count_words("Hello world").total(), 2);
    }

    #[test]
    fn test_count_words_mixed_cjk() {
        let count = count_words("你好 world");
        assert_eq!(count.cjk_chars, 2);
        assert_eq!(count.words, 1);
        assert_eq!(count.total(), 3);
    }

    #[test]
    fn test_count_words_empty() {
        assert_eq!(count_words("").total(), 0);
        assert_eq!(count_words("  \n\n\t ").total(), 0);
    }

    #[test]
    fn test_count_words_ignores_markup() {
        assert_eq!(count_words("# Title\n\n**bold** and *it*").total(), 4);
        assert_eq!(count_words("[link](url)").total(), 1);
        assert_eq!(count_words("# ## ###").total(), 0);
    }

    #[test]
    fn test_count_words_cjk_without_spaces() {
        assert_eq!(count_words("上次保存").total(), 4);
        assert_eq!(count_words("中文abc中文").total(), 5);
    }

    proptest! {
        #[test]
        fn test_count_never_exceeds_char_count(text in "\\PC{0,64}") {
            let count = count_words(&text);
            prop_assert!(count.total() <= text.chars().count());
        }

        #[test]
        fn test_ascii_words_match_whitespace_split(words in prop::collection::vec("[a-z]{1,8}", 0..12)) {
            let text = words.join(" ");
            prop_assert_eq!(count_words(&text).total(), words.len());
        }
    }
}
