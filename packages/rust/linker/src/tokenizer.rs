//! Article keyword extraction.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::{LinkOptions, fold_case};

/// Word-like runs (Unicode letters, digits, underscore).
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word regex"));

/// Extract candidate keywords from article text.
///
/// Folds case with the Turkish `I` rules, splits on word boundaries, drops
/// stop words and words of `min_keyword_len` characters or fewer, and
/// deduplicates. Keywords come back in order of first appearance.
pub fn extract_keywords(text: &str, opts: &LinkOptions) -> Vec<String> {
    let lowered = fold_case(text);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keywords = Vec::new();

    for word in WORD_RE.find_iter(&lowered).map(|m| m.as_str()) {
        if word.chars().count() <= opts.min_keyword_len || opts.stop_words.contains(word) {
            continue;
        }
        if seen.insert(word) {
            keywords.push(word.to_string());
        }
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_keeps_first_appearance_order() {
        let kws = extract_keywords("Rust makes Async code SAFE. rust async!", &LinkOptions::default());
        assert_eq!(kws, vec!["rust", "makes", "async", "code", "safe"]);
    }

    #[test]
    fn drops_short_words_by_char_count() {
        // "çiçek" is 5 chars but 7 bytes; "ağ" is 2 chars.
        let kws = extract_keywords("ağ çiçek the blog", &LinkOptions::default());
        assert_eq!(kws, vec!["çiçek", "blog"]);
    }

    #[test]
    fn drops_stop_words() {
        let mut opts = LinkOptions::default();
        opts.stop_words.insert("great".into());
        opts.min_keyword_len = 1;
        let kws = extract_keywords("bu great post için", &opts);
        assert_eq!(kws, vec!["post"]);
    }

    #[test]
    fn underscores_and_digits_are_word_chars() {
        let kws = extract_keywords("snake_case v2024 x-ray", &LinkOptions::default());
        assert_eq!(kws, vec!["snake_case", "v2024"]);
    }

    #[test]
    fn turkish_capitals_fold_to_slug_letters() {
        let kws = extract_keywords("İstanbul gezisi için IŞIK rehberi", &LinkOptions::default());
        assert_eq!(kws, vec!["istanbul", "gezisi", "ışık", "rehberi"]);
    }

    #[test]
    fn empty_text_has_no_keywords() {
        assert!(extract_keywords("", &LinkOptions::default()).is_empty());
        assert!(extract_keywords("  ... !!! ", &LinkOptions::default()).is_empty());
    }
}
