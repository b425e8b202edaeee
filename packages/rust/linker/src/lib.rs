//! Keyword indexing and link insertion.
//!
//! The flow for one article is:
//! 1. [`extract_keywords`]: tokenize and filter the article text
//! 2. [`find_matching_urls`]: look the keywords up in a [`KeywordIndex`]
//! 3. [`process_article`]: wrap the first occurrence of each match in an anchor
//!
//! Every step iterates in a fixed order (keywords by first appearance, URLs
//! sorted), so the same inputs always produce the same output.

mod fold;
mod index;
mod matcher;
mod rewrite;
mod tokenizer;

use std::collections::HashSet;

use interlinker_shared::{LinkingConfig, RunConfig};

pub use fold::fold_case;
pub use index::KeywordIndex;
pub use matcher::find_matching_urls;
pub use rewrite::{ProcessedArticle, anchor_html, process_article};
pub use tokenizer::extract_keywords;

/// Keyword filtering and match limits for one run.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Maximum `(keyword, url)` matches per article.
    pub max_links: usize,
    /// Keywords must be strictly longer than this many characters.
    pub min_keyword_len: usize,
    /// Lowercase words never used as keywords.
    pub stop_words: HashSet<String>,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self::from(&LinkingConfig::default())
    }
}

impl From<&LinkingConfig> for LinkOptions {
    fn from(config: &LinkingConfig) -> Self {
        Self {
            max_links: config.max_links,
            min_keyword_len: config.min_keyword_len,
            stop_words: config.stop_words.iter().map(|w| fold_case(w)).collect(),
        }
    }
}

impl From<&RunConfig> for LinkOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            max_links: config.max_links,
            min_keyword_len: config.min_keyword_len,
            stop_words: config.stop_words.iter().map(|w| fold_case(w)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interlinker_shared::AppConfig;

    #[test]
    fn default_options_match_default_config() {
        let opts = LinkOptions::default();
        assert_eq!(opts.max_links, 3);
        assert_eq!(opts.min_keyword_len, 3);
        assert!(opts.stop_words.contains("için"));
        assert!(opts.stop_words.contains("veya"));
    }

    #[test]
    fn options_from_run_config() {
        let mut app = AppConfig::default();
        app.linking.max_links = 7;
        app.linking.stop_words = vec!["Rust".into()];
        let run = RunConfig::new(&app, "sitemap.txt", "articles");

        let opts = LinkOptions::from(&run);
        assert_eq!(opts.max_links, 7);
        assert!(opts.stop_words.contains("rust"));
        assert_eq!(opts.stop_words.len(), 1);
    }

    #[test]
    fn stop_words_use_turkish_folding() {
        let config = LinkingConfig {
            stop_words: vec!["İÇİN".into(), "Işık".into()],
            ..LinkingConfig::default()
        };
        let opts = LinkOptions::from(&config);
        assert!(opts.stop_words.contains("için"));
        assert!(opts.stop_words.contains("ışık"));
    }
}
