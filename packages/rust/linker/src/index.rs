//! Keyword → URL index built from sitemap URL paths.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::fold_case;

/// Path segments that never produce keywords.
const SKIPPED_SEGMENTS: &[&str] = &["http:", "https:", "www"];

/// Separators inside a path segment.
static SEGMENT_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]").expect("segment split regex"));

/// Page extensions stripped from a trailing segment (`post.html` → `post`).
static PAGE_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(?:html?|php|aspx?)$").expect("page extension regex"));

/// Read-only mapping from lowercase token to the sorted set of URLs whose
/// path contains that token.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct KeywordIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl KeywordIndex {
    /// Build the index from a set of sitemap URLs.
    #[instrument(skip_all, fields(urls = urls.len()))]
    pub fn build(urls: &BTreeSet<String>) -> Self {
        let mut entries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for url in urls {
            let tokens = url_tokens(url);
            debug!(%url, tokens = tokens.len(), "indexed url");
            for token in tokens {
                entries.entry(token).or_default().insert(url.clone());
            }
        }

        info!(keywords = entries.len(), "keyword index built");
        Self { entries }
    }

    /// URLs registered for `token`, in sorted order.
    pub fn get(&self, token: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(keyword, urls)` in keyword order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Tokens contributed by one URL, case-folded and deduplicated.
pub(crate) fn url_tokens(url: &str) -> BTreeSet<String> {
    let segments: Vec<&str> = url_path(url)
        .split('/')
        .filter(|s| !s.is_empty() && !SKIPPED_SEGMENTS.contains(s))
        .collect();

    let last = segments.len().saturating_sub(1);
    segments
        .iter()
        .enumerate()
        .flat_map(|(i, segment)| {
            let segment = if i == last {
                PAGE_EXT_RE.replace(segment, "").into_owned()
            } else {
                (*segment).to_string()
            };
            SEGMENT_SPLIT_RE
                .split(&segment)
                .filter(|t| !t.is_empty())
                .map(fold_case)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// The path part of an absolute URL (host, query and fragment removed).
/// Anything without a `scheme://` prefix is returned whole, minus query
/// and fragment.
fn url_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let url = &url[..end];

    match url.split_once("://") {
        Some((_scheme, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => url,
    }
}
