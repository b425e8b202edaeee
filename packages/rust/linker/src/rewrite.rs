//! Anchor insertion into article text.

use std::collections::HashSet;
use std::ops::Range;

use interlinker_shared::{InsertedLink, InterlinkError, LinkMatch, Result};
use regex::Regex;
use tracing::{debug, trace};

use crate::fold::FoldedText;
use crate::{KeywordIndex, LinkOptions, find_matching_urls};

/// An article after link insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedArticle {
    /// Rewritten text. Identical to the input when nothing was linked.
    pub content: String,
    /// Links written, in match order.
    pub links: Vec<InsertedLink>,
    /// Matches not placed: the keyword was already linked to an earlier
    /// URL, or every occurrence sits inside an inserted anchor.
    pub skipped: Vec<LinkMatch>,
}

/// Anchor markup for `keyword` pointing at `url`.
///
/// The URL is made safe for a double-quoted attribute: `&` becomes `&amp;`,
/// `<` and `>` become entities, and `"` is percent-encoded.
pub fn anchor_html(url: &str, keyword: &str) -> String {
    let mut href = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '&' => href.push_str("&amp;"),
            '<' => href.push_str("&lt;"),
            '>' => href.push_str("&gt;"),
            '"' => href.push_str("%22"),
            _ => href.push(c),
        }
    }
    format!(r#"<a href="{href}">{keyword}</a>"#)
}

/// Insert links into `text` for the matches found in `index`.
///
/// For each `(keyword, url)` match the first whole-word occurrence of the
/// keyword, compared after Turkish-aware case folding, is replaced with an
/// anchor whose text is the folded keyword. A keyword is linked at most once; the first URL wins.
/// Anchors inserted earlier in the pass are never matched again.
pub fn process_article(text: &str, index: &KeywordIndex, opts: &LinkOptions) -> Result<ProcessedArticle> {
    let matches = find_matching_urls(text, index, opts);

    let mut content = text.to_string();
    let mut anchors: Vec<Range<usize>> = Vec::new();
    let mut links: Vec<InsertedLink> = Vec::new();
    let mut skipped = Vec::new();
    let mut linked: HashSet<String> = HashSet::new();

    for m in matches {
        if linked.contains(&m.keyword) {
            trace!(keyword = %m.keyword, url = %m.url, "keyword already linked");
            skipped.push(m);
            continue;
        }

        let re = keyword_regex(&m.keyword)?;
        let folded = FoldedText::new(&content);
        let found = re
            .find_iter(folded.as_str())
            .map(|hit| folded.source_range(hit.range()))
            .find(|hit| !hit.is_empty() && !anchors.iter().any(|a| overlaps(a, hit)));

        let Some(hit) = found else {
            debug!(keyword = %m.keyword, "no unlinked occurrence left");
            skipped.push(m);
            continue;
        };

        let anchor = anchor_html(&m.url, &m.keyword);
        let grown = anchor.len() as isize - hit.len() as isize;
        content.replace_range(hit.clone(), &anchor);

        for (range, link) in anchors.iter_mut().zip(links.iter_mut()) {
            if range.start > hit.start {
                range.start = shift(range.start, grown);
                range.end = shift(range.end, grown);
                link.offset = range.start;
            }
        }

        debug!(keyword = %m.keyword, url = %m.url, offset = hit.start, "link inserted");
        anchors.push(hit.start..hit.start + anchor.len());
        links.push(InsertedLink {
            keyword: m.keyword.clone(),
            url: m.url,
            offset: hit.start,
        });
        linked.insert(m.keyword);
    }

    Ok(ProcessedArticle {
        content,
        links,
        skipped,
    })
}

/// Whole-word matcher for an already case-folded keyword.
fn keyword_regex(keyword: &str) -> Result<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(keyword)))
        .map_err(|e| InterlinkError::parse(format!("keyword pattern for {keyword:?}: {e}")))
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn shift(pos: usize, delta: isize) -> usize {
    pos.saturating_add_signed(delta)
}
