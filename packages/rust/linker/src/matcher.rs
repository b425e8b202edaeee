use interlinker_shared::LinkMatch;

use crate::{KeywordIndex, LinkOptions, extract_keywords};

/// Pair article keywords with indexed URLs.
///
/// Keywords are visited in order of first appearance in `text`; each
/// indexed keyword contributes one pair per URL (sorted) until
/// `opts.max_links` pairs have been collected.
pub fn find_matching_urls(text: &str, index: &KeywordIndex, opts: &LinkOptions) -> Vec<LinkMatch> {
    let mut matches = Vec::new();
    if opts.max_links == 0 {
        return matches;
    }

    for keyword in extract_keywords(text, opts) {
        let Some(urls) = index.get(&keyword) else {
            continue;
        };
        for url in urls {
            matches.push(LinkMatch::new(keyword.as_str(), url.as_str()));
            if matches.len() >= opts.max_links {
                return matches;
            }
        }
    }

    matches
}
