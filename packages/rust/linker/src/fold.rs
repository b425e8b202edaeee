//! Turkish-aware case folding.
//!
//! `str::to_lowercase` turns `İ` into `i̇` (`i` + combining dot), which never
//! equals the `i` of a URL slug. Articles and URL tokens are folded with the
//! Turkish rules instead: `İ` → `i`, `I` → `ı`, everything else through the
//! regular Unicode lowercase mapping.

use std::ops::Range;

/// Fold `text` to lowercase using Turkish dotted/dotless `I` rules.
pub fn fold_case(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        push_folded(&mut folded, c);
    }
    folded
}

fn push_folded(out: &mut String, c: char) {
    match c {
        'İ' => out.push('i'),
        'I' => out.push('ı'),
        _ => out.extend(c.to_lowercase()),
    }
}

/// Folded copy of a text that remembers where each folded byte came from.
///
/// Folding can change byte lengths (`İ` is two bytes, `i` one), so matches
/// found in the folded copy are mapped back with [`FoldedText::source_range`].
pub(crate) struct FoldedText {
    folded: String,
    /// For every folded byte: the source range of the char that produced it.
    origin: Vec<Range<usize>>,
}

impl FoldedText {
    pub(crate) fn new(source: &str) -> Self {
        let mut folded = String::with_capacity(source.len());
        let mut origin = Vec::with_capacity(source.len());

        for (pos, c) in source.char_indices() {
            let before = folded.len();
            push_folded(&mut folded, c);
            let span = pos..pos + c.len_utf8();
            origin.extend(std::iter::repeat_n(span, folded.len() - before));
        }

        Self { folded, origin }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.folded
    }

    /// Source byte range covering the folded range `range`.
    ///
    /// Partial coverage of a char whose fold expands to several chars widens
    /// to the whole source char.
    pub(crate) fn source_range(&self, range: Range<usize>) -> Range<usize> {
        if range.is_empty() {
            let at = self
                .origin
                .get(range.start)
                .map_or_else(|| self.origin.last().map_or(0, |r| r.end), |r| r.start);
            return at..at;
        }
        self.origin[range.start].start..self.origin[range.end - 1].end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turkish_capital_i_forms() {
        assert_eq!(fold_case("İstanbul"), "istanbul");
        assert_eq!(fold_case("IŞIK"), "ışık");
        assert_eq!(fold_case("ĞÜŞÖÇ"), "ğüşöç");
    }

    #[test]
    fn already_folded_text_is_unchanged() {
        for s in ["rust", "istanbul", "ışık", "çiçek"] {
            assert_eq!(fold_case(s), s);
        }
    }

    #[test]
    fn source_range_accounts_for_shorter_fold() {
        let source = "İstanbul gezisi";
        let folded = FoldedText::new(source);
        assert_eq!(folded.as_str(), "istanbul gezisi");

        let start = folded.as_str().find("gezisi").unwrap();
        let range = folded.source_range(start..start + "gezisi".len());
        assert_eq!(&source[range], "gezisi");

        let range = folded.source_range(0.."istanbul".len());
        assert_eq!(&source[range], "İstanbul");
    }

    #[test]
    fn source_range_of_empty_match() {
        let folded = FoldedText::new("ab");
        assert_eq!(folded.source_range(1..1), 1..1);
        assert_eq!(folded.source_range(2..2), 2..2);
    }
}
