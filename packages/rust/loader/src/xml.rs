//! XML sitemap parser.
//!
//! Handles the two document kinds from <https://www.sitemaps.org/protocol.html>:
//! - `<urlset>` with `<url><loc>…</loc></url>` page entries
//! - `<sitemapindex>` with `<sitemap><loc>…</loc></sitemap>` child sitemaps

use interlinker_shared::{InterlinkError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A parsed sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Page URLs from a `<urlset>`.
    UrlSet(Vec<String>),
    /// Child sitemap URLs from a `<sitemapindex>`.
    Index(Vec<String>),
}

impl SitemapDocument {
    /// The `<loc>` values, whichever kind of document this is.
    pub fn locations(&self) -> &[String] {
        match self {
            Self::UrlSet(urls) | Self::Index(urls) => urls,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Root {
    UrlSet,
    Index,
}

/// Whether `content` looks like an XML sitemap rather than a plain URL list.
pub fn looks_like_xml(content: &str) -> bool {
    let head = content.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<?xml") || head.starts_with("<urlset") || head.starts_with("<sitemapindex")
}

/// Parse a sitemap XML string.
///
/// Empty `<loc>` elements are dropped. Namespace prefixes on element names
/// are ignored.
pub fn parse_sitemap_xml(xml: &str) -> Result<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    let mut root: Option<Root> = None;
    let mut locs = Vec::new();
    let mut in_entry = false;
    let mut current_loc: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"urlset" if root.is_none() => root = Some(Root::UrlSet),
                b"sitemapindex" if root.is_none() => root = Some(Root::Index),
                b"url" if root == Some(Root::UrlSet) => in_entry = true,
                b"sitemap" if root == Some(Root::Index) => in_entry = true,
                b"loc" if in_entry => current_loc = Some(String::new()),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Some(loc) = current_loc.as_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| InterlinkError::parse(format!("sitemap <loc>: {err}")))?;
                    loc.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"loc" => {
                    if let Some(loc) = current_loc.take() {
                        let loc = loc.trim();
                        if !loc.is_empty() {
                            locs.push(loc.to_string());
                        }
                    }
                }
                b"url" | b"sitemap" => in_entry = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(InterlinkError::parse(format!(
                    "invalid sitemap XML at byte {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    match root {
        Some(Root::UrlSet) => Ok(SitemapDocument::UrlSet(locs)),
        Some(Root::Index) => Ok(SitemapDocument::Index(locs)),
        None => Err(InterlinkError::parse(
            "XML document has no <urlset> or <sitemapindex> root",
        )),
    }
}
