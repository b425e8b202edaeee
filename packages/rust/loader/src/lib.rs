//! Input loading: the sitemap URL set and the article directory.
//!
//! Both loaders are strict. A missing path, an unreadable file, or non-UTF-8
//! content aborts with an [`InterlinkError::Io`] that names the path.

mod xml;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use interlinker_shared::{InterlinkError, Result};
use tracing::{debug, info, instrument};

pub use xml::{SitemapDocument, looks_like_xml, parse_sitemap_xml};

/// Extension of the article files picked up by [`load_articles`].
const ARTICLE_EXTENSION: &str = "txt";

/// Load the sitemap URL set.
///
/// Plain files hold one URL per line; each line is trimmed and blank lines
/// are dropped. XML `<urlset>` files contribute their `<loc>` values. A
/// `<sitemapindex>` is rejected since its children live elsewhere.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_sitemap(path: &Path) -> Result<BTreeSet<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| InterlinkError::io(path, e))?;

    let urls = if looks_like_xml(&content) {
        match parse_sitemap_xml(&content)? {
            SitemapDocument::UrlSet(locs) => locs.into_iter().collect(),
            SitemapDocument::Index(children) => {
                return Err(InterlinkError::validation(format!(
                    "{} is a sitemap index ({} child sitemaps, first: {}); \
                     fetch it with `interlinker fetch-sitemap` to flatten it",
                    path.display(),
                    children.len(),
                    children.first().map(String::as_str).unwrap_or("none"),
                )));
            }
        }
    } else {
        parse_url_lines(&content)
    };

    info!(urls = urls.len(), "sitemap loaded");
    Ok(urls)
}

/// Split newline-delimited URLs into a deduplicated set.
pub fn parse_url_lines(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Load every `*.txt` file directly inside `dir`, keyed by file stem.
///
/// Subdirectories and files with other extensions are ignored.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_articles(dir: &Path) -> Result<BTreeMap<String, String>> {
    let entries = std::fs::read_dir(dir).map_err(|e| InterlinkError::io(dir, e))?;
    let mut articles = BTreeMap::new();

    for entry in entries {
        let entry = entry.map_err(|e| InterlinkError::io(dir, e))?;
        let path = entry.path();

        if path.extension().and_then(|ext| ext.to_str()) != Some(ARTICLE_EXTENSION) {
            continue;
        }
        let file_type = entry.file_type().map_err(|e| InterlinkError::io(&path, e))?;
        if file_type.is_dir() {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            debug!(path = %path.display(), "skipping article with non UTF-8 file name");
            continue;
        };

        let content = std::fs::read_to_string(&path).map_err(|e| InterlinkError::io(&path, e))?;
        debug!(article = stem, bytes = content.len(), "article loaded");
        articles.insert(stem.to_string(), content);
    }

    info!(articles = articles.len(), "articles loaded");
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_lines_are_trimmed_deduplicated_and_blank_free() {
        let content = "  https://site.com/a  \n\nhttps://site.com/b\n\t\nhttps://site.com/a\n";
        let urls = parse_url_lines(content);
        assert_eq!(urls.len(), 2);
        assert!(urls.contains("https://site.com/a"));
        assert!(urls.contains("https://site.com/b"));
        assert!(urls.iter().all(|u| !u.trim().is_empty()));
    }

    #[test]
    fn load_text_sitemap_fixture() {
        let urls = load_sitemap(Path::new("../../../fixtures/sitemaps/sitemap.txt")).unwrap();
        assert_eq!(urls.len(), 4);
        assert!(urls.contains("https://site.com/blog/my-great-post"));
    }

    #[test]
    fn load_xml_sitemap_fixture() {
        let urls = load_sitemap(Path::new("../../../fixtures/sitemaps/sitemap.xml")).unwrap();
        assert_eq!(urls.len(), 3);
        assert!(urls.contains("https://site.com/blog/my-great-post"));
    }

    #[test]
    fn load_sitemap_index_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.xml");
        std::fs::write(
            &path,
            "<sitemapindex><sitemap><loc>https://site.com/s1.xml</loc></sitemap></sitemapindex>",
        )
        .unwrap();

        let err = load_sitemap(&path).unwrap_err();
        assert!(matches!(err, InterlinkError::Validation { .. }));
        assert!(err.to_string().contains("https://site.com/s1.xml"));
    }

    #[test]
    fn load_missing_sitemap_fails_with_path() {
        let err = load_sitemap(Path::new("/nonexistent/interlinker/sitemap.txt")).unwrap_err();
        match err {
            InterlinkError::Io { path, source } => {
                assert!(path.ends_with("sitemap.txt"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn load_articles_keys_by_stem_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("first-post.txt"), "Hello world").unwrap();
        std::fs::write(dir.path().join("second.txt"), "Another article").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let articles = load_articles(dir.path()).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles["first-post"], "Hello world");
        assert_eq!(articles["second"], "Another article");
        let ids: Vec<&String> = articles.keys().collect();
        assert_eq!(ids, ["first-post", "second"]);
    }

    #[test]
    fn load_articles_fixture_dir() {
        let articles = load_articles(Path::new("../../../fixtures/articles")).unwrap();
        assert_eq!(articles.len(), 2);
        assert!(articles.contains_key("rust-intro"));
        assert!(articles.contains_key("plain-note"));
    }

    #[test]
    fn load_articles_missing_dir_fails() {
        let result = load_articles(Path::new("/nonexistent/interlinker/articles"));
        assert!(matches!(result, Err(InterlinkError::Io { .. })));
    }

    #[test]
    fn load_articles_non_utf8_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        match load_articles(dir.path()) {
            Err(InterlinkError::Io { path, source }) => {
                assert!(path.ends_with("bad.txt"));
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
            }
            other => panic!("expected InvalidData Io error, got {other:?}"),
        }
    }
}
