//! Remote sitemap discovery.
//!
//! Downloads an XML sitemap, follows `<sitemapindex>` children, and flattens
//! everything into one URL list that can be saved as a plain sitemap file for
//! the loader. This is the only networked part of Interlinker; the linking
//! pipeline itself works purely on local files.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use interlinker_loader::{SitemapDocument, looks_like_xml, parse_sitemap_xml, parse_url_lines};
use interlinker_shared::{InterlinkError, Result};
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

/// Maximum number of redirects to follow per request.
const MAX_REDIRECTS: usize = 3;

/// Default timeout in seconds for each sitemap request.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default depth limit for nested sitemap indexes.
const DEFAULT_MAX_DEPTH: usize = 3;

/// Default maximum response size (50 MB, the sitemap protocol limit).
const MAX_RESPONSE_SIZE: u64 = 50 * 1024 * 1024;

/// User-Agent string for sitemap requests.
const USER_AGENT: &str = concat!("Interlinker/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Fetch options
// ---------------------------------------------------------------------------

/// Configuration for sitemap fetching.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout for each HTTP request in seconds.
    pub timeout_secs: u64,
    /// How many levels of `<sitemapindex>` to follow below the root.
    pub max_depth: usize,
    /// Largest response body accepted, in bytes.
    pub max_body_bytes: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_depth: DEFAULT_MAX_DEPTH,
            max_body_bytes: MAX_RESPONSE_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Fetch a sitemap and every sitemap it indexes, returning page URLs.
///
/// Child sitemaps are fetched one after another, breadth first. Relative
/// `<loc>` values are resolved against the sitemap that lists them. URLs
/// are deduplicated, keeping first-seen order. Any failed request aborts
/// the whole fetch.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_sitemap(url: &Url, opts: &FetchOptions) -> Result<Vec<String>> {
    let client = build_client(opts)?;

    let mut queue: VecDeque<(Url, usize)> = VecDeque::from([(url.clone(), 0)]);
    let mut visited: HashSet<Url> = HashSet::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut urls = Vec::new();

    while let Some((sitemap_url, depth)) = queue.pop_front() {
        if !visited.insert(sitemap_url.clone()) {
            debug!(url = %sitemap_url, "sitemap already fetched, skipping");
            continue;
        }

        info!(url = %sitemap_url, depth, "fetching sitemap");
        let body = fetch_body(&client, &sitemap_url, opts.max_body_bytes).await?;

        match parse_body(&body)? {
            SitemapDocument::UrlSet(locs) => {
                debug!(url = %sitemap_url, entries = locs.len(), "urlset parsed");
                for loc in locs {
                    let resolved = resolve(&sitemap_url, &loc);
                    if seen.insert(resolved.clone()) {
                        urls.push(resolved);
                    }
                }
            }
            SitemapDocument::Index(children) => {
                if depth >= opts.max_depth {
                    return Err(InterlinkError::validation(format!(
                        "{sitemap_url}: sitemap index nesting exceeds depth {}",
                        opts.max_depth
                    )));
                }
                debug!(url = %sitemap_url, children = children.len(), "sitemap index parsed");
                for child in children {
                    let child_url = sitemap_url.join(&child).map_err(|e| {
                        InterlinkError::validation(format!("invalid child sitemap {child:?}: {e}"))
                    })?;
                    queue.push_back((child_url, depth + 1));
                }
            }
        }
    }

    info!(urls = urls.len(), sitemaps = visited.len(), "sitemap fetch complete");
    Ok(urls)
}

/// Write URLs as a newline-delimited sitemap file, creating parent dirs.
pub fn write_sitemap_file(path: &Path, urls: &[String]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| InterlinkError::io(parent, e))?;
    }

    let mut content = urls.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(path, content).map_err(|e| InterlinkError::io(path, e))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a reqwest client with appropriate settings.
fn build_client(opts: &FetchOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(std::time::Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| InterlinkError::Network(format!("failed to build HTTP client: {e}")))
}

/// Fetch a URL and return its body as text.
///
/// The body is streamed and the size cap is enforced on the bytes actually
/// received, so responses without a `Content-Length` are bounded too.
async fn fetch_body(client: &Client, url: &Url, max_bytes: u64) -> Result<String> {
    let mut response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| InterlinkError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(InterlinkError::Network(format!("{url}: HTTP {status}")));
    }

    if let Some(len) = response.content_length() {
        if len > max_bytes {
            return Err(too_large(url, len, max_bytes));
        }
    }

    let mut bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| InterlinkError::Network(format!("{url}: failed to read body: {e}")))?
    {
        let received = (bytes.len() + chunk.len()) as u64;
        if received > max_bytes {
            return Err(too_large(url, received, max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }

    let body = String::from_utf8(bytes)
        .map_err(|e| InterlinkError::parse(format!("{url}: body is not UTF-8: {e}")))?;

    if body.trim().is_empty() {
        return Err(InterlinkError::validation(format!("{url}: empty response")));
    }

    Ok(body)
}

fn too_large(url: &Url, received: u64, max_bytes: u64) -> InterlinkError {
    InterlinkError::validation(format!(
        "{url}: response too large ({received} bytes, max {max_bytes})"
    ))
}

/// Parse a response body as XML, or as a plain URL list.
fn parse_body(body: &str) -> Result<SitemapDocument> {
    if looks_like_xml(body) {
        parse_sitemap_xml(body)
    } else {
        Ok(SitemapDocument::UrlSet(
            parse_url_lines(body).into_iter().collect(),
        ))
    }
}

/// Resolve a relative page `<loc>` against its sitemap.
///
/// Absolute values are returned untouched so path segments keep their
/// original spelling (no percent-encoding of non-ASCII characters).
fn resolve(base: &Url, loc: &str) -> String {
    if Url::parse(loc).is_ok() {
        return loc.to_string();
    }
    match base.join(loc) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => loc.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn urlset(locs: &[&str]) -> String {
        let entries: String = locs
            .iter()
            .map(|l| format!("<url><loc>{l}</loc></url>"))
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">{entries}</urlset>"
        )
    }

    async fn mount(server: &MockServer, route: &str, status: u16, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_plain_urlset() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/sitemap.xml",
            200,
            urlset(&["https://site.com/blog/a", "https://site.com/blog/b"]),
        )
        .await;

        let url = Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
        let urls = fetch_sitemap(&url, &FetchOptions::default()).await.unwrap();
        assert_eq!(urls, vec!["https://site.com/blog/a", "https://site.com/blog/b"]);
    }

    #[tokio::test]
    async fn fetch_follows_sitemap_index() {
        let server = MockServer::start().await;
        let index = format!(
            "<sitemapindex>\
               <sitemap><loc>{0}/posts.xml</loc></sitemap>\
               <sitemap><loc>/pages.xml</loc></sitemap>\
             </sitemapindex>",
            server.uri()
        );
        mount(&server, "/sitemap.xml", 200, index).await;
        mount(
            &server,
            "/posts.xml",
            200,
            urlset(&["https://site.com/blog/a", "https://site.com/shared"]),
        )
        .await;
        mount(
            &server,
            "/pages.xml",
            200,
            urlset(&["https://site.com/shared", "https://site.com/about"]),
        )
        .await;

        let url = Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
        let urls = fetch_sitemap(&url, &FetchOptions::default()).await.unwrap();
        assert_eq!(
            urls,
            vec![
                "https://site.com/blog/a",
                "https://site.com/shared",
                "https://site.com/about",
            ]
        );
    }

    #[tokio::test]
    async fn fetch_index_depth_limit() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/sitemap.xml",
            200,
            "<sitemapindex><sitemap><loc>/child.xml</loc></sitemap></sitemapindex>".into(),
        )
        .await;

        let url = Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
        let opts = FetchOptions {
            max_depth: 0,
            ..FetchOptions::default()
        };
        let result = fetch_sitemap(&url, &opts).await;
        assert!(matches!(result, Err(InterlinkError::Validation { .. })));
    }

    #[tokio::test]
    async fn fetch_self_referencing_index_terminates() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/sitemap.xml",
            200,
            "<sitemapindex><sitemap><loc>/sitemap.xml</loc></sitemap></sitemapindex>".into(),
        )
        .await;

        let url = Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
        let urls = fetch_sitemap(&url, &FetchOptions::default()).await.unwrap();
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn fetch_not_found_is_network_error() {
        let server = MockServer::start().await;
        mount(&server, "/sitemap.xml", 404, String::new()).await;

        let url = Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
        let result = fetch_sitemap(&url, &FetchOptions::default()).await;
        assert!(matches!(result, Err(InterlinkError::Network(_))));
    }

    #[tokio::test]
    async fn fetch_plain_text_list() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/sitemap.txt",
            200,
            "https://site.com/x\n\nhttps://site.com/y\n".into(),
        )
        .await;

        let url = Url::parse(&format!("{}/sitemap.txt", server.uri())).unwrap();
        let urls = fetch_sitemap(&url, &FetchOptions::default()).await.unwrap();
        assert_eq!(urls, vec!["https://site.com/x", "https://site.com/y"]);
    }

    #[tokio::test]
    async fn fetch_rejects_body_over_cap() {
        let server = MockServer::start().await;
        mount(&server, "/sitemap.xml", 200, urlset(&["https://site.com/blog/a"])).await;

        let url = Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
        let opts = FetchOptions {
            max_body_bytes: 16,
            ..FetchOptions::default()
        };
        let err = fetch_sitemap(&url, &opts).await.unwrap_err();
        assert!(matches!(err, InterlinkError::Validation { .. }));
        assert!(err.to_string().contains("response too large"));
    }

    #[tokio::test]
    async fn fetch_rejects_streamed_body_over_cap() {
        let server = MockServer::start().await;
        mount(&server, "/sitemap.txt", 200, "https://site.com/a\n".repeat(64)).await;

        let url = Url::parse(&format!("{}/sitemap.txt", server.uri())).unwrap();
        let client = build_client(&FetchOptions::default()).unwrap();
        let err = fetch_body(&client, &url, 100).await.unwrap_err();
        assert!(err.to_string().contains("response too large"));

        let body = fetch_body(&client, &url, 64 * 19).await.unwrap();
        assert_eq!(body.lines().count(), 64);
    }

    #[tokio::test]
    async fn fetch_empty_body_fails() {
        let server = MockServer::start().await;
        mount(&server, "/sitemap.xml", 200, "   ".into()).await;

        let url = Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
        let result = fetch_sitemap(&url, &FetchOptions::default()).await;
        assert!(result.is_err());
    }

    #[test]
    fn resolve_keeps_absolute_and_joins_relative() {
        let base = Url::parse("https://site.com/sitemaps/posts.xml").unwrap();
        assert_eq!(resolve(&base, "https://site.com/blog/çiçek"), "https://site.com/blog/çiçek");
        assert_eq!(resolve(&base, "/about"), "https://site.com/about");
    }

    #[test]
    fn write_sitemap_file_roundtrips_through_loader() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("sitemap.txt");
        let urls = vec!["https://site.com/a".to_string(), "https://site.com/b".to_string()];

        write_sitemap_file(&path, &urls).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "https://site.com/a\nhttps://site.com/b\n");

        let loaded = interlinker_loader::load_sitemap(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
