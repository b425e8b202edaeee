//! Core domain types for Interlinker runs.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for pipeline run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Matches and outcomes
// ---------------------------------------------------------------------------

/// A keyword found in an article paired with a URL whose path contains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMatch {
    /// Lowercase keyword, also used as the anchor text.
    pub keyword: String,
    /// Target URL.
    pub url: String,
}

impl LinkMatch {
    pub fn new(keyword: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            url: url.into(),
        }
    }
}

/// A link that was actually written into an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedLink {
    pub keyword: String,
    pub url: String,
    /// Byte offset of the anchor tag in the rewritten text.
    pub offset: usize,
}

/// Per-article result of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleOutcome {
    /// Article identifier (source file stem).
    pub article: String,
    /// Links inserted, in insertion order.
    pub links: Vec<InsertedLink>,
    /// Matches that were not placed (keyword already linked, or no
    /// unlinked occurrence left).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<LinkMatch>,
    /// Where the processed article was written.
    pub output_path: PathBuf,
    /// SHA-256 of the written content, hex encoded.
    pub content_hash: String,
}

/// Aggregate counts across all articles of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub articles: usize,
    pub links_added: usize,
    pub links_skipped: usize,
    /// Articles written without any link.
    pub unchanged_articles: usize,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Distinct URLs loaded from the sitemap.
    pub url_count: usize,
    /// Distinct keywords in the index.
    pub keyword_count: usize,
    pub articles: Vec<ArticleOutcome>,
}

impl RunReport {
    /// Compute totals over all article outcomes.
    pub fn totals(&self) -> RunTotals {
        self.articles
            .iter()
            .fold(RunTotals::default(), |mut acc, outcome| {
                acc.articles += 1;
                acc.links_added += outcome.links.len();
                acc.links_skipped += outcome.skipped.len();
                if outcome.links.is_empty() {
                    acc.unchanged_articles += 1;
                }
                acc
            })
    }
}

/// Output format for the optional run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Csv,
    Html,
}

impl ReportFormat {
    /// File extension used for `link_report.<ext>`.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }
}
