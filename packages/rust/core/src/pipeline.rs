//! End-to-end linking pipeline: sitemap + articles → index → link → write.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, instrument};

use interlinker_linker::{KeywordIndex, LinkOptions, process_article};
use interlinker_shared::{ArticleOutcome, Result, RunConfig, RunId, RunReport};

use crate::report;
use crate::writer::ArticleWriter;

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after an article has been linked and written.
    fn article_processed(&self, article: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn article_processed(&self, _article: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &RunReport) {}
}

/// Load a sitemap and build its keyword index.
pub fn build_index(sitemap_path: &Path) -> Result<KeywordIndex> {
    let urls = interlinker_loader::load_sitemap(sitemap_path)?;
    Ok(KeywordIndex::build(&urls))
}

/// Run the full linking pipeline.
///
/// 1. Load the sitemap URL set
/// 2. Load the articles
/// 3. Build the keyword index
/// 4. Link and write each article, in article id order
/// 5. Write the optional run report
///
/// The first error aborts the run; articles already written stay on disk.
#[instrument(skip_all, fields(sitemap = %config.sitemap_path.display(), articles = %config.articles_dir.display()))]
pub fn run(config: &RunConfig, progress: &dyn ProgressReporter) -> Result<RunReport> {
    config.validate()?;

    let start = Instant::now();
    let started_at = Utc::now();
    let id = RunId::new();
    info!(%id, "starting link pipeline");

    // --- Phase 1: Inputs ---
    progress.phase("Loading sitemap");
    let urls = interlinker_loader::load_sitemap(&config.sitemap_path)?;

    progress.phase("Loading articles");
    let articles = interlinker_loader::load_articles(&config.articles_dir)?;

    // --- Phase 2: Index ---
    progress.phase("Building keyword index");
    let index = KeywordIndex::build(&urls);

    // --- Phase 3: Link + write ---
    progress.phase("Linking articles");
    let opts = LinkOptions::from(config);
    let writer = ArticleWriter::create(&config.output_dir, &config.output_suffix)?;
    let total = articles.len();
    let mut outcomes = Vec::with_capacity(total);

    for (i, (article_id, content)) in articles.iter().enumerate() {
        let processed = process_article(content, &index, &opts)?;
        let written = writer.write(article_id, &processed.content)?;

        debug!(
            article = %article_id,
            links = processed.links.len(),
            skipped = processed.skipped.len(),
            "article processed"
        );
        progress.article_processed(article_id, i + 1, total);

        outcomes.push(ArticleOutcome {
            article: article_id.clone(),
            links: processed.links,
            skipped: processed.skipped,
            output_path: written.path,
            content_hash: written.content_hash,
        });
    }

    let run_report = RunReport {
        id,
        started_at,
        finished_at: Utc::now(),
        url_count: urls.len(),
        keyword_count: index.len(),
        articles: outcomes,
    };

    // --- Phase 4: Report ---
    if let Some(format) = config.report {
        progress.phase("Writing link report");
        report::write_report(&run_report, writer.dir(), format)?;
    }

    let totals = run_report.totals();
    info!(
        articles = totals.articles,
        links_added = totals.links_added,
        links_skipped = totals.links_skipped,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "link pipeline complete"
    );

    progress.done(&run_report);
    Ok(run_report)
}
