//! Run report rendering (JSON, CSV, HTML).
//!
//! The report is written as `<output_dir>/link_report.<ext>` when requested.
//! It never affects the processed article files themselves.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use interlinker_shared::{
    ArticleOutcome, InterlinkError, ReportFormat, Result, RunReport, RunTotals,
};
use serde::Serialize;
use tracing::info;

/// Base file name of the run report.
const REPORT_FILE_STEM: &str = "link_report";

/// Render the report in the requested format.
pub fn render(report: &RunReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => render_json(report),
        ReportFormat::Csv => Ok(render_csv(report)),
        ReportFormat::Html => Ok(render_html(report)),
    }
}

/// Render and write the report into `dir`. Returns the written path.
pub fn write_report(report: &RunReport, dir: &Path, format: ReportFormat) -> Result<PathBuf> {
    let path = dir.join(format!("{REPORT_FILE_STEM}.{}", format.extension()));
    let content = render(report, format)?;
    std::fs::write(&path, content).map_err(|e| InterlinkError::io(&path, e))?;
    info!(path = %path.display(), "link report written");
    Ok(path)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    report: &'a RunReport,
    totals: RunTotals,
}

fn render_json(report: &RunReport) -> Result<String> {
    let doc = JsonReport {
        report,
        totals: report.totals(),
    };
    serde_json::to_string_pretty(&doc)
        .map_err(|e| InterlinkError::validation(format!("failed to serialize report: {e}")))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn render_csv(report: &RunReport) -> String {
    let timestamp = report.finished_at.to_rfc3339();
    let mut out = String::from("article,total_links,successful,failed,timestamp\n");

    for outcome in &report.articles {
        let successful = outcome.links.len();
        let failed = outcome.skipped.len();
        let _ = writeln!(
            out,
            "{},{},{successful},{failed},{timestamp}",
            csv_field(&outcome.article),
            successful + failed,
        );
    }

    out
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

fn render_html(report: &RunReport) -> String {
    let totals = report.totals();
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Link Report</title>\n<style>\n");
    out.push_str("body { font-family: Arial, sans-serif; margin: 20px; }\n");
    out.push_str(".stats { background: #f5f5f5; padding: 20px; border-radius: 5px; }\n");
    out.push_str("table { border-collapse: collapse; width: 100%; margin: 20px 0; }\n");
    out.push_str("th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n");
    out.push_str("th { background-color: #f2f2f2; }\n");
    out.push_str("</style>\n</head>\n<body>\n<h1>Link Report</h1>\n");

    let _ = writeln!(
        out,
        "<div class=\"stats\"><p>Run: {}</p><p>Articles: {}</p><p>Links added: {}</p>\
         <p>Skipped: {}</p><p>URLs: {}</p><p>Keywords: {}</p><p>Date: {}</p></div>",
        report.id,
        totals.articles,
        totals.links_added,
        totals.links_skipped,
        report.url_count,
        report.keyword_count,
        report.finished_at.to_rfc3339(),
    );

    for outcome in &report.articles {
        render_article_section(&mut out, outcome);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_article_section(out: &mut String, outcome: &ArticleOutcome) {
    let _ = writeln!(
        out,
        "<div class=\"report-section\">\n<h2>{}</h2>",
        escape_html(&outcome.article)
    );

    if !outcome.links.is_empty() {
        out.push_str("<h3>Added links</h3>\n<table>\n<tr><th>URL</th><th>Anchor text</th><th>Offset</th></tr>\n");
        for link in &outcome.links {
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&link.url),
                escape_html(&link.keyword),
                link.offset,
            );
        }
        out.push_str("</table>\n");
    }

    if !outcome.skipped.is_empty() {
        out.push_str("<h3>Skipped</h3>\n<ul>\n");
        for m in &outcome.skipped {
            let _ = writeln!(
                out,
                "<li>{} &rarr; {}</li>",
                escape_html(&m.keyword),
                escape_html(&m.url)
            );
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</div>\n");
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
