//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use interlinker_core::pipeline::{self, ProgressReporter};
use interlinker_discovery::{FetchOptions, fetch_sitemap, write_sitemap_file};
use interlinker_shared::{
    ApiKeyHolder, AppConfig, ReportFormat, RunConfig, RunReport, init_config, load_config,
    load_config_from,
};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Interlinker: add internal links to articles from a sitemap.
#[derive(Parser)]
#[command(
    name = "interlinker",
    version,
    about = "Insert internal links into plain-text articles using keywords from a sitemap.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.interlinker/interlinker.toml.
    #[arg(long, global = true, env = "INTERLINKER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Run report format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum ReportArg {
    Json,
    Csv,
    Html,
}

impl From<ReportArg> for ReportFormat {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Json => Self::Json,
            ReportArg::Csv => Self::Csv,
            ReportArg::Html => Self::Html,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Link every article in a directory and write the results.
    Run {
        /// Sitemap file: one URL per line, or an XML urlset.
        #[arg(long)]
        sitemap: PathBuf,

        /// Directory containing the `.txt` articles.
        #[arg(long)]
        articles: PathBuf,

        /// Output directory (defaults to the config value, `report`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Maximum links per article.
        #[arg(long)]
        max_links: Option<usize>,

        /// Also write a run report in this format.
        #[arg(long)]
        report: Option<ReportArg>,
    },

    /// Print the keyword index built from a sitemap as JSON.
    Index {
        /// Sitemap file: one URL per line, or an XML urlset.
        #[arg(long)]
        sitemap: PathBuf,
    },

    /// Download a remote sitemap (following sitemap indexes) into a local file.
    FetchSitemap {
        /// Sitemap URL.
        url: String,

        /// File to write the newline-delimited URL list to.
        #[arg(short, long, default_value = "sitemap.txt")]
        out: PathBuf,

        /// Maximum sitemap index nesting to follow.
        #[arg(long, default_value = "3")]
        max_depth: usize,

        /// Per-request timeout in seconds.
        #[arg(long, default_value = "20")]
        timeout: u64,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults (at `--config` when given).
    Init {
        /// Replace an existing config file.
        #[arg(long)]
        force: bool,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "interlinker=info",
        1 => "interlinker=debug",
        _ => "interlinker=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Run {
            sitemap,
            articles,
            out,
            max_links,
            report,
        } => {
            let config = resolve_config(config_path.as_deref())?;
            cmd_run(&config, sitemap, articles, out, max_links, report)
        }
        Command::Index { sitemap } => cmd_index(&sitemap),
        Command::FetchSitemap {
            url,
            out,
            max_depth,
            timeout,
        } => cmd_fetch_sitemap(&url, &out, max_depth, timeout).await,
        Command::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(config_path.as_deref(), force),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

/// Load the config from `--config`, or the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_run(
    config: &AppConfig,
    sitemap: PathBuf,
    articles: PathBuf,
    out: Option<PathBuf>,
    max_links: Option<usize>,
    report: Option<ReportArg>,
) -> Result<()> {
    let mut run_config = RunConfig::new(config, sitemap, articles);
    if let Some(out) = out {
        run_config.output_dir = out;
    }
    if let Some(max_links) = max_links {
        run_config.max_links = max_links;
    }
    run_config.report = report.map(ReportFormat::from);

    let progress = CliProgress::new();
    let result = pipeline::run(&run_config, &progress);
    if result.is_err() {
        progress.spinner.finish_and_clear();
    }
    let run_report = result?;

    let totals = run_report.totals();
    println!(
        "Linked {} article(s): {} link(s) added, {} skipped, {} unchanged.",
        totals.articles, totals.links_added, totals.links_skipped, totals.unchanged_articles,
    );
    println!("Output: {}", run_config.output_dir.display());
    Ok(())
}

fn cmd_index(sitemap: &Path) -> Result<()> {
    let index = pipeline::build_index(sitemap)?;
    info!(keywords = index.len(), "index ready");
    let json = serde_json::to_string_pretty(&index)?;
    println!("{json}");
    Ok(())
}

async fn cmd_fetch_sitemap(url: &str, out: &Path, max_depth: usize, timeout: u64) -> Result<()> {
    let parsed_url = Url::parse(url).map_err(|e| eyre!("invalid URL '{url}': {e}"))?;
    let opts = FetchOptions {
        timeout_secs: timeout,
        max_depth,
        ..FetchOptions::default()
    };

    let urls = fetch_sitemap(&parsed_url, &opts).await?;
    write_sitemap_file(out, &urls)?;

    println!("Wrote {} URL(s) to {}", urls.len(), out.display());
    Ok(())
}

fn cmd_config_init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = init_config(path, force)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");

    let key = ApiKeyHolder::from_service_config(&config.service);
    let status = if key.is_configured() { "set" } else { "not set" };
    println!("# {} is {status}", config.service.api_key_env);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn article_processed(&self, article: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Linking [{current}/{total}] {article}"));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}
