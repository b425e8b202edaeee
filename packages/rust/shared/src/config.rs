//! Application configuration for Interlinker.
//!
//! User config lives at `~/.interlinker/interlinker.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InterlinkError, Result};
use crate::types::ReportFormat;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "interlinker.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".interlinker";

// ---------------------------------------------------------------------------
// Config structs (matching interlinker.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Keyword extraction and link insertion settings.
    #[serde(default)]
    pub linking: LinkingConfig,

    /// Where and how processed articles are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Optional external-service settings.
    #[serde(default)]
    pub service: ServiceConfig,
}

/// `[linking]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkingConfig {
    /// Maximum number of `(keyword, url)` matches per article.
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Keywords must be strictly longer than this many characters.
    #[serde(default = "default_min_keyword_len")]
    pub min_keyword_len: usize,

    /// Words never used as keywords (compared after lowercasing).
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            max_links: default_max_links(),
            min_keyword_len: default_min_keyword_len(),
            stop_words: default_stop_words(),
        }
    }
}

fn default_max_links() -> usize {
    3
}
fn default_min_keyword_len() -> usize {
    3
}
fn default_stop_words() -> Vec<String> {
    ["ve", "veya", "ile", "için", "bu", "bir", "da", "de"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory for processed articles.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Appended to the article id to form the output file stem.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            suffix: default_suffix(),
        }
    }
}

fn default_output_dir() -> String {
    "report".into()
}
fn default_suffix() -> String {
    "_processed".into()
}

/// `[service]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_api_key_env() -> String {
    "INTERLINKER_API_KEY".into()
}

// ---------------------------------------------------------------------------
// Run config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Sitemap file (newline-delimited URLs or XML urlset).
    pub sitemap_path: PathBuf,
    /// Directory holding the `.txt` articles.
    pub articles_dir: PathBuf,
    /// Directory processed articles are written to.
    pub output_dir: PathBuf,
    /// Output file stem suffix (`<id><suffix>.txt`).
    pub output_suffix: String,
    /// Maximum matches per article.
    pub max_links: usize,
    /// Keywords must be strictly longer than this.
    pub min_keyword_len: usize,
    /// Stop words, lowercase.
    pub stop_words: Vec<String>,
    /// Optional run report written next to the processed articles.
    pub report: Option<ReportFormat>,
}

impl RunConfig {
    /// Build a run config from the app config and the two required inputs.
    pub fn new(
        config: &AppConfig,
        sitemap_path: impl Into<PathBuf>,
        articles_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sitemap_path: sitemap_path.into(),
            articles_dir: articles_dir.into(),
            output_dir: PathBuf::from(&config.output.dir),
            output_suffix: config.output.suffix.clone(),
            max_links: config.linking.max_links,
            min_keyword_len: config.linking.min_keyword_len,
            stop_words: config
                .linking
                .stop_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            report: None,
        }
    }

    /// Reject settings that would write outside the output directory.
    pub fn validate(&self) -> Result<()> {
        if self
            .output_suffix
            .contains(|c| c == '/' || c == '\\')
        {
            return Err(InterlinkError::config(format!(
                "output suffix must not contain path separators: {:?}",
                self.output_suffix
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.interlinker/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| InterlinkError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.interlinker/interlinker.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| InterlinkError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        InterlinkError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Write a default config file to `path`, or to `~/.interlinker/interlinker.toml`
/// when no path is given. Parent directories are created as needed.
///
/// An existing file is only replaced when `force` is set.
/// Returns the path of the written file.
pub fn init_config(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    if path.exists() && !force {
        return Err(InterlinkError::config(format!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        )));
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| InterlinkError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| InterlinkError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| InterlinkError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
