//! Shared types, error model, and configuration for Interlinker.
//!
//! This crate is the foundation depended on by all other Interlinker crates.
//! It provides:
//! - [`InterlinkError`]: the unified error type
//! - Domain types ([`LinkMatch`], [`ArticleOutcome`], [`RunReport`], [`RunId`])
//! - Configuration ([`AppConfig`], [`RunConfig`], config loading)
//! - The optional external-service credential holder ([`ApiKeyHolder`])

pub mod config;
pub mod credentials;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, LinkingConfig, OutputConfig, RunConfig, ServiceConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use credentials::{ApiKeyHolder, DEFAULT_API_KEY};
pub use error::{InterlinkError, Result};
pub use types::{
    ArticleOutcome, InsertedLink, LinkMatch, ReportFormat, RunId, RunReport, RunTotals,
};
