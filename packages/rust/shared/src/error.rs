//! Error types for Interlinker.
//!
//! Every library crate returns [`Result`]; the first error aborts a run, and
//! articles already written stay on disk. The CLI turns these into
//! `color-eyre` reports.

use std::path::PathBuf;

/// Failure of a load, index, link, write, or fetch step.
#[derive(Debug, thiserror::Error)]
pub enum InterlinkError {
    /// `interlinker.toml` is unreadable as TOML, a run option is unusable
    /// (output suffix with a path separator), or `config init` would replace
    /// an existing file.
    #[error("config error: {message}")]
    Config { message: String },

    /// Sitemap download failed: connection error, timeout, or non-2xx status.
    #[error("network error: {0}")]
    Network(String),

    /// Malformed sitemap XML, a non-UTF-8 response body, or a keyword that
    /// cannot be turned into a match pattern.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Reading a sitemap or article, or writing an output, config, or report
    /// file. Non-UTF-8 article content lands here as `InvalidData`.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input that parsed but cannot be used: a sitemap index handed to the
    /// loader, index nesting past the depth limit, or an empty or oversized
    /// sitemap response.
    #[error("validation error: {message}")]
    Validation { message: String },
}

pub type Result<T> = std::result::Result<T, InterlinkError>;

impl InterlinkError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Attach the file or directory that failed.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = InterlinkError::config("output suffix must not contain path separators");
        assert_eq!(
            err.to_string(),
            "config error: output suffix must not contain path separators"
        );

        let err = InterlinkError::validation("sitemap index given");
        assert!(err.to_string().contains("sitemap index"));

        let err = InterlinkError::Network("https://site.com/sitemap.xml: HTTP 404".into());
        assert_eq!(err.to_string(), "network error: https://site.com/sitemap.xml: HTTP 404");
    }

    #[test]
    fn io_error_carries_path() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidData, "not UTF-8");
        let err = InterlinkError::io("/tmp/articles/intro.txt", source);
        let msg = err.to_string();
        assert!(msg.contains("/tmp/articles/intro.txt"));
        assert!(msg.contains("not UTF-8"));
        assert!(matches!(err, InterlinkError::Io { ref source, .. } if source.kind() == std::io::ErrorKind::InvalidData));
    }
}
