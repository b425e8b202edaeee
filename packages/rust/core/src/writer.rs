//! Processed article output.

use std::path::{Path, PathBuf};

use interlinker_shared::{InterlinkError, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Extension of written article files.
const OUTPUT_EXTENSION: &str = "txt";

/// Location and digest of one written article.
#[derive(Debug, Clone)]
pub struct WrittenArticle {
    pub path: PathBuf,
    /// SHA-256 of the content, hex encoded.
    pub content_hash: String,
}

/// Writes processed articles as `<dir>/<id><suffix>.txt`.
#[derive(Debug, Clone)]
pub struct ArticleWriter {
    dir: PathBuf,
    suffix: String,
}

impl ArticleWriter {
    /// Create the writer, making sure the output directory exists.
    pub fn create(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| InterlinkError::io(&dir, e))?;
        Ok(Self {
            dir,
            suffix: suffix.into(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an article with this id is written to.
    pub fn output_path(&self, article_id: &str) -> PathBuf {
        self.dir
            .join(format!("{article_id}{}.{OUTPUT_EXTENSION}", self.suffix))
    }

    /// Write one processed article, replacing any previous output.
    pub fn write(&self, article_id: &str, content: &str) -> Result<WrittenArticle> {
        let path = self.output_path(article_id);
        std::fs::write(&path, content).map_err(|e| InterlinkError::io(&path, e))?;

        let content_hash = sha256_hex(content);
        debug!(path = %path.display(), hash = %content_hash, "article written");

        Ok(WrittenArticle { path, content_hash })
    }
}

fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
