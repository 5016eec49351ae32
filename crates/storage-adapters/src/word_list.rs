//! Moderation word list: plain text, one word per line, case-insensitive.

use std::path::PathBuf;

use async_trait::async_trait;
use domains::{DomainError, KeywordSource, Result, StoreKind};

pub struct FileWordList {
    path: PathBuf,
}

impl FileWordList {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl KeywordSource for FileWordList {
    async fn moderation_words(&self) -> Result<Vec<String>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::unavailable(StoreKind::WordList, format!("{}: {e}", self.path.display())))?;

        Ok(raw
            .lines()
            .map(str::trim_end)
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect())
    }
}
