//! Whole-file JSON read and atomic rewrite, plus the process-wide lock
//! registry that serializes read-modify-write cycles per file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use domains::{DomainError, Result, StoreKind, StoreState};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

static STORE_LOCKS: Lazy<DashMap<PathBuf, Arc<Mutex<()>>>> = Lazy::new(DashMap::new);

/// The lock shared by every store handle on `path` in this process.
pub fn store_lock(path: &Path) -> Arc<Mutex<()>> {
    let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    STORE_LOCKS.entry(key).or_default().clone()
}

/// Reads and parses `path`, reporting absence and corruption distinctly.
pub async fn read_json<T: DeserializeOwned>(store: StoreKind, path: &Path) -> StoreState<T> {
    let raw = match fs::read(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return StoreState::Empty,
        Err(err) => {
            warn!(%store, path = %path.display(), error = %err, "store unreadable");
            return StoreState::Corrupt(err.to_string());
        }
    };

    match serde_json::from_slice(&raw) {
        Ok(data) => StoreState::Loaded(data),
        Err(err) => {
            warn!(%store, path = %path.display(), error = %err, "store malformed");
            StoreState::Corrupt(err.to_string())
        }
    }
}

/// Serializes `value` to a sibling temp file, then renames it over `path`.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| DomainError::Storage(format!("{}: {e}", parent.display())))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, body)
        .await
        .map_err(|e| DomainError::Storage(format!("{}: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| DomainError::Storage(format!("{}: {e}", path.display())))?;
    Ok(())
}

/// Moves an unreadable store to `<file>.corrupt` so a fresh write keeps it.
pub async fn set_aside(store: StoreKind, path: &Path) -> Result<PathBuf> {
    let backup = sibling(path, ".corrupt");
    fs::rename(path, &backup)
        .await
        .map_err(|e| DomainError::Storage(format!("{}: {e}", backup.display())))?;
    warn!(%store, path = %path.display(), backup = %backup.display(), "malformed store set aside");
    Ok(backup)
}

fn temp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Maps a non-loaded state to the error a filtered removal reports.
pub fn unavailable<T>(store: StoreKind, state: StoreState<T>) -> DomainError {
    match state {
        StoreState::Corrupt(detail) => DomainError::unavailable(store, detail),
        _ => DomainError::unavailable(store, "store does not exist"),
    }
}
