//! # JsonEntryRepository
//!
//! Raw entries plus the derived tag index in one JSON document:
//! `{"entries": [...], "tag_dict": {...}}`. The tag index is rebuilt from the
//! full entry list on every write.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use domains::{
    BoardSnapshot, Entry, EntryPredicate, EntryRepository, Result, StoreKind, StoreState, TagIndex,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::json_file::{self, read_json, write_json};

#[derive(Serialize, Deserialize)]
struct EntriesDocument {
    entries: Vec<Entry>,
    #[serde(default)]
    tag_dict: TagIndex,
}

impl EntriesDocument {
    fn from_entries(entries: Vec<Entry>) -> Self {
        let tag_dict = TagIndex::build(&entries);
        Self { entries, tag_dict }
    }
}

/// Handles built on the same path share one process-wide write lock.
pub struct JsonEntryRepository {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonEntryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let write_lock = json_file::store_lock(&path);
        Self { path, write_lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StoreState<EntriesDocument> {
        read_json(StoreKind::Entries, &self.path).await
    }
}

#[async_trait]
impl EntryRepository for JsonEntryRepository {
    async fn load(&self) -> StoreState<Vec<Entry>> {
        match self.read_document().await {
            StoreState::Loaded(doc) => StoreState::Loaded(doc.entries),
            StoreState::Empty => StoreState::Empty,
            StoreState::Corrupt(detail) => StoreState::Corrupt(detail),
        }
    }

    async fn append(&self, entry: Entry) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.read_document().await {
            StoreState::Loaded(doc) => doc.entries,
            StoreState::Empty => Vec::new(),
            StoreState::Corrupt(detail) => {
                warn!(path = %self.path.display(), %detail, "entries store malformed, starting a fresh one");
                json_file::set_aside(StoreKind::Entries, &self.path).await?;
                Vec::new()
            }
        };
        debug!(entry_id = %entry.id, "appending entry");
        entries.push(entry);

        write_json(&self.path, &EntriesDocument::from_entries(entries)).await
    }

    async fn remove_where(&self, predicate: EntryPredicate<'_>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let entries = match self.read_document().await {
            StoreState::Loaded(doc) => doc.entries,
            other => return Err(json_file::unavailable(StoreKind::Entries, other)),
        };

        let before = entries.len();
        let kept: Vec<Entry> = entries.into_iter().filter(|e| !predicate(e)).collect();
        let removed = before - kept.len();

        write_json(&self.path, &EntriesDocument::from_entries(kept)).await?;
        debug!(removed, "removed entries");
        Ok(removed)
    }

    async fn snapshot(&self) -> BoardSnapshot {
        match self.read_document().await {
            StoreState::Loaded(doc) => BoardSnapshot {
                entries: doc.entries,
                tag_dict: doc.tag_dict,
            },
            _ => BoardSnapshot::default(),
        }
    }
}
