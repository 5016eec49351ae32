//! # JsonModerationLog
//!
//! Moderation records stored as one JSON array. Appended on submission,
//! pruned only by deletion.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use domains::{ModerationLog, ModerationRecord, RecordPredicate, Result, StoreKind, StoreState};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::json_file::{self, read_json, write_json};

/// Handles built on the same path share one process-wide write lock.
pub struct JsonModerationLog {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonModerationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let write_lock = json_file::store_lock(&path);
        Self { path, write_lock }
    }
}

#[async_trait]
impl ModerationLog for JsonModerationLog {
    async fn load(&self) -> StoreState<Vec<ModerationRecord>> {
        read_json(StoreKind::ModerationLog, &self.path).await
    }

    async fn append(&self, record: ModerationRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut records = match self.load().await {
            StoreState::Corrupt(detail) => {
                warn!(path = %self.path.display(), %detail, "moderation log malformed, starting a fresh one");
                json_file::set_aside(StoreKind::ModerationLog, &self.path).await?;
                Vec::new()
            }
            state => state.into_data(),
        };
        debug!(entry_id = %record.id(), flagged = record.flagged, "appending moderation record");
        records.push(record);

        write_json(&self.path, &records).await
    }

    async fn remove_where(&self, predicate: RecordPredicate<'_>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let records = match self.load().await {
            StoreState::Loaded(records) => records,
            other => return Err(json_file::unavailable(StoreKind::ModerationLog, other)),
        };

        let before = records.len();
        let kept: Vec<ModerationRecord> = records.into_iter().filter(|r| !predicate(r)).collect();
        let removed = before - kept.len();

        write_json(&self.path, &kept).await?;
        Ok(removed)
    }
}
