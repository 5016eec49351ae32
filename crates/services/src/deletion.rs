//! # Cascade Delete Coordinator
//!
//! Removes entries and all their transitive replies from the entry store (and
//! therefore the tag index) and from the moderation log.
//!
//! Descendants are discovered from one snapshot taken before any removal,
//! with a worklist and a visited set so cyclic `parent_id` chains terminate.
//! Each store is updated independently: a missing or malformed store is
//! skipped and reported, the others still proceed.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    DeletionReport, DomainError, Entry, EntryId, EntryRepository, ModerationLog, ModerationRecord,
    Result, StoreKind, StoreState, timestamp,
};
use tracing::{debug, info, warn};

pub struct CascadeDeleteCoordinator {
    entries: Arc<dyn EntryRepository>,
    log: Arc<dyn ModerationLog>,
}

impl CascadeDeleteCoordinator {
    pub fn new(entries: Arc<dyn EntryRepository>, log: Arc<dyn ModerationLog>) -> Self {
        Self { entries, log }
    }

    /// Deletes one entry, and with `cascade` every entry replying to it.
    pub async fn delete(&self, id: &EntryId, cascade: bool) -> DeletionReport {
        info!(entry_id = %id, cascade, "deleting entry");
        let snapshot = self.snapshot().await;
        let unavailable = snapshot.is_none();
        let entries = snapshot.unwrap_or_default();
        self.delete_roots(&entries, vec![id.clone()], cascade, unavailable).await
    }

    /// Deletes every entry created strictly before `cutoff` (ISO-8601).
    pub async fn delete_before(&self, cutoff: &str, cascade: bool) -> Result<DeletionReport> {
        let cutoff_at = parse_cutoff(cutoff)?;

        let Some(entries) = self.snapshot().await else {
            return Ok(DeletionReport {
                skipped: vec![StoreKind::Entries],
                ..DeletionReport::default()
            });
        };

        let roots: Vec<EntryId> = entries
            .iter()
            .filter(|e| e.timestamp < cutoff_at)
            .map(|e| e.id.clone())
            .collect();
        info!(count = roots.len(), %cutoff_at, "deleting entries before cutoff");

        if roots.is_empty() {
            return Ok(DeletionReport::default());
        }
        Ok(self.delete_roots(&entries, roots, cascade, false).await)
    }

    /// Entries as loaded now; `None` when the store is missing or malformed.
    async fn snapshot(&self) -> Option<Vec<Entry>> {
        match self.entries.load().await {
            StoreState::Loaded(entries) => Some(entries),
            StoreState::Empty => {
                warn!(store = %StoreKind::Entries, "store missing, nothing to traverse");
                None
            }
            StoreState::Corrupt(detail) => {
                warn!(store = %StoreKind::Entries, %detail, "store malformed, nothing to traverse");
                None
            }
        }
    }

    async fn delete_roots(
        &self,
        snapshot: &[Entry],
        roots: Vec<EntryId>,
        cascade: bool,
        entries_unavailable: bool,
    ) -> DeletionReport {
        let targeted = if cascade {
            collect_descendants(snapshot, &roots)
        } else {
            dedup(roots)
        };
        let targets: HashSet<EntryId> = targeted.iter().cloned().collect();
        let mut report = DeletionReport {
            targeted,
            ..DeletionReport::default()
        };

        if entries_unavailable {
            report.skipped.push(StoreKind::Entries);
        } else {
            match self.entries.remove_where(&|e: &Entry| targets.contains(&e.id)).await {
                Ok(removed) => report.entries_removed = removed,
                Err(err) => skip(&mut report, StoreKind::Entries, &err),
            }
        }

        match self.log.remove_where(&|r: &ModerationRecord| targets.contains(r.id())).await {
            Ok(removed) => report.log_records_removed = removed,
            Err(err) => skip(&mut report, StoreKind::ModerationLog, &err),
        }

        info!(
            targeted = report.targeted.len(),
            entries_removed = report.entries_removed,
            log_records_removed = report.log_records_removed,
            "deletion finished"
        );
        report
    }
}

fn skip(report: &mut DeletionReport, store: StoreKind, err: &DomainError) {
    warn!(%store, error = %err, "skipping store update during delete");
    report.skipped.push(store);
}

fn dedup(ids: Vec<EntryId>) -> Vec<EntryId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Roots plus every transitive reply, in breadth-first discovery order.
pub fn collect_descendants(entries: &[Entry], roots: &[EntryId]) -> Vec<EntryId> {
    let mut children: HashMap<&EntryId, Vec<&EntryId>> = HashMap::new();
    for entry in entries {
        if let Some(parent) = &entry.parent_id {
            children.entry(parent).or_default().push(&entry.id);
        }
    }

    let mut visited: HashSet<EntryId> = HashSet::new();
    let mut order = Vec::new();
    let mut worklist: VecDeque<EntryId> = roots.iter().cloned().collect();

    while let Some(id) = worklist.pop_front() {
        if !visited.insert(id.clone()) {
            debug!(entry_id = %id, "already visited, skipping");
            continue;
        }
        if let Some(kids) = children.get(&id) {
            worklist.extend(kids.iter().map(|&k| k.clone()));
        }
        order.push(id);
    }
    order
}

/// Parses RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.f]` (as UTC) or a bare date.
pub fn parse_cutoff(raw: &str) -> Result<DateTime<Utc>> {
    timestamp::parse_iso8601(raw)
        .ok_or_else(|| DomainError::InvalidTimestamp(raw.trim().to_string()))
}
