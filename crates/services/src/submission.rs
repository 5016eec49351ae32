//! # Submission Service
//!
//! Validate, collect signals, decide, then persist the raw entry and its
//! enriched moderation record. The moderation outcome is never returned to the
//! submitter.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    DomainError, Entry, EntryId, EntryRepository, ModerationLog, ModerationRecord, Result,
    Submission, SubmissionReceipt,
};
use tracing::{error, info, warn};

use crate::flagging;
use crate::normalizer;
use crate::signals::SignalCollector;

pub struct SubmissionService {
    entries: Arc<dyn EntryRepository>,
    log: Arc<dyn ModerationLog>,
    signals: SignalCollector,
}

impl SubmissionService {
    pub fn new(
        entries: Arc<dyn EntryRepository>,
        log: Arc<dyn ModerationLog>,
        signals: SignalCollector,
    ) -> Self {
        Self {
            entries,
            log,
            signals,
        }
    }

    pub async fn submit(&self, submission: Submission) -> Result<SubmissionReceipt> {
        // Rejected before any signal is computed.
        if submission.title.trim().is_empty() || submission.text.trim().is_empty() {
            return Err(DomainError::validation("no text or title was sent"));
        }

        let signals = self.signals.collect(&submission.text).await;
        let decision = flagging::decide(&signals);

        let entry = Entry {
            id: EntryId::generate(),
            title: submission.title,
            text: submission.text,
            tags: parse_tags(submission.tags.as_deref()),
            timestamp: Utc::now(),
            parent_id: submission
                .parent_id
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .map(EntryId::from),
        };
        let id = entry.id.clone();

        // Record before entry, so a delete landing in between never strands a record.
        let cleaned = normalizer::normalize(&entry.text);
        let record = ModerationRecord::new(entry.clone(), cleaned, signals, &decision);
        let logged = match self.log.append(record).await {
            Ok(()) => true,
            Err(err) => {
                // Non-fatal: reviewers lose this record only.
                error!(entry_id = %id, error = %err, "failed to append moderation record");
                false
            }
        };

        if let Err(err) = self.entries.append(entry).await {
            if logged {
                self.withdraw_record(&id).await;
            }
            return Err(err);
        }

        if decision.flagged {
            warn!(entry_id = %id, reason = %decision.reason_line(), "entry flagged for review");
        } else {
            info!(entry_id = %id, "entry saved");
        }

        Ok(SubmissionReceipt {
            id,
            message: "Entry saved.",
        })
    }

    async fn withdraw_record(&self, id: &EntryId) {
        let matches = |r: &ModerationRecord| r.id() == id;
        if let Err(err) = self.log.remove_where(&matches).await {
            error!(entry_id = %id, error = %err, "moderation record left without its entry");
        }
    }
}

/// Splits a comma-separated tag string into trimmed, non-empty tags.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|tags| {
        tags.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
