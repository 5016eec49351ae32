//! # Domain Models
//!
//! These structs represent the core entities of the moderation backend.
//! Entries are immutable after creation; the only mutation is removal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tag_index::TagIndex;

/// Literal stored in a moderation record when no signal triggered.
pub const NOT_FLAGGED: &str = "NOT FLAGGED";

/// Opaque, globally unique entry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generates a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single user-submitted post or reply, as persisted in the entry store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Assigned once at creation, never updated
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    /// `None` for a top-level post
    #[serde(default)]
    pub parent_id: Option<EntryId>,
}

impl Entry {
    pub fn is_reply_to(&self, parent: &EntryId) -> bool {
        self.parent_id.as_ref() == Some(parent)
    }
}

/// Raw submission payload as it arrives from a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    /// Comma-separated, e.g. `"rant, venting"`
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Acknowledgement returned to a submitter. Carries no moderation outcome.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub id: EntryId,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "POSITIVE")]
    Positive,
    #[serde(rename = "NEGATIVE")]
    Negative,
    #[serde(rename = "NEUTRAL")]
    Neutral,
    #[serde(rename = "MIXED")]
    Mixed,
    /// Classifier failed or timed out
    #[serde(rename = "error")]
    Error,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Mixed => "MIXED",
            Sentiment::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Toxicity {
    #[serde(rename = "TOXIC")]
    Toxic,
    #[serde(rename = "NON_TOXIC")]
    NonToxic,
    /// Classifier failed or timed out
    #[serde(rename = "error")]
    Error,
}

impl fmt::Display for Toxicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Toxicity::Toxic => "TOXIC",
            Toxicity::NonToxic => "NON_TOXIC",
            Toxicity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Raw output of a toxicity model: its top label and that label's confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicityScore {
    pub label: String,
    pub score: f64,
}

/// Every signal computed for one submission. Never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    pub keywords: Vec<String>,
    pub sentiment: Sentiment,
    pub toxicity: Toxicity,
}

/// Outcome of the flag decision engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDecision {
    pub flagged: bool,
    /// Ordered KEYWORD, SENTIMENT, TOXICITY; empty when not flagged
    pub reasons: Vec<String>,
}

impl FlagDecision {
    /// The single reason string written to the moderation log.
    pub fn reason_line(&self) -> String {
        if self.reasons.is_empty() {
            NOT_FLAGGED.to_string()
        } else {
            self.reasons.join("; ")
        }
    }
}

/// Enriched, append-only record consumed by reviewers and analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationRecord {
    #[serde(flatten)]
    pub entry: Entry,
    pub cleaned_text: String,
    pub sentiment: Sentiment,
    pub toxicity: Toxicity,
    pub keywords: Vec<String>,
    pub flagged: bool,
    pub reason: String,
}

impl ModerationRecord {
    pub fn new(entry: Entry, cleaned_text: String, signals: SignalBundle, decision: &FlagDecision) -> Self {
        Self {
            entry,
            cleaned_text,
            sentiment: signals.sentiment,
            toxicity: signals.toxicity,
            keywords: signals.keywords,
            flagged: decision.flagged,
            reason: decision.reason_line(),
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.entry.id
    }
}

/// Full read view of the entry store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub entries: Vec<Entry>,
    pub tag_dict: TagIndex,
}

/// The three persisted stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StoreKind {
    Entries,
    ModerationLog,
    WordList,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreKind::Entries => "entries",
            StoreKind::ModerationLog => "moderation log",
            StoreKind::WordList => "word list",
        };
        f.write_str(name)
    }
}

/// Result of reading a persisted store.
///
/// Adapters report absence and corruption distinctly so operators can see
/// them in logs; callers that only need data collapse it with [`StoreState::into_data`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreState<T> {
    Loaded(T),
    /// No backing store exists yet
    Empty,
    /// Backing store exists but could not be read or parsed
    Corrupt(String),
}

impl<T: Default> StoreState<T> {
    /// Collapses absence and corruption to an empty collection.
    pub fn into_data(self) -> T {
        match self {
            StoreState::Loaded(data) => data,
            StoreState::Empty | StoreState::Corrupt(_) => T::default(),
        }
    }
}

impl<T> StoreState<T> {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreState::Corrupt(_))
    }
}

/// Outcome of a (possibly cascading) deletion across every store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeletionReport {
    /// Ids selected for removal: the roots plus every discovered descendant
    pub targeted: Vec<EntryId>,
    pub entries_removed: usize,
    pub log_records_removed: usize,
    /// Stores whose update was skipped because they were missing or malformed
    pub skipped: Vec<StoreKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> Entry {
        Entry {
            id: EntryId::from(id),
            title: "t".into(),
            text: "body".into(),
            tags: vec!["rant".into()],
            timestamp: Utc::now(),
            parent_id: None,
        }
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(EntryId::generate(), EntryId::generate());
    }

    #[test]
    fn labels_serialize_with_wire_names() {
        assert_eq!(serde_json::to_string(&Sentiment::Negative).unwrap(), "\"NEGATIVE\"");
        assert_eq!(serde_json::to_string(&Sentiment::Error).unwrap(), "\"error\"");
        assert_eq!(serde_json::to_string(&Toxicity::NonToxic).unwrap(), "\"NON_TOXIC\"");
    }

    #[test]
    fn unflagged_decision_uses_sentinel_reason() {
        let decision = FlagDecision { flagged: false, reasons: vec![] };
        assert_eq!(decision.reason_line(), NOT_FLAGGED);

        let decision = FlagDecision {
            flagged: true,
            reasons: vec!["KEYWORD: hate".into(), "SENTIMENT: NEGATIVE".into()],
        };
        assert_eq!(decision.reason_line(), "KEYWORD: hate; SENTIMENT: NEGATIVE");
    }

    #[test]
    fn moderation_record_flattens_entry_fields() {
        let signals = SignalBundle {
            keywords: vec![],
            sentiment: Sentiment::Neutral,
            toxicity: Toxicity::NonToxic,
        };
        let decision = FlagDecision { flagged: false, reasons: vec![] };
        let record = ModerationRecord::new(entry("a"), "body".into(), signals, &decision);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["title"], "t");
        assert_eq!(json["reason"], NOT_FLAGGED);
        assert_eq!(json["parent_id"], serde_json::Value::Null);
    }

    #[test]
    fn entry_reads_offsetless_timestamp() {
        let raw = r#"{
            "title": "hello",
            "text": "first post",
            "tags": ["intro"],
            "timestamp": "2025-06-08T13:08:00.093837",
            "id": "legacy",
            "parent_id": null
        }"#;
        let entry: Entry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.id, EntryId::from("legacy"));
        assert_eq!(entry.timestamp.to_rfc3339(), "2025-06-08T13:08:00.093837+00:00");

        let bad = raw.replace("2025-06-08T13:08:00.093837", "not a time");
        assert!(serde_json::from_str::<Entry>(&bad).is_err());
    }

    #[test]
    fn store_state_collapses_to_default() {
        let corrupt: StoreState<Vec<Entry>> = StoreState::Corrupt("bad json".into());
        assert!(corrupt.is_corrupt());
        assert!(corrupt.into_data().is_empty());
        assert_eq!(StoreState::Loaded(vec![entry("a")]).into_data().len(), 1);
    }
}
