//! # Port Traits
//!
//! Every adapter must implement these traits to be wired into the services.
//! Stores read and rewrite their backing data in full on each mutation, and
//! must serialize their own read-modify-write cycles.

use async_trait::async_trait;

use crate::errors::{ClassifierError, Result};
use crate::models::{BoardSnapshot, Entry, ModerationRecord, Sentiment, StoreState, ToxicityScore};

/// Predicate over entries for filtered removal.
pub type EntryPredicate<'a> = &'a (dyn Fn(&Entry) -> bool + Send + Sync);

/// Predicate over moderation records for filtered removal.
pub type RecordPredicate<'a> = &'a (dyn Fn(&ModerationRecord) -> bool + Send + Sync);

/// Raw entry store plus its co-located tag index. Single source of truth for
/// which entries exist.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Loads the current entries, distinguishing absence and corruption.
    async fn load(&self) -> StoreState<Vec<Entry>>;

    /// Appends an entry and rebuilds the tag index in the same write.
    async fn append(&self, entry: Entry) -> Result<()>;

    /// Removes all matching entries and rebuilds the tag index.
    ///
    /// Fails with `StoreUnavailable` when the store is missing or malformed;
    /// the store is left untouched in that case.
    async fn remove_where(&self, predicate: EntryPredicate<'_>) -> Result<usize>;

    /// The `{entries, tag_dict}` view; empty when the store is unusable.
    async fn snapshot(&self) -> BoardSnapshot;

    async fn read(&self) -> Vec<Entry> {
        self.load().await.into_data()
    }
}

/// Append-only enriched record store.
#[async_trait]
pub trait ModerationLog: Send + Sync {
    async fn load(&self) -> StoreState<Vec<ModerationRecord>>;

    async fn append(&self, record: ModerationRecord) -> Result<()>;

    /// Same failure contract as [`EntryRepository::remove_where`].
    async fn remove_where(&self, predicate: RecordPredicate<'_>) -> Result<usize>;

    async fn records(&self) -> Vec<ModerationRecord> {
        self.load().await.into_data()
    }
}

/// Off-the-shelf sentiment model.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify_sentiment(&self, text: &str) -> std::result::Result<Sentiment, ClassifierError>;
}

/// Off-the-shelf toxicity model. Thresholding happens in the signal collector.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ToxicityClassifier: Send + Sync {
    async fn score_toxicity(&self, text: &str) -> std::result::Result<ToxicityScore, ClassifierError>;
}

/// Provider of the configured moderation word list.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait KeywordSource: Send + Sync {
    /// Lowercased words; fails when the list is unavailable.
    async fn moderation_words(&self) -> Result<Vec<String>>;
}
