//! Shared harness: real JSON stores in a temp dir, stub classifiers.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use classifier_adapters::StubClassifier;
use domains::{
    Entry, EntryId, EntryRepository, FlagDecision, ModerationLog, ModerationRecord, Sentiment,
    SignalBundle, Toxicity,
};
use services::{CascadeDeleteCoordinator, SignalCollector, SignalPolicy, SubmissionService};
use storage_adapters::{FileWordList, JsonEntryRepository, JsonModerationLog};
use tempfile::TempDir;

pub struct Harness {
    pub dir: TempDir,
    pub entries: Arc<JsonEntryRepository>,
    pub log: Arc<JsonModerationLog>,
    pub submissions: Arc<SubmissionService>,
    pub deletions: CascadeDeleteCoordinator,
}

impl Harness {
    pub fn new(words: &[&str], classifier: StubClassifier) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let word_list = dir.path().join("moderation_list.txt");
        std::fs::write(&word_list, words.join("\n")).unwrap();

        let entries = Arc::new(JsonEntryRepository::new(dir.path().join("user-text.json")));
        let log = Arc::new(JsonModerationLog::new(dir.path().join("content_log_cleaned.json")));
        let classifier = Arc::new(classifier);

        let signals = SignalCollector::new(
            Arc::new(FileWordList::new(word_list)),
            classifier.clone(),
            classifier,
            SignalPolicy::default(),
        );
        let submissions = Arc::new(SubmissionService::new(entries.clone(), log.clone(), signals));
        let deletions = CascadeDeleteCoordinator::new(entries.clone(), log.clone());

        Self {
            dir,
            entries,
            log,
            submissions,
            deletions,
        }
    }

    /// Neutral, non-toxic classifier and an empty word list.
    pub fn quiet() -> Self {
        Self::new(&[], StubClassifier::fixed(Sentiment::Neutral, "toxic", 0.01))
    }

    /// Stores an entry (and its log record) directly, bypassing submission.
    pub async fn seed(&self, id: &str, parent: Option<&str>, timestamp: DateTime<Utc>, tags: &[&str]) {
        let entry = Entry {
            id: EntryId::from(id),
            title: format!("title {id}"),
            text: format!("text {id}"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            timestamp,
            parent_id: parent.map(EntryId::from),
        };
        let signals = SignalBundle {
            keywords: vec![],
            sentiment: Sentiment::Neutral,
            toxicity: Toxicity::NonToxic,
        };
        let decision = FlagDecision {
            flagged: false,
            reasons: vec![],
        };
        let record = ModerationRecord::new(entry.clone(), entry.text.clone(), signals, &decision);
        self.entries.append(entry).await.unwrap();
        self.log.append(record).await.unwrap();
    }

    pub async fn entry_ids(&self) -> Vec<String> {
        self.entries
            .read()
            .await
            .into_iter()
            .map(|e| e.id.to_string())
            .collect()
    }

    pub async fn log_ids(&self) -> Vec<String> {
        self.log
            .records()
            .await
            .into_iter()
            .map(|r| r.id().to_string())
            .collect()
    }
}
