//! Wires adapters into services according to the loaded settings.

use std::sync::Arc;

use anyhow::Result;
use classifier_adapters::StubClassifier;
use configs::{ClassifierBackend, Settings};
use domains::{EntryRepository, ModerationLog, SentimentClassifier, ToxicityClassifier};
use services::{CascadeDeleteCoordinator, SignalCollector, SignalPolicy, SubmissionService};
use storage_adapters::{FileWordList, JsonEntryRepository, JsonModerationLog};
use tracing::info;

pub struct App {
    pub entries: Arc<dyn EntryRepository>,
    pub log: Arc<dyn ModerationLog>,
    pub submissions: SubmissionService,
    pub deletions: CascadeDeleteCoordinator,
}

impl App {
    pub fn build(settings: &Settings) -> Result<Self> {
        let storage = &settings.storage;
        let entries: Arc<dyn EntryRepository> = Arc::new(JsonEntryRepository::new(storage.entries_path()));
        let log: Arc<dyn ModerationLog> = Arc::new(JsonModerationLog::new(storage.log_path()));
        let words = Arc::new(FileWordList::new(storage.word_list_path()));

        let (sentiment, toxicity) = classifiers(settings)?;
        let policy = SignalPolicy {
            toxicity_threshold: settings.classifier.toxicity_threshold,
            classifier_timeout: settings.classifier.timeout(),
        };
        let signals = SignalCollector::new(words, sentiment, toxicity, policy);

        Ok(Self {
            submissions: SubmissionService::new(entries.clone(), log.clone(), signals),
            deletions: CascadeDeleteCoordinator::new(entries.clone(), log.clone()),
            entries,
            log,
        })
    }
}

type Classifiers = (Arc<dyn SentimentClassifier>, Arc<dyn ToxicityClassifier>);

fn classifiers(settings: &Settings) -> Result<Classifiers> {
    match settings.classifier.backend {
        ClassifierBackend::Stub => {
            info!("using lexicon stub classifier");
            let stub = Arc::new(StubClassifier::lexicon());
            let sentiment: Arc<dyn SentimentClassifier> = stub.clone();
            let toxicity: Arc<dyn ToxicityClassifier> = stub;
            Ok((sentiment, toxicity))
        }
        #[cfg(feature = "classifier-http")]
        ClassifierBackend::Http => {
            use classifier_adapters::{HttpClassifier, HttpClassifierConfig};

            let cfg = &settings.classifier;
            let http = Arc::new(HttpClassifier::new(HttpClassifierConfig {
                sentiment_url: cfg.sentiment_url.clone().unwrap_or_default(),
                toxicity_url: cfg.toxicity_url.clone().unwrap_or_default(),
                api_token: cfg.api_token.clone(),
                timeout: cfg.timeout(),
            })?);
            info!("using hosted http classifier");
            let sentiment: Arc<dyn SentimentClassifier> = http.clone();
            let toxicity: Arc<dyn ToxicityClassifier> = http;
            Ok((sentiment, toxicity))
        }
        #[cfg(not(feature = "classifier-http"))]
        ClassifierBackend::Http => {
            anyhow::bail!("http classifier backend requires the `classifier-http` feature")
        }
    }
}
