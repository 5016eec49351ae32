//! # Signal Collector
//!
//! Runs keyword matching and both classifiers for one submission. Each signal
//! fails independently: an unavailable word list yields no keywords, and a
//! failing or slow classifier yields the `error` label. Nothing here ever
//! fails the submission.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use domains::{
    ClassifierError, KeywordSource, Sentiment, SentimentClassifier, SignalBundle, Toxicity,
    ToxicityClassifier,
};
use tracing::warn;

use crate::normalizer;

/// Label a toxicity model reports for toxic content.
const TOXIC_LABEL: &str = "toxic";

#[derive(Debug, Clone, Copy)]
pub struct SignalPolicy {
    /// A `toxic` label counts only with confidence strictly above this.
    pub toxicity_threshold: f64,
    /// Upper bound on each classifier call.
    pub classifier_timeout: Duration,
}

impl Default for SignalPolicy {
    fn default() -> Self {
        Self {
            toxicity_threshold: 0.7,
            classifier_timeout: Duration::from_secs(10),
        }
    }
}

pub struct SignalCollector {
    keywords: Arc<dyn KeywordSource>,
    sentiment: Arc<dyn SentimentClassifier>,
    toxicity: Arc<dyn ToxicityClassifier>,
    policy: SignalPolicy,
}

impl SignalCollector {
    pub fn new(
        keywords: Arc<dyn KeywordSource>,
        sentiment: Arc<dyn SentimentClassifier>,
        toxicity: Arc<dyn ToxicityClassifier>,
        policy: SignalPolicy,
    ) -> Self {
        Self {
            keywords,
            sentiment,
            toxicity,
            policy,
        }
    }

    pub async fn collect(&self, text: &str) -> SignalBundle {
        let (keywords, sentiment, toxicity) = tokio::join!(
            self.match_keywords(text),
            self.classify_sentiment(text),
            self.classify_toxicity(text),
        );
        SignalBundle {
            keywords,
            sentiment,
            toxicity,
        }
    }

    /// Tokens of the cleaned text found in the word list, in text order,
    /// duplicates kept.
    async fn match_keywords(&self, text: &str) -> Vec<String> {
        let words: HashSet<String> = match self.keywords.moderation_words().await {
            Ok(words) => words.into_iter().map(|w| w.to_lowercase()).collect(),
            Err(err) => {
                warn!(error = %err, "moderation word list unavailable, skipping keyword signal");
                return Vec::new();
            }
        };

        normalizer::tokens(text)
            .into_iter()
            .filter(|token| words.contains(token))
            .collect()
    }

    async fn classify_sentiment(&self, text: &str) -> Sentiment {
        match self.bounded(self.sentiment.classify_sentiment(text)).await {
            Ok(label) => label,
            Err(err) => {
                warn!(error = %err, "sentiment classifier failed");
                Sentiment::Error
            }
        }
    }

    async fn classify_toxicity(&self, text: &str) -> Toxicity {
        match self.bounded(self.toxicity.score_toxicity(text)).await {
            Ok(score)
                if score.label.eq_ignore_ascii_case(TOXIC_LABEL)
                    && score.score > self.policy.toxicity_threshold =>
            {
                Toxicity::Toxic
            }
            Ok(_) => Toxicity::NonToxic,
            Err(err) => {
                warn!(error = %err, "toxicity classifier failed");
                Toxicity::Error
            }
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, ClassifierError>
    where
        F: Future<Output = Result<T, ClassifierError>>,
    {
        let limit = self.policy.classifier_timeout;
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| Err(ClassifierError::Timeout(limit.as_millis() as u64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        DomainError, MockKeywordSource, MockSentimentClassifier, MockToxicityClassifier,
        ToxicityScore,
    };

    fn words(list: &[&str]) -> MockKeywordSource {
        let list: Vec<String> = list.iter().map(|w| w.to_string()).collect();
        let mut source = MockKeywordSource::new();
        source
            .expect_moderation_words()
            .returning(move || Ok(list.clone()));
        source
    }

    fn sentiment(label: Sentiment) -> MockSentimentClassifier {
        let mut classifier = MockSentimentClassifier::new();
        classifier
            .expect_classify_sentiment()
            .returning(move |_| Ok(label));
        classifier
    }

    fn toxicity(label: &str, score: f64) -> MockToxicityClassifier {
        let label = label.to_string();
        let mut classifier = MockToxicityClassifier::new();
        classifier.expect_score_toxicity().returning(move |_| {
            Ok(ToxicityScore {
                label: label.clone(),
                score,
            })
        });
        classifier
    }

    fn collector(
        k: MockKeywordSource,
        s: MockSentimentClassifier,
        t: MockToxicityClassifier,
    ) -> SignalCollector {
        SignalCollector::new(Arc::new(k), Arc::new(s), Arc::new(t), SignalPolicy::default())
    }

    #[tokio::test]
    async fn matches_keywords_case_insensitively_in_text_order() {
        let c = collector(
            words(&["Hate", "awful"]),
            sentiment(Sentiment::Neutral),
            toxicity("toxic", 0.1),
        );
        let bundle = c.collect("Awful, just AWFUL. I hate it").await;
        assert_eq!(bundle.keywords, vec!["awful", "awful", "hate"]);
    }

    #[tokio::test]
    async fn missing_word_list_yields_no_keywords() {
        let mut source = MockKeywordSource::new();
        source
            .expect_moderation_words()
            .returning(|| Err(DomainError::Storage("gone".into())));
        let c = collector(source, sentiment(Sentiment::Positive), toxicity("toxic", 0.1));

        let bundle = c.collect("I hate this").await;
        assert!(bundle.keywords.is_empty());
        assert_eq!(bundle.sentiment, Sentiment::Positive);
    }

    #[tokio::test]
    async fn toxicity_requires_score_strictly_above_threshold() {
        let at = collector(words(&[]), sentiment(Sentiment::Neutral), toxicity("toxic", 0.7));
        assert_eq!(at.collect("x").await.toxicity, Toxicity::NonToxic);

        let above = collector(words(&[]), sentiment(Sentiment::Neutral), toxicity("toxic", 0.71));
        assert_eq!(above.collect("x").await.toxicity, Toxicity::Toxic);

        let other = collector(words(&[]), sentiment(Sentiment::Neutral), toxicity("insult", 0.99));
        assert_eq!(other.collect("x").await.toxicity, Toxicity::NonToxic);
    }

    #[tokio::test]
    async fn classifier_failures_become_error_sentinels() {
        let mut s = MockSentimentClassifier::new();
        s.expect_classify_sentiment()
            .returning(|_| Err(ClassifierError::Transport("refused".into())));
        let mut t = MockToxicityClassifier::new();
        t.expect_score_toxicity()
            .returning(|_| Err(ClassifierError::Status(503, "loading".into())));

        let bundle = collector(words(&[]), s, t).collect("text").await;
        assert_eq!(bundle.sentiment, Sentiment::Error);
        assert_eq!(bundle.toxicity, Toxicity::Error);
    }

    struct SlowSentiment;

    #[async_trait::async_trait]
    impl SentimentClassifier for SlowSentiment {
        async fn classify_sentiment(&self, _text: &str) -> Result<Sentiment, ClassifierError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Sentiment::Negative)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_classifier_times_out_as_error() {
        let policy = SignalPolicy {
            classifier_timeout: Duration::from_millis(50),
            ..SignalPolicy::default()
        };
        let c = SignalCollector::new(
            Arc::new(words(&[])),
            Arc::new(SlowSentiment),
            Arc::new(toxicity("toxic", 0.9)),
            policy,
        );

        let bundle = c.collect("text").await;
        assert_eq!(bundle.sentiment, Sentiment::Error);
        assert_eq!(bundle.toxicity, Toxicity::Toxic);
    }
}
